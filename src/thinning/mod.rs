mod birth;
mod border;

use birth::BirthMap;
use border::Border;

use crate::complex::{Axis, CubicalComplex, Direction, PairKind};
use crate::error::ThinningError;
use crate::fields::{DistanceMap, OpeningMap};
use crate::grid::Grid3D;

/// Directional thinning driver over precomputed distance and opening maps.
///
/// Each iteration runs six directional passes in a fixed order, and every
/// pass scans its direction's border list with the four collapse rules in
/// cube, face, face, edge order. The border lists are snapshots taken
/// between iterations, so a pair freed mid-iteration waits for the next
/// one; this keeps the peeling synchronous and the result independent of
/// how the lists are maintained.
///
/// Cube and face pairs always collapse when free. Edge pairs carry the
/// medial-axis constraint: an edge that has stayed bare for longer than
/// its local distance-to-opening gap allows is part of the skeleton and
/// is never removed.
///
/// The maps must describe the same object the complex was built from; the
/// process only reads them.
pub struct ThinningProcess<'a> {
    distance: &'a DistanceMap,
    opening: &'a OpeningMap,
    max_iterations: u32,
}

impl<'a> ThinningProcess<'a> {
    #[must_use]
    pub fn new(distance: &'a DistanceMap, opening: &'a OpeningMap, max_iterations: u32) -> Self {
        Self {
            distance,
            opening,
            max_iterations,
        }
    }

    /// Thins the complex in place until no collapse applies, and returns
    /// the number of iterations run.
    ///
    /// # Errors
    /// [`ThinningError::IterationBudgetExhausted`] when the border is still
    /// non-empty after `max_iterations` iterations.
    pub fn execute(&self, complex: &mut CubicalComplex) -> Result<u32, ThinningError> {
        let mut thinner = Thinner::new(complex, self.distance, self.opening, false);
        while !thinner.converged() {
            if thinner.iteration > self.max_iterations {
                return Err(ThinningError::IterationBudgetExhausted {
                    budget: self.max_iterations,
                });
            }
            let removed = thinner.step();
            log::debug!(
                "thinning iteration {}: {} collapses, border size {}",
                thinner.iteration - 1,
                removed,
                thinner.border.total_len()
            );
        }
        log::debug!("thinning converged after {} iterations", thinner.iteration - 1);
        Ok(thinner.iteration - 1)
    }
}

/// One thinning run: the complex being eroded plus its bookkeeping.
struct Thinner<'a> {
    complex: &'a mut CubicalComplex,
    distance: &'a DistanceMap,
    opening: &'a OpeningMap,
    birth: BirthMap,
    border: Border,
    touched: Vec<usize>,
    candidates: Vec<usize>,
    /// Number of the next iteration to run, starting at 1.
    iteration: u32,
    /// Rebuild borders by full lattice rescans instead of incrementally.
    rescan: bool,
}

impl<'a> Thinner<'a> {
    fn new(
        complex: &'a mut CubicalComplex,
        distance: &'a DistanceMap,
        opening: &'a OpeningMap,
        rescan: bool,
    ) -> Self {
        let birth = BirthMap::new(complex.width(), complex.height(), complex.depth());
        let mut border = Border::new(complex.len());
        {
            let complex = &*complex;
            border.rebuild_full(complex.len(), |offset, direction| {
                let (x, y, z) = complex.coords(offset);
                pair_applicable(complex, distance, opening, &birth, 1, x, y, z, direction)
            });
        }
        Self {
            complex,
            distance,
            opening,
            birth,
            border,
            touched: Vec::new(),
            candidates: Vec::new(),
            iteration: 1,
            rescan,
        }
    }

    fn converged(&self) -> bool {
        self.border.is_empty()
    }

    /// Runs one iteration of six directional passes and returns the number
    /// of pairs collapsed.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn step(&mut self) -> usize {
        let mut removed = 0;
        self.touched.clear();

        for direction in Direction::ALL {
            for rule in direction.rules() {
                let members = self.border.members(direction);
                for &offset in members {
                    let (x, y, z) = self.complex.coords(offset);
                    if !self.complex.is_free(rule, x, y, z) {
                        continue;
                    }
                    if rule.kind == PairKind::EdgePoint
                        && edge_constrained(
                            self.distance,
                            self.opening,
                            &self.birth,
                            x,
                            y,
                            z,
                            direction.axis(),
                            self.iteration,
                        )
                    {
                        continue;
                    }
                    self.complex.collapse(rule, x, y, z);
                    removed += 1;
                    self.touched.push(offset);
                    let (fx, fy, fz) = rule.face_offset;
                    self.touched.push(self.complex.offset(
                        (x as isize + fx) as usize,
                        (y as isize + fy) as usize,
                        (z as isize + fz) as usize,
                    ));
                }
            }
        }

        self.border
            .collect_candidates(self.complex, &self.touched, &mut self.candidates);
        self.birth
            .update(self.complex, &self.candidates, self.iteration);

        let complex = &*self.complex;
        let distance = self.distance;
        let opening = self.opening;
        let birth = &self.birth;
        let next_iteration = self.iteration + 1;
        let applicable = |offset: usize, direction: Direction| {
            let (x, y, z) = complex.coords(offset);
            pair_applicable(
                complex,
                distance,
                opening,
                birth,
                next_iteration,
                x,
                y,
                z,
                direction,
            )
        };
        if self.rescan {
            self.border.rebuild_full(complex.len(), applicable);
        } else {
            self.border.rebuild(&self.candidates, applicable);
        }

        self.iteration += 1;
        removed
    }
}

/// True when some rule of `direction` applies at the origin, counting the
/// edge rule only while its edge is unconstrained at `iteration`.
#[allow(clippy::too_many_arguments)]
fn pair_applicable(
    complex: &CubicalComplex,
    distance: &DistanceMap,
    opening: &OpeningMap,
    birth: &BirthMap,
    iteration: u32,
    x: usize,
    y: usize,
    z: usize,
    direction: Direction,
) -> bool {
    direction.rules().iter().any(|rule| {
        complex.is_free(rule, x, y, z)
            && (rule.kind != PairKind::EdgePoint
                || !edge_constrained(
                    distance,
                    opening,
                    birth,
                    x,
                    y,
                    z,
                    direction.axis(),
                    iteration,
                ))
    })
}

/// Medial-axis persistence test for the edge along `axis` at `(x, y, z)`.
///
/// An unexposed edge is never constrained. An exposed one is constrained
/// once `iteration - birth > opening - distance + birth`, with the field
/// values taken as maxima over the voxels incident to the edge. Only the
/// left side grows with `iteration`, so a constrained edge stays
/// constrained.
#[allow(clippy::too_many_arguments)]
fn edge_constrained(
    distance: &DistanceMap,
    opening: &OpeningMap,
    birth: &BirthMap,
    x: usize,
    y: usize,
    z: usize,
    axis: Axis,
    iteration: u32,
) -> bool {
    let Some(birth) = birth.get(x, y, z, axis) else {
        return false;
    };
    let d = edge_block_max(distance.values(), x, y, z, axis);
    let o = edge_block_max(opening.radii(), x, y, z, axis);
    i64::from(iteration) - i64::from(birth) > i64::from(o) - i64::from(d) + i64::from(birth)
}

/// Maximum field value over the up-to-four voxels incident to an edge.
#[allow(clippy::cast_possible_wrap)]
fn edge_block_max(values: &Grid3D<u32>, x: usize, y: usize, z: usize, axis: Axis) -> u32 {
    let (x, y, z) = (x as isize, y as isize, z as isize);
    let mut best = 0;
    for da in [-1, 0] {
        for db in [-1, 0] {
            let (vx, vy, vz) = match axis {
                Axis::X => (x, y + da, z + db),
                Axis::Y => (x + da, y, z + db),
                Axis::Z => (x + da, y + db, z),
            };
            if let Some(&value) = values.get_signed(vx, vy, vz) {
                best = best.max(value);
            }
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::complex::CellKind;
    use crate::fields::OpeningScratch;
    use crate::grid::VoxelGrid;

    fn fields(voxels: &VoxelGrid) -> (DistanceMap, OpeningMap) {
        let distance = DistanceMap::compute(voxels, false);
        let mut scratch = OpeningScratch::new();
        let opening = OpeningMap::compute(&distance, &mut scratch);
        (distance, opening)
    }

    fn thin(voxels: &VoxelGrid) -> (CubicalComplex, u32) {
        let (distance, opening) = fields(voxels);
        let mut complex = CubicalComplex::build(voxels, false);
        let iterations = ThinningProcess::new(&distance, &opening, 1_000)
            .execute(&mut complex)
            .unwrap();
        (complex, iterations)
    }

    fn census(complex: &CubicalComplex) -> (usize, usize, usize, usize) {
        let points = complex.cell_count(CellKind::Point);
        let edges = complex.cell_count(CellKind::XEdge)
            + complex.cell_count(CellKind::YEdge)
            + complex.cell_count(CellKind::ZEdge);
        let faces = complex.cell_count(CellKind::XyFace)
            + complex.cell_count(CellKind::YzFace)
            + complex.cell_count(CellKind::XzFace);
        let cubes = complex.cell_count(CellKind::Cube);
        (points, edges, faces, cubes)
    }

    fn surviving_point_span(complex: &CubicalComplex) -> (usize, usize) {
        let mut min_x = usize::MAX;
        let mut max_x = 0;
        for z in 0..complex.depth() {
            for y in 0..complex.height() {
                for x in 0..complex.width() {
                    if complex.contains_cell(x, y, z, CellKind::Point) {
                        min_x = min_x.min(x);
                        max_x = max_x.max(x);
                    }
                }
            }
        }
        (min_x, max_x)
    }

    #[test]
    fn solid_block_thins_to_a_single_point() {
        let voxels = VoxelGrid::from_fn(7, 7, 7, |_, _, _| true);
        let (complex, iterations) = thin(&voxels);

        assert!(iterations >= 3);
        assert_eq!(census(&complex), (1, 0, 0, 0));
        assert_eq!(complex.euler_characteristic(), 1);
        assert_eq!(complex.connected_components(), 1);
    }

    #[test]
    fn empty_grid_converges_immediately() {
        let voxels = VoxelGrid::new(4, 4, 4);
        let (complex, iterations) = thin(&voxels);
        assert_eq!(iterations, 0);
        assert_eq!(census(&complex), (0, 0, 0, 0));
    }

    #[test]
    fn converged_complex_is_a_fixed_point() {
        // Persistence windows belong to the run: a fresh execute would
        // restamp births and erode further. Within a run, convergence means
        // an extra iteration removes nothing and the border stays empty.
        let voxels = VoxelGrid::from_fn(6, 5, 4, |_, _, _| true);
        let (distance, opening) = fields(&voxels);
        let mut complex = CubicalComplex::build(&voxels, false);

        let mut thinner = Thinner::new(&mut complex, &distance, &opening, false);
        while !thinner.converged() {
            thinner.step();
        }

        let settled = thinner.complex.clone();
        let removed = thinner.step();

        assert_eq!(removed, 0);
        assert!(thinner.converged(), "extra iteration repopulated the border");
        assert_eq!(*thinner.complex, settled);
    }

    #[test]
    fn ring_keeps_its_cycle() {
        // 3x3x1 ring: eight voxels around a hole.
        let voxels = VoxelGrid::from_fn(3, 3, 1, |x, y, _| (x, y) != (1, 1));
        let initial = CubicalComplex::build(&voxels, false);
        assert_eq!(initial.euler_characteristic(), 0);

        let (complex, _) = thin(&voxels);
        let (points, edges, faces, cubes) = census(&complex);

        assert_eq!(faces, 0);
        assert_eq!(cubes, 0);
        assert_eq!(points, edges, "a closed cycle has as many points as edges");
        assert!(points >= 4);
        assert_eq!(complex.euler_characteristic(), 0);
        assert_eq!(complex.connected_components(), 1);
    }

    #[test]
    fn separated_blocks_thin_to_separated_points() {
        // Two 3x3x3 blocks with a two-voxel gap.
        let voxels = VoxelGrid::from_fn(8, 3, 3, |x, _, _| x < 3 || x >= 5);
        let (complex, _) = thin(&voxels);

        assert_eq!(census(&complex), (2, 0, 0, 0));
        assert_eq!(complex.euler_characteristic(), 2);
        assert_eq!(complex.connected_components(), 2);
    }

    #[test]
    fn bar_keeps_an_axial_path() {
        let voxels = VoxelGrid::from_fn(24, 3, 3, |_, _, _| true);
        let (complex, _) = thin(&voxels);
        let (points, edges, faces, cubes) = census(&complex);

        assert_eq!(faces, 0);
        assert_eq!(cubes, 0);
        assert_eq!(points, edges + 1, "the skeleton of a bar is a tree");
        assert!(edges >= 10, "persistence must keep the interior, got {edges}");
        assert!(edges <= 24);
        assert_eq!(complex.euler_characteristic(), 1);
        assert_eq!(complex.connected_components(), 1);

        // The path spans most of the bar despite end erosion.
        let (min_x, max_x) = surviving_point_span(&complex);
        assert!(min_x <= 8, "left end eroded too far, reached {min_x}");
        assert!(max_x >= 16, "right end eroded too far, reached {max_x}");
    }

    #[test]
    fn bridge_between_blobs_survives() {
        // Two 5x5x5 blobs joined by a one-voxel bridge.
        let voxels = VoxelGrid::from_fn(18, 5, 5, |x, y, z| {
            x < 5 || x >= 13 || (y == 2 && z == 2)
        });
        let initial = CubicalComplex::build(&voxels, false);
        assert_eq!(initial.connected_components(), 1);

        let (complex, _) = thin(&voxels);
        let (points, edges, faces, cubes) = census(&complex);

        assert_eq!(faces, 0);
        assert_eq!(cubes, 0);
        assert_eq!(complex.connected_components(), 1, "thinning cut the bridge");
        assert_eq!(complex.euler_characteristic(), 1);
        assert_eq!(points, edges + 1);
        assert!(edges >= 8, "bridge path eroded away, got {edges}");

        // The bridge spans lattice x in [5, 13]; its edges are locked long
        // before end erosion can reach them.
        let (min_x, max_x) = surviving_point_span(&complex);
        assert!(min_x <= 5);
        assert!(max_x >= 13);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let voxels = VoxelGrid::from_fn(7, 7, 7, |_, _, _| true);
        let (distance, opening) = fields(&voxels);
        let mut complex = CubicalComplex::build(&voxels, false);

        let err = ThinningProcess::new(&distance, &opening, 2)
            .execute(&mut complex)
            .unwrap_err();
        assert!(matches!(
            err,
            ThinningError::IterationBudgetExhausted { budget: 2 }
        ));
    }

    #[test]
    fn every_iteration_preserves_topology() {
        let shapes: [(&str, VoxelGrid); 2] = [
            ("block", VoxelGrid::from_fn(6, 6, 6, |_, _, _| true)),
            (
                "ring",
                VoxelGrid::from_fn(5, 5, 2, |x, y, _| x == 0 || y == 0 || x == 4 || y == 4),
            ),
        ];
        for (name, voxels) in shapes {
            let (distance, opening) = fields(&voxels);
            let mut complex = CubicalComplex::build(&voxels, false);
            let euler = complex.euler_characteristic();
            let components = complex.connected_components();

            let mut thinner = Thinner::new(&mut complex, &distance, &opening, false);
            while !thinner.converged() {
                thinner.step();
                assert_eq!(
                    thinner.complex.euler_characteristic(),
                    euler,
                    "iteration changed the Euler characteristic of the {name}"
                );
                assert_eq!(
                    thinner.complex.connected_components(),
                    components,
                    "iteration changed the component count of the {name}"
                );
            }
        }
    }

    #[test]
    fn incremental_border_matches_full_rescan() {
        let shapes: [VoxelGrid; 3] = [
            VoxelGrid::from_fn(24, 3, 3, |_, _, _| true),
            VoxelGrid::from_fn(3, 3, 1, |x, y, _| (x, y) != (1, 1)),
            VoxelGrid::from_fn(8, 3, 3, |x, _, _| x < 3 || x >= 5),
        ];
        for voxels in shapes {
            let (distance, opening) = fields(&voxels);
            let mut incremental = CubicalComplex::build(&voxels, false);
            let mut rescanned = incremental.clone();

            let mut a = Thinner::new(&mut incremental, &distance, &opening, false);
            let mut b = Thinner::new(&mut rescanned, &distance, &opening, true);
            loop {
                assert_eq!(a.border, b.border, "borders diverged at iteration {}", a.iteration);
                if a.converged() {
                    assert!(b.converged());
                    break;
                }
                a.step();
                b.step();
            }
            drop(a);
            drop(b);
            assert_eq!(incremental, rescanned);
        }
    }
}
