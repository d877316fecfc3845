use crate::grid::{Grid3D, VoxelGrid};

/// Causal half of the 26-neighborhood for a forward raster scan: the
/// previous voxel on the row, the previous row, and the previous layer.
/// The backward scan uses the negated offsets.
const FORWARD_NEIGHBORS: [(isize, isize, isize); 13] = [
    (-1, 0, 0),
    (-1, -1, 0),
    (0, -1, 0),
    (1, -1, 0),
    (-1, -1, -1),
    (0, -1, -1),
    (1, -1, -1),
    (-1, 0, -1),
    (0, 0, -1),
    (1, 0, -1),
    (-1, 1, -1),
    (0, 1, -1),
    (1, 1, -1),
];

/// Per-voxel 26-connected distance to the background.
///
/// Unit-weight chamfer transform: one forward and one backward raster pass,
/// each relaxing against its causal half of the 26-neighborhood. With every
/// step costing one, the result is the exact Chebyshev distance to the
/// nearest background voxel. Background voxels hold zero; an object voxel
/// touching the grid boundary holds one unless `outside_is_object` declares
/// the virtual outside solid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    values: Grid3D<u32>,
}

impl DistanceMap {
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn compute(voxels: &VoxelGrid, outside_is_object: bool) -> Self {
        let (w, h, d) = (voxels.width(), voxels.height(), voxels.depth());
        let mut values = Grid3D::new_fill(w, h, d, 0u32);

        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    if voxels.is_occupied(x, y, z) {
                        values[(x, y, z)] = u32::MAX;
                    }
                }
            }
        }

        // Forward pass.
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    if !voxels.is_occupied(x, y, z) {
                        continue;
                    }
                    let mut best = values[(x, y, z)];
                    for &(dx, dy, dz) in &FORWARD_NEIGHBORS {
                        let neighbor = probe(
                            &values,
                            x as isize + dx,
                            y as isize + dy,
                            z as isize + dz,
                            outside_is_object,
                        );
                        best = best.min(neighbor.saturating_add(1));
                    }
                    values[(x, y, z)] = best;
                }
            }
        }

        // Backward pass.
        for z in (0..d).rev() {
            for y in (0..h).rev() {
                for x in (0..w).rev() {
                    if !voxels.is_occupied(x, y, z) {
                        continue;
                    }
                    let mut best = values[(x, y, z)];
                    for &(dx, dy, dz) in &FORWARD_NEIGHBORS {
                        let neighbor = probe(
                            &values,
                            x as isize - dx,
                            y as isize - dy,
                            z as isize - dz,
                            outside_is_object,
                        );
                        best = best.min(neighbor.saturating_add(1));
                    }
                    values[(x, y, z)] = best;
                }
            }
        }

        Self { values }
    }

    /// Distance at a voxel.
    ///
    /// # Panics
    /// Panics when the voxel is out of bounds.
    #[must_use]
    pub fn value(&self, x: usize, y: usize, z: usize) -> u32 {
        self.values[(x, y, z)]
    }

    #[must_use]
    pub fn values(&self) -> &Grid3D<u32> {
        &self.values
    }
}

fn probe(values: &Grid3D<u32>, x: isize, y: isize, z: isize, outside_is_object: bool) -> u32 {
    match values.get_signed(x, y, z) {
        Some(&v) => v,
        None if outside_is_object => u32::MAX,
        None => 0,
    }
}
