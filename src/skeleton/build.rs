use std::collections::VecDeque;

use super::{CurvilinearSkeleton, NodeIndex, SkeletonGraph, SkeletonNode, UNDEFINED_NODE};
use crate::complex::{Axis, CellKind, CubicalComplex};
use crate::error::TransformError;
use crate::fields::{DistanceMap, OpeningMap};
use crate::grid::Grid3D;
use crate::math::{uniform_scale, Matrix4, Point3};

/// Extracts the skeleton graph and voxel lookup from a thinned complex.
///
/// The distance and opening maps must be the ones the thinning consumed;
/// object voxels are exactly those with a positive distance value.
pub struct SkeletonGraphBuilder<'a> {
    complex: &'a CubicalComplex,
    distance: &'a DistanceMap,
    opening: &'a OpeningMap,
}

impl<'a> SkeletonGraphBuilder<'a> {
    #[must_use]
    pub fn new(
        complex: &'a CubicalComplex,
        distance: &'a DistanceMap,
        opening: &'a OpeningMap,
    ) -> Self {
        Self {
            complex,
            distance,
            opening,
        }
    }

    /// Builds the embedded skeleton under the grid→world transform.
    ///
    /// # Errors
    /// [`TransformError::NotInvertible`] when the transform is singular.
    pub fn build(&self, grid_to_world: &Matrix4) -> Result<CurvilinearSkeleton, TransformError> {
        let world_to_grid = grid_to_world
            .try_inverse()
            .ok_or(TransformError::NotInvertible)?;
        let scale = uniform_scale(grid_to_world);
        let (graph, seeds) = self.build_graph(grid_to_world, scale);
        let voxel_to_node = self.build_voxel_to_node_map(&seeds);
        Ok(CurvilinearSkeleton {
            graph,
            grid_to_world: *grid_to_world,
            world_to_grid,
            voxel_to_node,
        })
    }

    /// Turns every surviving non-surfacic point into a node and every
    /// surviving edge between two nodes into a graph edge. Returns the
    /// graph plus each node's seed voxel for the flood fill.
    #[allow(clippy::cast_precision_loss)]
    fn build_graph(
        &self,
        grid_to_world: &Matrix4,
        scale: f32,
    ) -> (SkeletonGraph, Vec<(usize, usize, usize)>) {
        let mut graph = SkeletonGraph::default();
        let mut seeds = Vec::new();
        let mut lattice_to_node: Grid3D<NodeIndex> = Grid3D::new_fill(
            self.complex.width(),
            self.complex.height(),
            self.complex.depth(),
            UNDEFINED_NODE,
        );

        for z in 0..self.complex.depth() {
            for y in 0..self.complex.height() {
                for x in 0..self.complex.width() {
                    if !self.complex.contains_cell(x, y, z, CellKind::Point)
                        || self.complex.point_touches_face(x, y, z)
                    {
                        continue;
                    }
                    let (vx, vy, vz) = self.node_voxel(x, y, z);
                    let position = grid_to_world
                        .transform_point(&Point3::new(x as f32, y as f32, z as f32));
                    let index = graph.push_node(SkeletonNode {
                        position,
                        max_ball_radius: self.distance.value(vx, vy, vz) as f32 * scale,
                    });
                    lattice_to_node[(x, y, z)] = index;
                    seeds.push((vx, vy, vz));
                }
            }
        }

        let mut edges = 0usize;
        for z in 0..self.complex.depth() {
            for y in 0..self.complex.height() {
                for x in 0..self.complex.width() {
                    for axis in Axis::ALL {
                        if !self.complex.contains_cell(x, y, z, axis.edge_kind()) {
                            continue;
                        }
                        let (ux, uy, uz) = axis.unit();
                        let a = lattice_to_node[(x, y, z)];
                        // Closure keeps edge endpoints inside the lattice.
                        let b = lattice_to_node[(x + ux, y + uy, z + uz)];
                        if a != UNDEFINED_NODE && b != UNDEFINED_NODE {
                            graph.connect(a, b);
                            edges += 1;
                        }
                    }
                }
            }
        }

        log::debug!("skeleton graph: {} nodes, {} edges", graph.len(), edges);
        (graph, seeds)
    }

    /// Object voxel incident to the lattice point with the greatest
    /// distance value, first in raster order on ties.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn node_voxel(&self, x: usize, y: usize, z: usize) -> (usize, usize, usize) {
        let values = self.distance.values();
        let mut best = (
            x.min(values.width() - 1),
            y.min(values.height() - 1),
            z.min(values.depth() - 1),
        );
        let mut best_value = 0;
        for dz in -1..=0isize {
            for dy in -1..=0isize {
                for dx in -1..=0isize {
                    let (vx, vy, vz) = (x as isize + dx, y as isize + dy, z as isize + dz);
                    let Some(&value) = values.get_signed(vx, vy, vz) else {
                        continue;
                    };
                    if value > best_value {
                        best_value = value;
                        best = (vx as usize, vy as usize, vz as usize);
                    }
                }
            }
        }
        best
    }

    /// Labels every object voxel reachable from a node with a node index.
    ///
    /// Phase 1 floods each node's own-ball basin: face neighbors covered
    /// by the same maximal ball as the seed. A neighbor under a different
    /// ball is deferred together with the label that reached it, and
    /// phase 2 spreads those labels breadth-first over what remains.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn build_voxel_to_node_map(&self, seeds: &[(usize, usize, usize)]) -> Grid3D<NodeIndex> {
        let values = self.distance.values();
        let (w, h, d) = (values.width(), values.height(), values.depth());
        let mut map = Grid3D::new_fill(w, h, d, UNDEFINED_NODE);
        let mut stack: Vec<(usize, usize, usize)> = Vec::new();
        let mut deferred: VecDeque<((usize, usize, usize), NodeIndex)> = VecDeque::new();

        for (index, &(sx, sy, sz)) in seeds.iter().enumerate() {
            let label = index as NodeIndex;
            if map[(sx, sy, sz)] != UNDEFINED_NODE {
                // An earlier basin swallowed the seed voxel.
                continue;
            }
            let ball = self.opening.center(sx, sy, sz);
            map[(sx, sy, sz)] = label;
            stack.push((sx, sy, sz));
            while let Some((x, y, z)) = stack.pop() {
                for &(dx, dy, dz) in &super::FACE_OFFSETS {
                    let (nx, ny, nz) = (x as isize + dx, y as isize + dy, z as isize + dz);
                    if nx < 0
                        || ny < 0
                        || nz < 0
                        || nx >= w as isize
                        || ny >= h as isize
                        || nz >= d as isize
                    {
                        continue;
                    }
                    let neighbor = (nx as usize, ny as usize, nz as usize);
                    if values[neighbor] == 0 || map[neighbor] != UNDEFINED_NODE {
                        continue;
                    }
                    if self.opening.center(neighbor.0, neighbor.1, neighbor.2) == ball {
                        map[neighbor] = label;
                        stack.push(neighbor);
                    } else {
                        deferred.push_back((neighbor, label));
                    }
                }
            }
        }

        while let Some(((x, y, z), label)) = deferred.pop_front() {
            if map[(x, y, z)] != UNDEFINED_NODE {
                continue;
            }
            map[(x, y, z)] = label;
            for &(dx, dy, dz) in &super::FACE_OFFSETS {
                let (nx, ny, nz) = (x as isize + dx, y as isize + dy, z as isize + dz);
                if nx < 0
                    || ny < 0
                    || nz < 0
                    || nx >= w as isize
                    || ny >= h as isize
                    || nz >= d as isize
                {
                    continue;
                }
                let neighbor = (nx as usize, ny as usize, nz as usize);
                if values[neighbor] != 0 && map[neighbor] == UNDEFINED_NODE {
                    deferred.push_back((neighbor, label));
                }
            }
        }

        map
    }
}
