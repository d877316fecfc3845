mod build;
mod segment;

pub use build::SkeletonGraphBuilder;

use bitvec::vec::BitVec;

use crate::grid::Grid3D;
use crate::math::{Matrix4, Point3, Vector3};

/// Dense skeleton node index.
pub type NodeIndex = u32;

/// Sentinel for "no node" in voxel lookups and remap tables.
pub const UNDEFINED_NODE: NodeIndex = u32::MAX;

/// One skeleton point with its local thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    /// World-space position of the lattice point.
    pub position: Point3,
    /// World-space radius of the maximal inscribed ball at the node.
    pub max_ball_radius: f32,
}

/// Undirected graph over skeleton nodes, adjacency-list backed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonGraph {
    nodes: Vec<SkeletonNode>,
    adjacency: Vec<Vec<NodeIndex>>,
}

impl SkeletonGraph {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    /// Panics when `index` is out of range.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &SkeletonNode {
        &self.nodes[index as usize]
    }

    #[must_use]
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// # Panics
    /// Panics when `index` is out of range.
    #[must_use]
    pub fn neighbors(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.adjacency[index as usize]
    }

    /// # Panics
    /// Panics when `index` is out of range.
    #[must_use]
    pub fn degree(&self, index: NodeIndex) -> usize {
        self.adjacency[index as usize].len()
    }

    /// True when every node is reachable from every other (or the graph is
    /// empty).
    #[must_use]
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut visited: BitVec = BitVec::repeat(false, self.nodes.len());
        let mut stack: Vec<NodeIndex> = vec![0];
        visited.set(0, true);
        let mut seen = 1;
        while let Some(index) = stack.pop() {
            for &neighbor in self.neighbors(index) {
                if !visited[neighbor as usize] {
                    visited.set(neighbor as usize, true);
                    seen += 1;
                    stack.push(neighbor);
                }
            }
        }
        seen == self.nodes.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn push_node(&mut self, node: SkeletonNode) -> NodeIndex {
        let index = self.nodes.len() as NodeIndex;
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        index
    }

    pub(crate) fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        debug_assert_ne!(a, b, "self-edge on node {a}");
        self.adjacency[a as usize].push(b);
        self.adjacency[b as usize].push(a);
    }

    pub(crate) fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.adjacency[a as usize].contains(&b)
    }
}

/// Skeleton graph embedded in world space, plus the voxel lookup grid.
///
/// The lookup grid has the resolution of the original occupancy grid; every
/// object voxel carries the index of its skeleton node, background voxels
/// carry [`UNDEFINED_NODE`].
#[derive(Debug, Clone)]
pub struct CurvilinearSkeleton {
    graph: SkeletonGraph,
    grid_to_world: Matrix4,
    world_to_grid: Matrix4,
    voxel_to_node: Grid3D<NodeIndex>,
}

/// Face-neighbor steps scored by the oriented lookup.
const FACE_OFFSETS: [(isize, isize, isize); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

impl CurvilinearSkeleton {
    #[must_use]
    pub fn graph(&self) -> &SkeletonGraph {
        &self.graph
    }

    #[must_use]
    pub fn grid_to_world(&self) -> &Matrix4 {
        &self.grid_to_world
    }

    #[must_use]
    pub fn world_to_grid(&self) -> &Matrix4 {
        &self.world_to_grid
    }

    #[must_use]
    pub fn voxel_to_node(&self) -> &Grid3D<NodeIndex> {
        &self.voxel_to_node
    }

    /// Node owning the voxel under a world-space point.
    ///
    /// `None` outside the grid and on background voxels.
    #[must_use]
    pub fn node_at(&self, world: &Point3) -> Option<NodeIndex> {
        let (x, y, z) = self.voxel_of(world)?;
        let label = self.voxel_to_node[(x, y, z)];
        (label != UNDEFINED_NODE).then_some(label)
    }

    /// Node lookup for surface points, biased toward the object interior.
    ///
    /// The voxel under `world` and its six face neighbors are scored by how
    /// well the step agrees with the inward surface direction (`-normal`)
    /// and with `incident`; the best-scoring labeled voxel wins, the
    /// point's own voxel on ties. Directions need not be normalized.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    pub fn node_at_oriented(
        &self,
        world: &Point3,
        normal: &Vector3,
        incident: &Vector3,
    ) -> Option<NodeIndex> {
        let (x, y, z) = self.voxel_of(world)?;
        let (x, y, z) = (x as isize, y as isize, z as isize);

        let mut best = self.label_signed(x, y, z).map(|label| (0.0f32, label));
        let bias = incident - normal;
        for &(dx, dy, dz) in &FACE_OFFSETS {
            let Some(label) = self.label_signed(x + dx, y + dy, z + dz) else {
                continue;
            };
            let score = bias.x * dx as f32 + bias.y * dy as f32 + bias.z * dz as f32;
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, label));
            }
        }
        best.map(|(_, label)| label)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn voxel_of(&self, world: &Point3) -> Option<(usize, usize, usize)> {
        let grid = self.world_to_grid.transform_point(world);
        if !(grid.x.is_finite() && grid.y.is_finite() && grid.z.is_finite()) {
            return None;
        }
        let (x, y, z) = (grid.x.floor(), grid.y.floor(), grid.z.floor());
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        (x < self.voxel_to_node.width()
            && y < self.voxel_to_node.height()
            && z < self.voxel_to_node.depth())
        .then_some((x, y, z))
    }

    fn label_signed(&self, x: isize, y: isize, z: isize) -> Option<NodeIndex> {
        self.voxel_to_node
            .get_signed(x, y, z)
            .copied()
            .filter(|&label| label != UNDEFINED_NODE)
    }
}
