use crate::complex::CubicalComplex;
use crate::error::{Result, TransformError};
use crate::fields::{DistanceMap, OpeningMap, OpeningScratch};
use crate::grid::VoxelGrid;
use crate::math::Matrix4;
use crate::skeleton::{CurvilinearSkeleton, SkeletonGraphBuilder};
use crate::thinning::ThinningProcess;

/// Parameters of the [`Skeletonize`] operation.
#[derive(Debug, Clone)]
pub struct SkeletonizeParams {
    /// Skeletonize the complement of the occupancy instead of the occupancy.
    pub complement: bool,
    /// Treat everything beyond the grid bounds as object when computing
    /// the distance field.
    pub outside_is_object: bool,
    /// Iteration budget for the thinning loop.
    pub max_iterations: u32,
    /// Grid-to-world embedding of the output skeleton. Must be an
    /// invertible uniform-scale affine transform.
    pub grid_to_world: Matrix4,
}

impl Default for SkeletonizeParams {
    fn default() -> Self {
        Self {
            complement: false,
            outside_is_object: false,
            max_iterations: 10_000,
            grid_to_world: Matrix4::identity(),
        }
    }
}

/// Turns a binary occupancy grid into a curvilinear skeleton.
///
/// Runs the full pipeline: distance and opening transforms, cubical complex
/// construction, constrained thinning, and graph extraction.
pub struct Skeletonize {
    params: SkeletonizeParams,
}

impl Skeletonize {
    /// Creates a new `Skeletonize` operation.
    #[must_use]
    pub fn new(params: SkeletonizeParams) -> Self {
        Self { params }
    }

    /// Executes the pipeline on the given occupancy grid.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NotInvertible`] when the grid-to-world
    /// transform is singular, and [`ThinningError::IterationBudgetExhausted`]
    /// when thinning does not converge within the budget.
    ///
    /// [`ThinningError::IterationBudgetExhausted`]:
    /// crate::error::ThinningError::IterationBudgetExhausted
    pub fn execute(&self, voxels: &VoxelGrid) -> Result<CurvilinearSkeleton> {
        if self.params.grid_to_world.try_inverse().is_none() {
            return Err(TransformError::NotInvertible.into());
        }
        log::info!(
            "skeletonizing {}x{}x{} grid, {} occupied voxels",
            voxels.width(),
            voxels.height(),
            voxels.depth(),
            voxels.occupied_count()
        );

        let complemented;
        let object = if self.params.complement {
            complemented = VoxelGrid::from_fn(
                voxels.width(),
                voxels.height(),
                voxels.depth(),
                |x, y, z| !voxels.is_occupied(x, y, z),
            );
            &complemented
        } else {
            voxels
        };

        let distance = DistanceMap::compute(object, self.params.outside_is_object);
        let mut scratch = OpeningScratch::new();
        let opening = OpeningMap::compute(&distance, &mut scratch);

        let mut complex = CubicalComplex::build(object, false);
        let iterations = ThinningProcess::new(&distance, &opening, self.params.max_iterations)
            .execute(&mut complex)?;

        let skeleton = SkeletonGraphBuilder::new(&complex, &distance, &opening)
            .build(&self.params.grid_to_world)?;
        log::info!(
            "skeleton ready: {} nodes after {} thinning iterations",
            skeleton.graph().len(),
            iterations
        );
        Ok(skeleton)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{SkelisError, ThinningError};
    use crate::math::Point3;
    use crate::skeleton::{SkeletonGraph, UNDEFINED_NODE};

    fn edge_total(graph: &SkeletonGraph) -> usize {
        (0..graph.len())
            .map(|i| graph.degree(u32::try_from(i).unwrap()))
            .sum::<usize>()
            / 2
    }

    #[test]
    fn empty_grid_yields_an_empty_skeleton() {
        let voxels = VoxelGrid::new(8, 8, 8);
        let skeleton = Skeletonize::new(SkeletonizeParams::default())
            .execute(&voxels)
            .unwrap();

        assert!(skeleton.graph().is_empty());
        assert!(skeleton
            .voxel_to_node()
            .data()
            .iter()
            .all(|&label| label == UNDEFINED_NODE));
    }

    #[test]
    fn metric_ball_thins_to_a_single_central_node() {
        // An 11^3 cube is the 26-metric ball of radius 6.
        let voxels = VoxelGrid::from_fn(11, 11, 11, |_, _, _| true);
        let skeleton = Skeletonize::new(SkeletonizeParams::default())
            .execute(&voxels)
            .unwrap();
        let graph = skeleton.graph();

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.degree(0), 0);
        let node = graph.node(0);
        assert!(
            (4.0..=6.0).contains(&node.max_ball_radius),
            "radius {} is not about the half-side",
            node.max_ball_radius
        );
        for coordinate in [node.position.x, node.position.y, node.position.z] {
            assert!((3.0..=8.0).contains(&coordinate));
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn euclidean_sphere_yields_a_trivial_central_skeleton() {
        let voxels = VoxelGrid::from_fn(32, 32, 32, |x, y, z| {
            let (dx, dy, dz) = (x as f32 - 15.5, y as f32 - 15.5, z as f32 - 15.5);
            dx * dx + dy * dy + dz * dz <= 100.0
        });
        let skeleton = Skeletonize::new(SkeletonizeParams::default())
            .execute(&voxels)
            .unwrap();
        let graph = skeleton.graph();

        assert!(!graph.is_empty());
        assert!(graph.len() <= 8, "sphere left {} nodes", graph.len());
        assert!(graph.is_connected());

        let max_radius = graph
            .nodes()
            .iter()
            .map(|n| n.max_ball_radius)
            .fold(0.0f32, f32::max);
        assert!(
            (4.0..=7.0).contains(&max_radius),
            "central radius out of range: {max_radius}"
        );
        for node in graph.nodes() {
            for coordinate in [node.position.x, node.position.y, node.position.z] {
                assert!((11.0..=21.0).contains(&coordinate));
            }
        }
    }

    #[test]
    fn square_cylinder_thins_to_an_axial_path() {
        let voxels = VoxelGrid::from_fn(20, 5, 5, |_, _, _| true);
        let skeleton = Skeletonize::new(SkeletonizeParams::default())
            .execute(&voxels)
            .unwrap();
        let graph = skeleton.graph();

        assert!(graph.is_connected());
        assert!((8..=17).contains(&graph.len()), "{} nodes", graph.len());
        assert_eq!(edge_total(graph), graph.len() - 1, "skeleton is not a path");

        let radii: Vec<f32> = graph.nodes().iter().map(|n| n.max_ball_radius).collect();
        assert!(radii.iter().all(|&r| (2.0..=3.0).contains(&r)));
        assert_relative_eq!(radii.iter().fold(0.0f32, |a, &b| a.max(b)), 3.0);
    }

    #[test]
    fn picture_frame_keeps_its_cycle() {
        let voxels = VoxelGrid::from_fn(9, 9, 3, |x, y, _| !(3..6).contains(&x) || !(3..6).contains(&y));
        let skeleton = Skeletonize::new(SkeletonizeParams::default())
            .execute(&voxels)
            .unwrap();
        let graph = skeleton.graph();

        assert!(graph.is_connected());
        assert!((8..=24).contains(&graph.len()), "{} nodes", graph.len());
        assert_eq!(edge_total(graph), graph.len(), "skeleton is not one cycle");
        for index in 0..u32::try_from(graph.len()).unwrap() {
            assert_eq!(graph.degree(index), 2);
        }
        assert!(graph
            .nodes()
            .iter()
            .all(|n| (1.0..=2.0).contains(&n.max_ball_radius)));
    }

    #[test]
    fn complement_skeletonizes_the_cavity() {
        // Solid 9^3 block with a 3^3 hollow; the complement pipeline
        // skeletonizes the hollow.
        let voxels = VoxelGrid::from_fn(9, 9, 9, |x, y, z| {
            !((3..6).contains(&x) && (3..6).contains(&y) && (3..6).contains(&z))
        });
        let params = SkeletonizeParams {
            complement: true,
            ..SkeletonizeParams::default()
        };
        let skeleton = Skeletonize::new(params).execute(&voxels).unwrap();
        let graph = skeleton.graph();

        assert_eq!(graph.len(), 1);
        assert!((1.0..=2.0).contains(&graph.node(0).max_ball_radius));
        for coordinate in [
            graph.node(0).position.x,
            graph.node(0).position.y,
            graph.node(0).position.z,
        ] {
            assert!((3.0..=6.0).contains(&coordinate));
        }
    }

    #[test]
    fn scaled_transform_scales_the_output() {
        let voxels = VoxelGrid::from_fn(7, 7, 7, |_, _, _| true);
        let params = SkeletonizeParams {
            grid_to_world: Matrix4::new_scaling(3.0),
            ..SkeletonizeParams::default()
        };
        let skeleton = Skeletonize::new(params).execute(&voxels).unwrap();
        let graph = skeleton.graph();

        assert_eq!(graph.len(), 1);
        let node = graph.node(0);
        assert!((9.0..=12.0).contains(&node.max_ball_radius));
        for coordinate in [node.position.x, node.position.y, node.position.z] {
            assert!((6.0..=15.0).contains(&coordinate));
        }
        assert!(skeleton.node_at(&Point3::new(10.5, 10.5, 10.5)).is_some());
    }

    #[test]
    fn singular_transform_fails_fast() {
        let voxels = VoxelGrid::from_fn(3, 3, 3, |_, _, _| true);
        let params = SkeletonizeParams {
            grid_to_world: Matrix4::zeros(),
            ..SkeletonizeParams::default()
        };
        let err = Skeletonize::new(params).execute(&voxels).unwrap_err();
        assert!(matches!(
            err,
            SkelisError::Transform(TransformError::NotInvertible)
        ));
    }

    #[test]
    fn exhausted_budget_surfaces_as_an_error() {
        let voxels = VoxelGrid::from_fn(11, 11, 11, |_, _, _| true);
        let params = SkeletonizeParams {
            max_iterations: 1,
            ..SkeletonizeParams::default()
        };
        let err = Skeletonize::new(params).execute(&voxels).unwrap_err();
        assert!(matches!(
            err,
            SkelisError::Thinning(ThinningError::IterationBudgetExhausted { budget: 1 })
        ));
    }
}
