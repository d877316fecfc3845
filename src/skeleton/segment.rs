use super::{CurvilinearSkeleton, NodeIndex, SkeletonGraph, UNDEFINED_NODE};

impl CurvilinearSkeleton {
    /// Collapses the graph by maximal-ball aggregation.
    ///
    /// Nodes are visited by descending ball radius, then descending degree,
    /// then index. Each unclaimed node becomes a representative and claims
    /// every still-unclaimed node whose position lies inside its ball
    /// (world distance at most its radius). Edges between distinct
    /// representatives survive, deduplicated; the voxel lookup is relabeled
    /// to the representatives. A connected graph stays connected.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn segmented(&self) -> Self {
        let count = self.graph.len();
        let nodes = self.graph.nodes();

        let mut order: Vec<NodeIndex> = (0..count as NodeIndex).collect();
        order.sort_unstable_by(|&a, &b| {
            nodes[b as usize]
                .max_ball_radius
                .total_cmp(&nodes[a as usize].max_ball_radius)
                .then_with(|| self.graph.degree(b).cmp(&self.graph.degree(a)))
                .then_with(|| a.cmp(&b))
        });

        let mut new_index = vec![UNDEFINED_NODE; count];
        let mut reduced = SkeletonGraph::default();
        for &candidate in &order {
            if new_index[candidate as usize] != UNDEFINED_NODE {
                continue;
            }
            let node = nodes[candidate as usize].clone();
            let center = node.position;
            let radius_squared = node.max_ball_radius * node.max_ball_radius;
            let index = reduced.push_node(node);
            new_index[candidate as usize] = index;
            for &other in &order {
                if new_index[other as usize] != UNDEFINED_NODE {
                    continue;
                }
                let offset = nodes[other as usize].position - center;
                if offset.norm_squared() <= radius_squared {
                    new_index[other as usize] = index;
                }
            }
        }

        for a in 0..count as NodeIndex {
            for &b in self.graph.neighbors(a) {
                if b <= a {
                    continue;
                }
                let (ra, rb) = (new_index[a as usize], new_index[b as usize]);
                if ra != rb && !reduced.has_edge(ra, rb) {
                    reduced.connect(ra, rb);
                }
            }
        }

        let mut voxel_to_node = self.voxel_to_node.clone();
        for label in voxel_to_node.data_mut() {
            if *label != UNDEFINED_NODE {
                *label = new_index[*label as usize];
            }
        }

        log::debug!(
            "maxball segmentation: {} nodes reduced to {}",
            count,
            reduced.len()
        );
        Self {
            graph: reduced,
            grid_to_world: self.grid_to_world,
            world_to_grid: self.world_to_grid,
            voxel_to_node,
        }
    }
}
