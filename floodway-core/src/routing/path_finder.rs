use petgraph::graph::NodeIndex;

use crate::{Meters, RoadEdge, RoadGraph, RoadNode};

/// Strategy for finding a route between two nodes of a [`RoadGraph`].
///
/// Implementations keep all search state local to the call, so one instance
/// can be shared between threads.
pub trait PathFinder: Send + Sync {
    /// Returns `None` when `end` is unreachable from `start`
    fn find_path<'g>(
        &self,
        graph: &'g RoadGraph,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Option<PathResult<'g>>;
}

/// A found path plus statistics about the search that produced it
#[derive(Debug, Clone)]
pub struct PathResult<'g> {
    /// Start to end, both inclusive
    pub nodes: Vec<&'g RoadNode>,
    /// `edges[i]` leads from `nodes[i]` to `nodes[i + 1]`
    pub edges: Vec<&'g RoadEdge>,
    /// Sum of physical edge lengths
    pub total_distance: Meters,
    /// Sum of effective (hazard-weighted) edge costs
    pub total_cost: f64,
    pub hazard_edges_in_path: usize,
    /// Number of times a hazardous edge was examined during the search
    pub hazard_edges_considered: usize,
}

impl<'g> PathResult<'g> {
    /// Path consisting of a single node and no edges
    pub fn single(node: &'g RoadNode) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            total_distance: 0.0,
            total_cost: 0.0,
            hazard_edges_in_path: 0,
            hazard_edges_considered: 0,
        }
    }

    /// Builds a result from an ordered node/edge walk, summing its totals
    pub fn from_walk(
        nodes: Vec<&'g RoadNode>,
        edges: Vec<&'g RoadEdge>,
        hazard_edges_considered: usize,
    ) -> Self {
        let total_distance = edges.iter().map(|edge| edge.distance).sum();
        let total_cost = edges.iter().map(|edge| edge.effective_cost()).sum();
        let hazard_edges_in_path = edges.iter().filter(|edge| edge.hazardous).count();

        Self {
            nodes,
            edges,
            total_distance,
            total_cost,
            hazard_edges_in_path,
            hazard_edges_considered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Share of path edges that are hazardous, 0 for an edgeless path
    #[allow(clippy::cast_precision_loss)]
    pub fn risk_score(&self) -> f64 {
        if self.edges.is_empty() {
            0.0
        } else {
            self.hazard_edges_in_path as f64 / self.edges.len() as f64
        }
    }

    /// Hazardous edges examined by the search but not used by the path
    pub fn hazard_edges_avoided(&self) -> usize {
        self.hazard_edges_considered
            .saturating_sub(self.hazard_edges_in_path)
    }
}
