use hashbrown::HashMap;
use petgraph::{
    Directed,
    graph::{DiGraph, EdgeIndex, EdgeReference, Edges, NodeIndex},
};

use super::components::{NodeId, RoadEdge, RoadNode};
use crate::{GeoPoint, Meters};

/// Immutable road network.
///
/// Built once by [`crate::GraphBuilder`] and only ever read afterwards, so a
/// single instance can serve any number of concurrent route searches.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    graph: DiGraph<RoadNode, RoadEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
}

impl RoadGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<RoadNode, RoadEdge>,
        node_lookup: HashMap<NodeId, NodeIndex>,
    ) -> Self {
        Self { graph, node_lookup }
    }

    pub fn node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    pub fn node(&self, id: &NodeId) -> Option<&RoadNode> {
        self.node_index(id).map(|index| &self.graph[index])
    }

    pub fn node_weight(&self, index: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(index)
    }

    pub fn edge_weight(&self, index: EdgeIndex) -> Option<&RoadEdge> {
        self.graph.edge_weight(index)
    }

    /// Outgoing edges of a node
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, RoadEdge, Directed> {
        self.graph.edges(node)
    }

    /// Outgoing edges of the node with the given key, empty for unknown keys
    pub fn edges_from(
        &self,
        id: &NodeId,
    ) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> + use<'_> {
        self.node_index(id)
            .into_iter()
            .flat_map(|index| self.graph.edges(index))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.graph.node_weights()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> {
        self.graph.edge_references()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn hazard_edge_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.hazardous)
            .count()
    }

    /// Closest node to `point` by haversine distance.
    ///
    /// This is a linear scan over every node, which is fine for city-sized
    /// networks. A spatial index would have to keep the exact same contract.
    pub fn find_nearest_node(&self, point: &GeoPoint) -> Option<(NodeIndex, Meters)> {
        self.graph
            .node_indices()
            .map(|index| (index, point.distance_to(&self.graph[index].position)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Like [`Self::find_nearest_node`], but only if the node lies within `max_distance`
    pub fn find_nearest_node_within(
        &self,
        point: &GeoPoint,
        max_distance: Meters,
    ) -> Option<(NodeIndex, Meters)> {
        self.find_nearest_node(point)
            .filter(|&(_, distance)| distance <= max_distance)
    }
}
