use std::time::Instant;

use hashbrown::HashMap;
use log::{debug, info};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rayon::prelude::*;

use crate::model::{GeoPoint, HazardZone, NodeId, RoadEdge, RoadGraph, RoadNode, segment_line};

/// A straight piece of road between two endpoints, before it becomes graph edges
#[derive(Debug, Clone)]
pub struct RoadSegment {
    pub start_id: NodeId,
    pub start: GeoPoint,
    pub end_id: NodeId,
    pub end: GeoPoint,
    /// Free-form attributes of the road (name, highway class, ...)
    pub properties: HashMap<String, String>,
}

impl RoadSegment {
    pub fn new(
        start_id: NodeId,
        start: GeoPoint,
        end_id: NodeId,
        end: GeoPoint,
        properties: HashMap<String, String>,
    ) -> Self {
        Self {
            start_id,
            start,
            end_id,
            end,
            properties,
        }
    }

    /// Segment whose endpoint ids are derived from the quantized coordinates
    pub fn from_points(start: GeoPoint, end: GeoPoint, properties: HashMap<String, String>) -> Self {
        Self::new(
            NodeId::from_point(&start),
            start,
            NodeId::from_point(&end),
            end,
            properties,
        )
    }

    /// True if the segment touches any of the zones. Stops at the first hit.
    pub fn intersects_any(&self, hazards: &[HazardZone]) -> bool {
        if hazards.is_empty() {
            return false;
        }
        let line = segment_line(&self.start, &self.end);
        hazards.iter().any(|zone| zone.intersects_line(&line))
    }
}

/// Mutable construction surface for [`RoadGraph`].
///
/// `build` consumes the builder, so a finished graph can never be modified.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DiGraph<RoadNode, RoadEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_lookup: HashMap::with_capacity(nodes),
        }
    }

    /// Returns the node with this id, creating it first if needed.
    /// The position of an existing node is kept.
    pub fn add_node(&mut self, id: NodeId, position: GeoPoint) -> NodeIndex {
        if let Some(&index) = self.node_lookup.get(&id) {
            return index;
        }
        let index = self.graph.add_node(RoadNode::new(id.clone(), position));
        self.node_lookup.insert(id, index);
        index
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, edge: RoadEdge) -> EdgeIndex {
        self.graph.add_edge(source, target, edge)
    }

    /// Adds both endpoints and a forward and reverse edge with identical hazard status
    pub fn add_segment(&mut self, segment: &RoadSegment, hazardous: bool, hazard_multiplier: f64) {
        let start = self.add_node(segment.start_id.clone(), segment.start);
        let end = self.add_node(segment.end_id.clone(), segment.end);

        let distance = self.graph[start].distance_to(&self.graph[end]);
        let edge = if hazardous {
            RoadEdge::hazardous(distance, hazard_multiplier)
        } else {
            RoadEdge::new(distance)
        };

        self.graph.add_edge(start, end, edge);
        self.graph.add_edge(end, start, edge);
    }

    pub fn build(self) -> RoadGraph {
        RoadGraph::from_parts(self.graph, self.node_lookup)
    }
}

/// Builds the routing graph from road segments and hazard zones.
///
/// Every segment touching a hazard zone is marked hazardous as a whole, in
/// both directions, and its effective cost is multiplied by `hazard_multiplier`.
pub fn create_road_graph(
    segments: &[RoadSegment],
    hazards: &[HazardZone],
    hazard_multiplier: f64,
) -> RoadGraph {
    info!(
        "Building road graph from {} segments and {} hazard zones",
        segments.len(),
        hazards.len()
    );
    let started = Instant::now();

    // Intersection tests dominate build time and are independent per segment
    let hazard_flags: Vec<bool> = segments
        .par_iter()
        .map(|segment| segment.intersects_any(hazards))
        .collect();

    let mut builder = GraphBuilder::with_capacity(segments.len() * 2, segments.len() * 2);
    for (segment, &hazardous) in segments.iter().zip(&hazard_flags) {
        builder.add_segment(segment, hazardous, hazard_multiplier);
    }
    let graph = builder.build();

    let hazardous_segments = hazard_flags.iter().filter(|&&flag| flag).count();
    debug!("{hazardous_segments} of {} segments touch a hazard zone", segments.len());
    info!(
        "Road graph built in {:?}: {} nodes, {} edges ({} hazardous)",
        started.elapsed(),
        graph.node_count(),
        graph.edge_count(),
        hazardous_segments * 2
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::visit::EdgeRef;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn segment(a: (f64, f64), b: (f64, f64)) -> RoadSegment {
        RoadSegment::from_points(point(a.0, a.1), point(b.0, b.1), HashMap::new())
    }

    // North road (two segments), south road and two connectors, (lat, lon)
    fn ring_network() -> Vec<RoadSegment> {
        vec![
            segment((52.23, 21.01), (52.23, 21.02)),
            segment((52.23, 21.02), (52.23, 21.03)),
            segment((52.22, 21.01), (52.22, 21.03)),
            segment((52.23, 21.01), (52.22, 21.01)),
            segment((52.23, 21.03), (52.22, 21.03)),
        ]
    }

    fn flood_over_north_road() -> HazardZone {
        HazardZone::from_ring(&[
            (21.015, 52.225),
            (21.025, 52.225),
            (21.025, 52.235),
            (21.015, 52.235),
        ])
        .unwrap()
    }

    #[test]
    fn shared_endpoints_become_one_node() {
        let segments = ring_network();
        let graph = create_road_graph(&segments, &[], 10.0);

        assert_eq!(graph.node_count(), 5);
        assert!(graph.node_count() <= 2 * segments.len());
        assert_eq!(graph.edge_count(), 2 * segments.len());
        assert_eq!(graph.hazard_edge_count(), 0);
    }

    #[test]
    fn disjoint_segments_keep_all_endpoints() {
        let segments = vec![
            segment((52.23, 21.01), (52.24, 21.02)),
            segment((52.25, 21.03), (52.26, 21.04)),
        ];
        let graph = create_road_graph(&segments, &[], 10.0);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn hazardous_segments_are_marked_in_both_directions() {
        let graph = create_road_graph(&ring_network(), &[flood_over_north_road()], 10.0);

        // Both north segments, forward and reverse
        assert_eq!(graph.hazard_edge_count(), 4);

        let west = graph.node(&NodeId::from_point(&point(52.23, 21.01))).unwrap();
        let middle = graph.node(&NodeId::from_point(&point(52.23, 21.02))).unwrap();
        for edge in graph.all_edges() {
            let weight = edge.weight();
            if weight.hazardous {
                assert_eq!(weight.hazard_multiplier, 10.0);
                assert!((weight.effective_cost() - weight.distance * 10.0).abs() < 1e-9);
            } else {
                assert_eq!(weight.hazard_multiplier, 1.0);
            }
        }

        let north_distance = west.distance_to(middle);
        let forward: Vec<_> = graph
            .edges_from(&west.id)
            .filter(|edge| edge.weight().hazardous)
            .collect();
        let reverse: Vec<_> = graph
            .edges_from(&middle.id)
            .filter(|edge| {
                edge.weight().hazardous && graph.node_weight(edge.target()).unwrap().id == west.id
            })
            .collect();
        assert_eq!(forward.len(), 1);
        assert_eq!(reverse.len(), 1);
        assert!((forward[0].weight().distance - north_distance).abs() < 1e-9);
        assert_eq!(forward[0].weight(), reverse[0].weight());
    }

    #[test]
    fn touching_segment_is_entirely_hazardous() {
        // Ends exactly on the zone's western edge
        let touching = segment((52.23, 21.00), (52.23, 21.015));
        assert!(touching.intersects_any(&[flood_over_north_road()]));

        let graph = create_road_graph(&[touching], &[flood_over_north_road()], 3.0);
        assert_eq!(graph.hazard_edge_count(), 2);
        assert!(graph.all_edges().all(|edge| edge.weight().hazard_multiplier == 3.0));
    }

    #[test]
    fn empty_hazard_set_marks_nothing() {
        assert!(!segment((52.23, 21.01), (52.23, 21.02)).intersects_any(&[]));
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut builder = GraphBuilder::new();
        let first = builder.add_node(NodeId::from("A"), point(52.23, 21.01));
        let second = builder.add_node(NodeId::from("A"), point(10.0, 10.0));
        assert_eq!(first, second);

        let graph = builder.build();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(
            graph.node(&NodeId::from("A")).unwrap().position,
            point(52.23, 21.01)
        );
    }

    #[test]
    fn segment_distance_uses_haversine() {
        let graph = create_road_graph(&[segment((0.0, 0.0), (1.0, 0.0))], &[], 10.0);
        for edge in graph.all_edges() {
            assert!((edge.weight().distance - 111_194.93).abs() < 0.1);
        }
    }
}
