//! Route orchestration: snapping, search and metrics

use std::{fmt, time::Duration, time::Instant};

use log::{debug, error, info};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use super::{HazardDijkstra, PathFinder};
use crate::{
    Error, GeoPoint, HazardSource, Meters, NodeId, RoadGraph, RoadSource, RouterConfig,
    create_road_graph,
};

/// Which side of a route request a point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    pub total_distance_meters: Meters,
    pub node_count: usize,
    pub avoided_hazard_segments: usize,
    pub hazard_segments_traversed: usize,
    #[serde(rename = "computationTimeMs", serialize_with = "serialize_millis")]
    pub computation_time: Duration,
    /// Share of path edges that are hazardous, in [0, 1]
    pub risk_score: f64,
}

/// A computed route: `[longitude, latitude]` positions from start to end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub path: Vec<[f64; 2]>,
    pub meta: RouteMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInfo {
    pub node_count: usize,
    pub edge_count: usize,
    pub hazard_edge_count: usize,
}

#[allow(clippy::cast_precision_loss)]
fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}

/// Answers route requests against one immutable road graph.
///
/// Nothing here is mutated after construction, so a service can be shared
/// by reference (or in an `Arc`) between any number of threads.
#[derive(Debug)]
pub struct RoutingService<P: PathFinder = HazardDijkstra> {
    graph: RoadGraph,
    path_finder: P,
    config: RouterConfig,
    hazard_edge_count: usize,
}

impl RoutingService<HazardDijkstra> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate
    pub fn new(graph: RoadGraph, config: RouterConfig) -> Result<Self, Error> {
        Self::with_path_finder(graph, HazardDijkstra, config)
    }

    /// Loads roads and hazards and builds the graph, as done once at startup.
    ///
    /// Hazards are best effort: if they fail to load the error is logged and
    /// the service routes as if there were no hazards at all.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, if the road source fails or if it
    /// yields no segments
    pub fn from_sources<R, H>(roads: &R, hazards: &H, config: RouterConfig) -> Result<Self, Error>
    where
        R: RoadSource + ?Sized,
        H: HazardSource + ?Sized,
    {
        config.validate()?;

        let segments = roads
            .road_segments()
            .map_err(|e| Error::DataLoad(format!("failed to load road network: {e}")))?;
        if segments.is_empty() {
            return Err(Error::DataLoad("road network is empty".to_string()));
        }

        let zones = hazards.hazard_zones().unwrap_or_else(|e| {
            error!("Failed to load hazard zones, routing without hazards: {e}");
            Vec::new()
        });

        let graph = create_road_graph(&segments, &zones, config.hazard_multiplier);
        Self::new(graph, config)
    }
}

impl<P: PathFinder> RoutingService<P> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not validate
    pub fn with_path_finder(
        graph: RoadGraph,
        path_finder: P,
        config: RouterConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        let hazard_edge_count = graph.hazard_edge_count();
        Ok(Self {
            graph,
            path_finder,
            config,
            hazard_edge_count,
        })
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn graph_info(&self) -> GraphInfo {
        GraphInfo {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            hazard_edge_count: self.hazard_edge_count,
        }
    }

    /// Computes the least-cost route between two points.
    ///
    /// # Errors
    ///
    /// - [`Error::SnapFailed`] if a point has no road node within the snap distance
    /// - [`Error::SameNode`] if both points snap to the same node
    /// - [`Error::NoRouteFound`] if the snapped nodes are not connected
    pub fn compute_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult, Error> {
        let started = Instant::now();
        info!("Route request from {start} to {end}");

        let start_index = self.snap(Endpoint::Start, start)?;
        let end_index = self.snap(Endpoint::End, end)?;

        if start_index == end_index {
            let id = self
                .graph
                .node_weight(start_index)
                .map_or_else(|| NodeId::from_point(&start), |node| node.id.clone());
            return Err(Error::SameNode(id));
        }

        let path = self
            .path_finder
            .find_path(&self.graph, start_index, end_index)
            .ok_or(Error::NoRouteFound { start, end })?;

        let meta = RouteMetrics {
            total_distance_meters: path.total_distance,
            node_count: path.nodes.len(),
            avoided_hazard_segments: path.hazard_edges_avoided(),
            hazard_segments_traversed: path.hazard_edges_in_path,
            computation_time: started.elapsed(),
            risk_score: path.risk_score(),
        };
        let coordinates = path
            .nodes
            .iter()
            .map(|node| node.position.lon_lat())
            .collect();

        info!(
            "Route computed: {:.0}m over {} nodes, {} hazard segments traversed, {} avoided, in {:?}",
            meta.total_distance_meters,
            meta.node_count,
            meta.hazard_segments_traversed,
            meta.avoided_hazard_segments,
            meta.computation_time
        );

        Ok(RouteResult {
            path: coordinates,
            meta,
        })
    }

    /// Evaluates independent route requests in parallel.
    /// Results are in request order.
    pub fn compute_routes(&self, requests: &[(GeoPoint, GeoPoint)]) -> Vec<Result<RouteResult, Error>> {
        requests
            .par_iter()
            .map(|&(start, end)| self.compute_route(start, end))
            .collect()
    }

    fn snap(&self, endpoint: Endpoint, point: GeoPoint) -> Result<NodeIndex, Error> {
        let max_distance = self.config.max_snap_distance;
        let (index, distance) = self
            .graph
            .find_nearest_node_within(&point, max_distance)
            .ok_or(Error::SnapFailed {
                endpoint,
                point,
                max_distance,
            })?;

        if let Some(node) = self.graph.node_weight(index) {
            debug!("Snapped {endpoint} {point} to node {} ({distance:.1}m)", node.id);
        }
        Ok(index)
    }
}
