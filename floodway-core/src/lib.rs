//! Hazard-aware routing over a road network.
//!
//! Road segments and hazard polygons are turned into an immutable directed
//! graph once, at startup. Route requests then snap their endpoints to the
//! graph and run a Dijkstra search whose edge costs are inflated inside
//! hazard zones, so dangerous roads are avoided when a reasonable detour
//! exists but are still usable when they are the only way through.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::{Error, ErrorKind};
pub use loading::{
    GraphBuilder, HazardSource, RoadSegment, RoadSource, RouterConfig, create_road_graph,
};
pub use model::{GeoPoint, HazardZone, NodeId, RoadEdge, RoadGraph, RoadNode};
pub use routing::{
    Endpoint, GraphInfo, HazardDijkstra, PathFinder, PathResult, RouteMetrics, RouteResult,
    RoutingService,
};

/// Distance in meters
pub type Meters = f64;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: Meters = 6_371_000.0;

/// Tolerance for comparing coordinates in degrees
pub const COORDINATE_EPSILON: f64 = 1e-9;

/// Scale applied to latitude/longitude before rounding them into a node key.
/// Six decimal places is roughly 0.1 m on the ground.
pub const NODE_ID_SCALE: f64 = 1_000_000.0;

/// Cost multiplier applied to road segments touching a hazard zone
pub const DEFAULT_HAZARD_MULTIPLIER: f64 = 10.0;

/// Maximum distance between a requested point and the road node it snaps to
pub const MAX_SNAP_DISTANCE: Meters = 500.0;
