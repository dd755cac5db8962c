pub use crate::{DEFAULT_HAZARD_MULTIPLIER, MAX_SNAP_DISTANCE};

// Re-export key components
pub use crate::loading::{RouterConfig, create_road_graph};
pub use crate::loading::{HazardSource, RoadSource};
pub use crate::model::{GeoPoint, HazardZone, RoadGraph};
pub use crate::routing::{GraphInfo, RouteMetrics, RouteResult, RoutingService};

// Search
pub use crate::routing::{HazardDijkstra, PathFinder, PathResult};

pub use crate::Error;
pub use crate::Meters;
