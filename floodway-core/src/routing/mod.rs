mod dijkstra;
mod path_finder;
mod service;
mod to_geojson;

pub use dijkstra::HazardDijkstra;
pub use path_finder::{PathFinder, PathResult};
pub use service::{Endpoint, GraphInfo, RouteMetrics, RouteResult, RoutingService};
