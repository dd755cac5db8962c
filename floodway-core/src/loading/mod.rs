//! This module is responsible for turning road and hazard data into the
//! immutable routing graph.

mod builder;
mod config;
pub mod sources;

pub use builder::{GraphBuilder, RoadSegment, create_road_graph};
pub use config::RouterConfig;
pub use sources::{HazardSource, RoadSource};
