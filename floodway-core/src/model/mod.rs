//! Data model for hazard-aware routing
//!
//! Contains validated coordinates, hazard geometry and the road network graph.

pub mod hazard;
pub mod network;
pub mod point;

pub use hazard::{HazardZone, segment_line};
pub use network::{NodeId, RoadEdge, RoadGraph, RoadNode};
pub use point::GeoPoint;
