//! Road network model

pub mod components;
pub mod graph;

pub use components::{NodeId, RoadEdge, RoadNode};
pub use graph::RoadGraph;
