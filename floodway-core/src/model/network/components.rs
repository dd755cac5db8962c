//! Road network components - node keys, nodes and edges

use std::fmt;

use crate::{GeoPoint, Meters, NODE_ID_SCALE};

/// Stable node key.
///
/// Keys derived from coordinates quantize latitude and longitude to six
/// decimal places, so segments sharing an endpoint (up to ~0.1 m) resolve to
/// the same node. Nothing else merges nearby points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn from_point(point: &GeoPoint) -> Self {
        // Range-checked coordinates scaled by 1e6 always fit in i64
        #[allow(clippy::cast_possible_truncation)]
        let lat = (point.latitude() * NODE_ID_SCALE).round() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let lon = (point.longitude() * NODE_ID_SCALE).round() as i64;
        Self(format!("{lat}_{lon}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Road graph node (intersection or segment endpoint)
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub id: NodeId,
    pub position: GeoPoint,
}

impl RoadNode {
    pub fn new(id: NodeId, position: GeoPoint) -> Self {
        Self { id, position }
    }

    pub fn distance_to(&self, other: &RoadNode) -> Meters {
        self.position.distance_to(&other.position)
    }
}

/// Directed road graph edge. Source and target are the graph endpoints of
/// the edge, this only carries its costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadEdge {
    /// Physical length in meters
    pub distance: Meters,
    /// 1.0 for safe edges, the hazard multiplier otherwise
    pub hazard_multiplier: f64,
    pub hazardous: bool,
}

impl RoadEdge {
    pub fn new(distance: Meters) -> Self {
        Self {
            distance,
            hazard_multiplier: 1.0,
            hazardous: false,
        }
    }

    pub fn hazardous(distance: Meters, hazard_multiplier: f64) -> Self {
        Self {
            distance,
            hazard_multiplier,
            hazardous: true,
        }
    }

    /// Cost minimized by routing: distance inflated by the hazard multiplier
    pub fn effective_cost(&self) -> f64 {
        self.distance * self.hazard_multiplier
    }
}
