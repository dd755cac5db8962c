use serde::Deserialize;

use crate::{DEFAULT_HAZARD_MULTIPLIER, Error, MAX_SNAP_DISTANCE, Meters};

/// Routing engine settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Cost multiplier for road segments touching a hazard zone
    pub hazard_multiplier: f64,
    /// Maximum distance between a requested point and its road node
    pub max_snap_distance: Meters,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hazard_multiplier: DEFAULT_HAZARD_MULTIPLIER,
            max_snap_distance: MAX_SNAP_DISTANCE,
        }
    }
}

impl RouterConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a multiplier below 1 or a
    /// non-positive snap distance
    pub fn validate(&self) -> Result<(), Error> {
        if !self.hazard_multiplier.is_finite() || self.hazard_multiplier < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "hazard_multiplier must be a finite value >= 1, got {}",
                self.hazard_multiplier
            )));
        }

        if !self.max_snap_distance.is_finite() || self.max_snap_distance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_snap_distance must be a finite positive distance, got {}",
                self.max_snap_distance
            )));
        }

        Ok(())
    }
}
