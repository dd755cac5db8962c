use thiserror::Error;

use crate::{GeoPoint, NodeId, routing::Endpoint};

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Coordinate out of range: latitude {latitude} must be within [-90, 90] \
         and longitude {longitude} within [-180, 180]"
    )]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
    #[error("Malformed coordinate '{0}': expected 'lat,lon'")]
    MalformedCoordinate(String),
    #[error(
        "The {endpoint} coordinate ({point}) is more than {max_distance:.0}m from any road \
         in the network"
    )]
    SnapFailed {
        endpoint: Endpoint,
        point: GeoPoint,
        max_distance: f64,
    },
    #[error("Start and end points resolve to the same road node {0}")]
    SameNode(NodeId),
    #[error("No route found from {start} to {end}; the locations may not be connected")]
    NoRouteFound { start: GeoPoint, end: GeoPoint },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Data load error: {0}")]
    DataLoad(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

/// Coarse classification of [`Error`] for callers that map failures
/// onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad coordinates or endpoints; the caller should retry with other input
    InvalidInput,
    /// The endpoints are valid but not connected in the current network
    NotFound,
    /// Road or hazard data could not be turned into a network
    DataLoad,
    /// Failure producing output
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CoordinateOutOfRange { .. }
            | Error::MalformedCoordinate(_)
            | Error::SnapFailed { .. }
            | Error::SameNode(_) => ErrorKind::InvalidInput,
            Error::NoRouteFound { .. } => ErrorKind::NotFound,
            Error::InvalidGeometry(_) | Error::InvalidConfig(_) | Error::DataLoad(_) => {
                ErrorKind::DataLoad
            }
            Error::GeoJsonError(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_failure_message_names_endpoint_and_threshold() {
        let err = Error::SnapFailed {
            endpoint: Endpoint::Start,
            point: GeoPoint::new(50.0, 19.0).unwrap(),
            max_distance: 500.0,
        };

        let message = err.to_string();
        assert!(message.contains("start"));
        assert!(message.contains("50.000000,19.000000"));
        assert!(message.contains("500m"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn no_route_is_not_found() {
        let err = Error::NoRouteFound {
            start: GeoPoint::new(52.23, 21.01).unwrap(),
            end: GeoPoint::new(52.24, 21.02).unwrap(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("52.240000,21.020000"));
    }
}
