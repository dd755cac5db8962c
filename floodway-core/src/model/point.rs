//! Validated WGS84 coordinates and great-circle distance

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Point};
use serde::Serialize;

use crate::{COORDINATE_EPSILON, EARTH_RADIUS_METERS, Error, Meters};

/// Geographic point with latitude in [-90, 90] and longitude in [-180, 180]
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting out-of-range or non-finite values
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfRange`] if either component is outside its range
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::CoordinateOutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance in meters on a spherical Earth
    pub fn distance_to(&self, other: &GeoPoint) -> Meters {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }

    /// Planar coordinate in (x = longitude, y = latitude) order
    pub fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// `[longitude, latitude]` pair, the GeoJSON position order
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < COORDINATE_EPSILON
            && (self.longitude - other.longitude).abs() < COORDINATE_EPSILON
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        Point(point.to_coord())
    }
}

impl TryFrom<Coord<f64>> for GeoPoint {
    type Error = Error;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        GeoPoint::new(coord.y, coord.x)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Parses the `lat,lon` query format
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedCoordinate(s.to_string());

        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        if lon.contains(',') {
            return Err(malformed());
        }

        let latitude = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| malformed())?;

        GeoPoint::new(latitude, longitude)
    }
}
