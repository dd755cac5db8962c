//! Road and hazard data providers
//!
//! The routing engine only needs in-memory segment and zone lists. These
//! traits describe where they come from, and the GeoJSON implementations
//! cover the common case of data that has already been parsed into
//! [`geojson`] values.

use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde_json::Value as JsonValue;

use crate::{Error, GeoPoint, HazardZone, RoadSegment};

/// Supplies the road network. Failing here is fatal for the service.
pub trait RoadSource {
    fn road_segments(&self) -> Result<Vec<RoadSegment>, Error>;
}

/// Supplies hazard zones. Failures are logged and treated as "no hazards".
pub trait HazardSource {
    fn hazard_zones(&self) -> Result<Vec<HazardZone>, Error>;
}

impl RoadSource for Vec<RoadSegment> {
    fn road_segments(&self) -> Result<Vec<RoadSegment>, Error> {
        Ok(self.clone())
    }
}

impl HazardSource for Vec<HazardZone> {
    fn hazard_zones(&self) -> Result<Vec<HazardZone>, Error> {
        Ok(self.clone())
    }
}

/// Each LineString feature with n positions becomes n - 1 segments.
/// Other geometry types are ignored and broken features are skipped.
impl RoadSource for geojson::FeatureCollection {
    fn road_segments(&self) -> Result<Vec<RoadSegment>, Error> {
        let mut segments = Vec::new();

        for (index, feature) in self.features.iter().enumerate() {
            match feature_segments(feature) {
                Ok(feature_segments) => segments.extend(feature_segments),
                Err(e) => warn!("Skipping road feature {index}: {e}"),
            }
        }

        debug!(
            "Extracted {} road segments from {} features",
            segments.len(),
            self.features.len()
        );
        Ok(segments)
    }
}

/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
/// Polygons and MultiPolygons become zones, everything else is ignored.
/// A geometry that cannot be converted fails the whole source.
impl HazardSource for geojson::GeoJson {
    fn hazard_zones(&self) -> Result<Vec<HazardZone>, Error> {
        let geometries: Vec<&geojson::Geometry> = match self {
            geojson::GeoJson::FeatureCollection(collection) => collection
                .features
                .iter()
                .filter_map(|feature| feature.geometry.as_ref())
                .collect(),
            geojson::GeoJson::Feature(feature) => feature.geometry.iter().collect(),
            geojson::GeoJson::Geometry(geometry) => vec![geometry],
        };

        let mut zones = Vec::with_capacity(geometries.len());
        for geometry in geometries {
            match to_geo(geometry)? {
                geo::Geometry::Polygon(polygon) => zones.push(HazardZone::from(outer_ring(polygon))),
                geo::Geometry::MultiPolygon(parts) => zones.push(HazardZone::from(
                    parts.into_iter().map(outer_ring).collect::<geo::MultiPolygon<f64>>(),
                )),
                _ => debug!("Skipping non-polygonal hazard geometry"),
            }
        }

        Ok(zones)
    }
}

// Holes are not modelled, a hazard covers its whole outer ring
fn outer_ring(polygon: geo::Polygon<f64>) -> geo::Polygon<f64> {
    let (exterior, _) = polygon.into_inner();
    geo::Polygon::new(exterior, Vec::new())
}

fn to_geo(geometry: &geojson::Geometry) -> Result<geo::Geometry<f64>, Error> {
    geo::Geometry::<f64>::try_from(geometry.clone())
        .map_err(|e| Error::InvalidGeometry(e.to_string()))
}

fn feature_segments(feature: &geojson::Feature) -> Result<Vec<RoadSegment>, Error> {
    let Some(geometry) = feature.geometry.as_ref() else {
        trace!("Skipping feature without geometry");
        return Ok(Vec::new());
    };

    let geo::Geometry::LineString(line_string) = to_geo(geometry)? else {
        trace!("Skipping non-LineString road feature");
        return Ok(Vec::new());
    };

    let properties = string_properties(feature.properties.as_ref());

    line_string
        .lines()
        .map(|line| -> Result<RoadSegment, Error> {
            let start = GeoPoint::try_from(line.start)?;
            let end = GeoPoint::try_from(line.end)?;
            Ok(RoadSegment::from_points(start, end, properties.clone()))
        })
        .collect()
}

/// Keeps string and numeric properties, as strings
fn string_properties(
    properties: Option<&serde_json::Map<String, JsonValue>>,
) -> HashMap<String, String> {
    properties
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| match value {
            JsonValue::String(s) => Some((key.clone(), s.clone())),
            JsonValue::Number(n) => Some((key.clone(), n.to_string())),
            _ => None,
        })
        .collect()
}
