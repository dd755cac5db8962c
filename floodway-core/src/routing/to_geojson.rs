use geo::{Coord, LineString};
use geojson::{Feature, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;

use super::RouteResult;

impl RouteResult {
    /// Converts the route to a `GeoJSON` `Feature` with a `LineString` geometry.
    /// The metrics are attached as a foreign `meta` member.
    pub fn to_geojson(&self) -> Result<Feature, Error> {
        let line = LineString::new(
            self.path
                .iter()
                .map(|&[lon, lat]| Coord { x: lon, y: lat })
                .collect(),
        );
        let geometry = Geometry::new(GeoJsonValue::from(&line));
        let distance_km = (self.meta.total_distance_meters / 10.0).round() / 100.0;

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "routeType": "evacuation",
                "distanceKm": distance_km,
            }
        });
        let mut feature =
            Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;

        let meta = serde_json::to_value(&self.meta).map_err(|e| Error::GeoJsonError(e.to_string()))?;
        feature
            .foreign_members
            .get_or_insert_with(JsonObject::new)
            .insert("meta".to_string(), meta);

        Ok(feature)
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
