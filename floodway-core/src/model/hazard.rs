//! Hazard zone geometry
//!
//! All geometry here is planar in (longitude, latitude) degrees. The
//! distortion is negligible at the scale of a single city, which is the only
//! scale this crate targets.

use geo::{
    BooleanOps, BoundingRect, Coord, Intersects, Line, LineString, MultiPolygon, Polygon, Rect,
};

use crate::{Error, GeoPoint};

/// Straight line between two points, used for segment/zone intersection tests
pub fn segment_line(start: &GeoPoint, end: &GeoPoint) -> Line<f64> {
    Line::new(start.to_coord(), end.to_coord())
}

/// A (possibly multi-part) area that routes should avoid
#[derive(Debug, Clone)]
pub struct HazardZone {
    geometry: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl HazardZone {
    /// Builds a zone from one ring of `(longitude, latitude)` pairs.
    /// The ring is closed if the last position differs from the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the ring has fewer than three positions
    pub fn from_ring(ring: &[(f64, f64)]) -> Result<Self, Error> {
        Ok(Self::from(ring_polygon(ring)?))
    }

    /// Builds a zone from several outer rings, unioned into one geometry
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if there are no rings or any ring is invalid
    pub fn from_rings<R: AsRef<[(f64, f64)]>>(rings: &[R]) -> Result<Self, Error> {
        let polygons = rings
            .iter()
            .map(|ring| ring_polygon(ring.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if polygons.is_empty() {
            return Err(Error::InvalidGeometry(
                "hazard zone requires at least one ring".to_string(),
            ));
        }

        Ok(Self::from(MultiPolygon::new(polygons)))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Non-strict intersection: touching the boundary counts
    pub fn intersects_line(&self, line: &Line<f64>) -> bool {
        self.bounds.is_some_and(|bounds| bounds.intersects(line)) && self.geometry.intersects(line)
    }
}

impl From<Polygon<f64>> for HazardZone {
    fn from(polygon: Polygon<f64>) -> Self {
        let geometry = MultiPolygon::new(vec![polygon]);
        let bounds = geometry.bounding_rect();
        Self { geometry, bounds }
    }
}

impl From<MultiPolygon<f64>> for HazardZone {
    /// Overlapping parts are unioned so the zone is a single valid geometry
    fn from(parts: MultiPolygon<f64>) -> Self {
        let mut polygons = parts.0.into_iter();
        let geometry = match polygons.next() {
            Some(first) => polygons.fold(MultiPolygon::new(vec![first]), |acc, polygon| {
                acc.union(&MultiPolygon::new(vec![polygon]))
            }),
            None => MultiPolygon::new(Vec::new()),
        };
        let bounds = geometry.bounding_rect();
        Self { geometry, bounds }
    }
}

fn ring_polygon(ring: &[(f64, f64)]) -> Result<Polygon<f64>, Error> {
    let mut coords: Vec<Coord<f64>> = ring.iter().map(|&(x, y)| Coord { x, y }).collect();

    if let (Some(&first), Some(&last)) = (coords.first(), coords.last())
        && first != last
    {
        coords.push(first);
    }

    // A closed ring needs three distinct positions plus the closing one
    if coords.len() < 4 {
        return Err(Error::InvalidGeometry(format!(
            "polygon ring needs at least 3 distinct positions, got {}",
            ring.len()
        )));
    }

    Ok(Polygon::new(LineString::new(coords), Vec::new()))
}
