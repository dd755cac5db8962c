use std::sync::Arc;
use std::thread;

use floodway_core::{
    Endpoint, Error, ErrorKind, GeoPoint, GraphInfo, HazardSource, HazardZone, RouterConfig,
    RoutingService,
};

// Four streets around a block, (lon, lat)
const ROADS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "North Street", "highway": "primary"},
     "geometry": {"type": "LineString", "coordinates": [[21.01, 52.23], [21.02, 52.23], [21.03, 52.23]]}},
    {"type": "Feature", "properties": {"name": "South Street", "highway": "secondary"},
     "geometry": {"type": "LineString", "coordinates": [[21.01, 52.22], [21.03, 52.22]]}},
    {"type": "Feature", "properties": {"name": "West Avenue"},
     "geometry": {"type": "LineString", "coordinates": [[21.01, 52.23], [21.01, 52.22]]}},
    {"type": "Feature", "properties": {"name": "East Avenue"},
     "geometry": {"type": "LineString", "coordinates": [[21.03, 52.23], [21.03, 52.22]]}}
  ]
}"#;

// Covers the middle of North Street only
const FLOODS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"depth": 1.2},
     "geometry": {"type": "Polygon", "coordinates": [[
       [21.015, 52.225], [21.025, 52.225], [21.025, 52.235], [21.015, 52.235], [21.015, 52.225]
     ]]}}
  ]
}"#;

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

fn service() -> RoutingService {
    let roads: geojson::FeatureCollection = serde_json::from_str(ROADS).unwrap();
    let floods: geojson::GeoJson = FLOODS.parse().unwrap();
    RoutingService::from_sources(&roads, &floods, RouterConfig::default()).unwrap()
}

#[test]
fn evacuation_route_goes_around_the_flood() {
    let service = service();

    let route = service
        .compute_route("52.23,21.01".parse().unwrap(), "52.23,21.03".parse().unwrap())
        .unwrap();

    assert_eq!(
        route.path,
        vec![
            [21.01, 52.23],
            [21.01, 52.22],
            [21.03, 52.22],
            [21.03, 52.23]
        ]
    );
    assert_eq!(route.meta.node_count, 4);
    assert_eq!(route.meta.hazard_segments_traversed, 0);
    assert!(route.meta.avoided_hazard_segments >= 1);
    assert_eq!(route.meta.risk_score, 0.0);
    assert!((route.meta.total_distance_meters - 3586.0).abs() < 5.0);
}

#[test]
fn graph_info_reports_flooded_edges() {
    assert_eq!(
        service().graph_info(),
        GraphInfo {
            node_count: 5,
            edge_count: 10,
            hazard_edge_count: 4,
        }
    );
}

#[test]
fn far_away_start_is_rejected() {
    let err = service()
        .compute_route(point(50.0, 19.0), point(52.23, 21.03))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err,
        Error::SnapFailed {
            endpoint: Endpoint::Start,
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.contains("start"));
    assert!(message.contains("500m"));
}

#[test]
fn route_through_the_flood_when_unavoidable() {
    // From the middle of North Street, which sits inside the flood
    let route = service()
        .compute_route(point(52.23, 21.02), point(52.23, 21.03))
        .unwrap();

    assert_eq!(route.path.len(), 2);
    assert_eq!(route.meta.hazard_segments_traversed, 1);
    assert_eq!(route.meta.risk_score, 1.0);
}

#[test]
fn route_geojson_output() {
    let route = service()
        .compute_route(point(52.23, 21.01), point(52.23, 21.03))
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&route.to_geojson_string().unwrap()).unwrap();
    assert_eq!(json["type"], "Feature");
    assert_eq!(json["geometry"]["type"], "LineString");
    assert_eq!(json["geometry"]["coordinates"].as_array().unwrap().len(), 4);
    assert_eq!(json["properties"]["routeType"], "evacuation");
    assert_eq!(json["properties"]["distanceKm"], 3.59);
    assert_eq!(json["meta"]["nodeCount"], 4);
    assert_eq!(json["meta"]["riskScore"], 0.0);
}

struct UnreachableHazardStore;

impl HazardSource for UnreachableHazardStore {
    fn hazard_zones(&self) -> Result<Vec<HazardZone>, Error> {
        Err(Error::DataLoad("connection refused".to_string()))
    }
}

#[test]
fn hazard_outage_degrades_to_plain_shortest_path() {
    let roads: geojson::FeatureCollection = serde_json::from_str(ROADS).unwrap();
    let service =
        RoutingService::from_sources(&roads, &UnreachableHazardStore, RouterConfig::default())
            .unwrap();

    assert_eq!(service.graph_info().hazard_edge_count, 0);
    let route = service
        .compute_route(point(52.23, 21.01), point(52.23, 21.03))
        .unwrap();
    assert_eq!(route.path.len(), 3);
    assert_eq!(route.meta.avoided_hazard_segments, 0);
}

#[test]
fn concurrent_requests_share_one_graph() {
    let service = Arc::new(service());
    let expected = service
        .compute_route(point(52.23, 21.01), point(52.23, 21.03))
        .unwrap()
        .path;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service
                    .compute_route(point(52.23, 21.01), point(52.23, 21.03))
                    .unwrap()
                    .path
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }

    let batch = service.compute_routes(&[
        (point(52.23, 21.01), point(52.23, 21.03)),
        (point(52.22, 21.01), point(52.22, 21.03)),
    ]);
    assert_eq!(batch[0].as_ref().unwrap().path, expected);
    assert_eq!(batch[1].as_ref().unwrap().path.len(), 2);
}
