//! Ward lookups end to end against an in-process SQLite database.

#![cfg(feature = "sqlite")]

use serde_json::{json, Value};
use wards_core::config::QueryConfig;
use wards_query::{
    frame_features, LoadReport, QueryExecutor, SpatialQueries, SqliteExecutor, WardLocator,
    WardPatch, NOTHING_UPDATED, NO_NEARBY_WARDS, OUTSIDE_COUNTRY, WARD_NOT_FOUND,
};

const LAT: f64 = -1.286;
const LNG: f64 = 36.817;

fn square(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Value {
    json!([[
        [min_lng, min_lat],
        [max_lng, min_lat],
        [max_lng, max_lat],
        [min_lng, max_lat],
        [min_lng, min_lat]
    ]])
}

fn feature(id: i64, ward: &str, county: &str, constituency: &str, geometry: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "id": id,
            "ward": ward,
            "ward_code": format!("{:04}", id),
            "county": county,
            "county_code": 47,
            "constituency": constituency,
        },
        "geometry": geometry,
    })
}

fn polygon(rings: Value) -> Value {
    json!({"type": "Polygon", "coordinates": rings})
}

fn wards_geojson() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            feature(1, "Nairobi Central", "Nairobi", "Starehe",
                polygon(square(36.81, -1.29, 36.83, -1.27))),
            feature(2, "Kilimani", "Nairobi", "Dagoretti North",
                polygon(square(36.79, -1.29, 36.81, -1.27))),
            feature(3, "Parklands", "Nairobi", "Westlands",
                polygon(square(36.81, -1.27, 36.83, -1.24))),
            feature(4, "Old Town", "Mombasa", "Mvita",
                polygon(square(39.66, -4.07, 39.68, -4.05))),
            feature(5, "Lamu Islands", "Lamu", "Lamu West", json!({
                "type": "MultiPolygon",
                "coordinates": [
                    square(40.90, -2.28, 40.92, -2.26),
                    square(40.95, -2.30, 40.97, -2.28)
                ]
            })),
            feature(6, "Kisumu Central", "Kisumu", "Kisumu Central",
                polygon(square(34.75, -0.10, 34.77, -0.08))),
        ]
    })
    .to_string()
}

fn country_geojson() -> String {
    json!({
        "type": "Feature",
        "properties": {"name": "Kenya"},
        "geometry": polygon(square(33.9, -4.7, 41.9, 5.0)),
    })
    .to_string()
}

fn load(executor: &SqliteExecutor) {
    let queries = SpatialQueries::new(QueryConfig::default()).unwrap();
    executor.create_schema(&queries).unwrap();

    let report = executor.load_wards_geojson(&queries, &wards_geojson()).unwrap();
    assert_eq!(report, LoadReport { loaded: 6, skipped: 0 });
    executor.load_country_geojson(&queries, &country_geojson()).unwrap();
}

fn setup() -> SqliteExecutor {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    load(&executor);
    executor
}

fn locator(executor: &SqliteExecutor) -> WardLocator<&SqliteExecutor> {
    WardLocator::from_config(executor, QueryConfig::default()).unwrap()
}

fn ids<'a>(features: impl IntoIterator<Item = &'a wards_query::WardFeature>) -> Vec<i64> {
    features.into_iter().map(|f| f.ward.id).collect()
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

#[test]
fn point_in_country() {
    let executor = setup();
    let service = locator(&executor);

    assert_eq!(service.is_point_in_country(LAT, LNG).result(), Some(&true));

    let outside = service.is_point_in_country(0.0, 0.0);
    assert_eq!(outside.error(), Some(OUTSIDE_COUNTRY));
    assert!(outside.result().is_none());
}

#[test]
fn ward_at_point() {
    let executor = setup();
    let service = locator(&executor);

    let feature = service.ward_at(LAT, LNG).into_result().unwrap();
    assert_eq!(feature.ward.id, 1);
    assert_eq!(feature.ward.ward, "Nairobi Central");
    assert!(feature.geometry.is_some());

    let bbox = feature.bbox.unwrap();
    for (actual, expected) in bbox.as_array().into_iter().zip([36.81, -1.29, 36.83, -1.27]) {
        assert_close(actual, expected, 1e-9);
    }

    assert_eq!(service.ward_at(0.0, 0.0).error(), Some(WARD_NOT_FOUND));
}

#[test]
fn ward_at_point_in_second_part_of_multipolygon() {
    let executor = setup();
    let service = locator(&executor);

    let feature = service.ward_at(-2.29, 40.96).into_result().unwrap();
    assert_eq!(feature.ward.ward, "Lamu Islands");

    // Between the two islands: inside the bbox, outside both parts
    assert_eq!(service.ward_at(-2.28, 40.935).error(), Some(WARD_NOT_FOUND));
}

#[test]
fn nearby_wards_ordered_by_distance() {
    let executor = setup();
    let service = locator(&executor);

    let features = service.nearby_wards(LAT, LNG).into_result().unwrap();
    assert_eq!(ids(&features), vec![1, 2, 3]);

    let distances: Vec<f64> = features.iter().map(|f| f.distance.unwrap()).collect();
    assert_eq!(distances[0], 0.0);
    assert_close(distances[1], 778.2, 5.0);
    assert_close(distances[2], 1779.1, 5.0);
    assert!(features.iter().all(|f| f.geometry.is_some()));
}

#[test]
fn nearby_wards_radius_and_limit() {
    let executor = setup();
    let service = locator(&executor);

    let within = service.nearby_wards_within(LAT, LNG, 1000.0, 10);
    assert_eq!(ids(within.result().unwrap()), vec![1, 2]);

    let capped = service.nearby_wards_within(LAT, LNG, 5000.0, 1);
    assert_eq!(ids(capped.result().unwrap()), vec![1]);

    assert_eq!(service.nearby_wards(0.0, 0.0).error(), Some(NO_NEARBY_WARDS));
}

#[test]
fn neighbors_by_centroid_distance() {
    let executor = setup();
    let service = locator(&executor);

    let neighbors = service.neighbors_of(Some(1)).into_result().unwrap();
    assert_eq!(neighbors.len(), 5);
    assert_eq!(ids(&neighbors[..2]), vec![2, 3]);
    assert!(neighbors.iter().all(|f| f.ward.id != 1));
    assert_close(neighbors[0].distance.unwrap(), 2223.6, 5.0);
    assert_close(neighbors[1].distance.unwrap(), 2779.9, 5.0);

    let capped = WardLocator::from_config(
        &executor,
        QueryConfig {
            neighbor_max_distance_m: Some(10_000.0),
            ..Default::default()
        },
    )
    .unwrap();
    let near = capped.neighbors_of(Some(1)).into_result().unwrap();
    assert_eq!(ids(&near), vec![2, 3]);

    let reference = service.ward_by_id(1).into_result().unwrap();
    let viewport = frame_features(std::iter::once(&reference).chain(&near)).unwrap();
    assert_close(viewport.center.longitude, 36.81, 1e-9);
    assert_eq!(viewport.zoom, 12);

    assert!(service.neighbors_of(None).error().is_some());
    assert_eq!(service.neighbors_of(Some(999)).error(), Some(NO_NEARBY_WARDS));
}

#[test]
fn malformed_stored_geometry_fails_closed() {
    let executor = setup();
    let service = locator(&executor);

    let changed = executor
        .execute("UPDATE kenya_wards SET geom = 'garbage' WHERE id = 6")
        .unwrap();
    assert_eq!(changed, 1);

    let feature = service.ward_by_id(6).into_result().unwrap();
    assert!(feature.geometry.is_none());
    let bbox = feature.bbox.unwrap();
    assert_close(bbox.min_lng, 34.75, 1e-9);
    assert_close(bbox.max_lat, -0.08, 1e-9);

    assert_eq!(service.ward_at(-0.09, 34.76).error(), Some(WARD_NOT_FOUND));
    assert_eq!(service.nearby_wards(-0.09, 34.76).error(), Some(NO_NEARBY_WARDS));
}

#[test]
fn search_by_name_county_or_constituency() {
    let executor = setup();
    let service = locator(&executor);

    let found = service.search_wards("kili").into_result().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ward, "Kilimani");

    let nairobi = service.search_wards("NAIROBI").into_result().unwrap();
    let names: Vec<&str> = nairobi.iter().map(|w| w.ward.as_str()).collect();
    assert_eq!(names, vec!["Kilimani", "Nairobi Central", "Parklands"]);

    let by_constituency = service.search_wards("mvita").into_result().unwrap();
    assert_eq!(by_constituency[0].ward, "Old Town");

    assert!(service.search_wards("%").into_result().unwrap().is_empty());
    assert!(service.search_wards("o'brien").into_result().unwrap().is_empty());
}

#[test]
fn update_ward_attributes() {
    let executor = setup();
    let service = locator(&executor);

    let patch = WardPatch {
        ward_code: Some(None),
        sub_county: Some(Some("Dagoretti North".to_string())),
        ..Default::default()
    };
    assert_eq!(service.update_ward(2, &patch).result(), Some(&1));

    let ward = service.ward_by_id(2).into_result().unwrap().ward;
    assert_eq!(ward.ward_code, None);
    assert_eq!(ward.sub_county.as_deref(), Some("Dagoretti North"));
    assert_eq!(ward.ward, "Kilimani");

    assert_eq!(service.update_ward(999, &patch).error(), Some(NOTHING_UPDATED));
    assert!(service.update_ward(2, &WardPatch::default()).error().is_some());
}

#[test]
fn load_skips_bad_features() {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    let queries = SpatialQueries::new(QueryConfig::default()).unwrap();
    executor.create_schema(&queries).unwrap();

    let text = json!({
        "type": "FeatureCollection",
        "features": [
            feature(1, "Good", "Nairobi", "Starehe", polygon(square(36.0, -1.0, 36.1, -0.9))),
            feature(2, "Open Ring", "Nairobi", "Starehe", polygon(json!([[[0, 0], [1, 0], [1, 1], [0, 1]]]))),
            feature(1, "Duplicate Id", "Nairobi", "Starehe", polygon(square(36.0, -1.0, 36.1, -0.9))),
        ]
    })
    .to_string();

    let report = executor.load_wards_geojson(&queries, &text).unwrap();
    assert_eq!(report, LoadReport { loaded: 1, skipped: 2 });
}

#[test]
fn file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wards.db");

    load(&SqliteExecutor::open(&path).unwrap());

    let reopened = SqliteExecutor::open(&path).unwrap();
    let feature = locator(&reopened).ward_at(LAT, LNG).into_result().unwrap();
    assert_eq!(feature.ward.id, 1);
}
