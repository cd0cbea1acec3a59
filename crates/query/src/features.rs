//! Reading ward and boundary data from GeoJSON documents.

use crate::{NewWard, QueryError, Result};
use serde_json::Value;
use tracing::warn;
use wards_geo::{GeoError, Geometry};

/// Ward features read from a `FeatureCollection`.
#[derive(Debug, Default)]
pub struct WardFeatures {
    /// Wards with their outlines, in document order
    pub wards: Vec<(NewWard, Geometry)>,
    /// Features dropped for missing properties or bad geometry
    pub skipped: usize,
}

/// Read ward features from a GeoJSON `FeatureCollection`.
///
/// Attributes come from each feature's `properties`. A missing `id`
/// property falls back to the feature's own `id`, then to its 1-based
/// position. Features that fail to decode are skipped and counted.
pub fn parse_ward_features(text: &str) -> Result<WardFeatures> {
    let document: Value = serde_json::from_str(text)?;
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(no_features)?;

    let mut parsed = WardFeatures::default();
    for (index, feature) in features.iter().enumerate() {
        match decode_ward(feature, index) {
            Ok(ward) => parsed.wards.push(ward),
            Err(err) => {
                warn!(feature = index, error = %err, "Skipping ward feature");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

fn no_features() -> QueryError {
    wards_core::Error::validation("GeoJSON document has no features").into()
}

fn decode_ward(feature: &Value, index: usize) -> Result<(NewWard, Geometry)> {
    let mut properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if !properties.get("id").is_some_and(Value::is_i64) {
        let id = feature
            .get("id")
            .and_then(Value::as_i64)
            .unwrap_or(index as i64 + 1);
        properties.insert("id".to_string(), Value::from(id));
    }

    let ward: NewWard = serde_json::from_value(Value::Object(properties))?;
    let geometry = feature
        .get("geometry")
        .ok_or(GeoError::MissingType)
        .and_then(Geometry::from_value)?;
    Ok((ward, geometry))
}

/// Read a national boundary from a bare geometry, a `Feature`, or the
/// first feature of a `FeatureCollection`. Returns the `name` property
/// (default `"country"`) and the outline.
pub fn parse_boundary(text: &str) -> Result<(String, Geometry)> {
    let document: Value = serde_json::from_str(text)?;

    let feature = match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => document
            .get("features")
            .and_then(Value::as_array)
            .and_then(|features| features.first())
            .ok_or_else(no_features)?,
        _ => &document,
    };

    let (name, geometry) = match feature.get("type").and_then(Value::as_str) {
        Some("Feature") => (
            feature
                .pointer("/properties/name")
                .and_then(Value::as_str)
                .map(str::to_string),
            feature.get("geometry").ok_or(GeoError::MissingType)?,
        ),
        _ => (None, feature),
    };

    let geometry = Geometry::from_value(geometry).map_err(QueryError::from)?;
    Ok((name.unwrap_or_else(|| "country".to_string()), geometry))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[36.81,-1.29],[36.83,-1.29],[36.83,-1.27],[36.81,-1.27],[36.81,-1.29]]]}"#;

    #[test]
    fn test_parse_ward_features() {
        let text = format!(
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","id":7,"properties":{{"ward":"Nairobi Central","county":"Nairobi","constituency":"Starehe","county_code":47}},"geometry":{SQUARE}}},
                {{"type":"Feature","properties":{{"id":9,"ward":"Kilimani","county":"Nairobi","constituency":"Dagoretti North"}},"geometry":{SQUARE}}},
                {{"type":"Feature","properties":{{"ward":"No Outline","county":"Nairobi","constituency":"Starehe"}},"geometry":null}},
                {{"type":"Feature","properties":{{"county":"Nairobi"}},"geometry":{SQUARE}}},
                {{"type":"Feature","properties":{{"ward":"Third","county":"Nairobi","constituency":"Starehe"}},"geometry":{SQUARE}}}
            ]}}"#
        );

        let parsed = parse_ward_features(&text).unwrap();
        assert_eq!(parsed.skipped, 2);

        let ids: Vec<i64> = parsed.wards.iter().map(|(ward, _)| ward.id).collect();
        assert_eq!(ids, vec![7, 9, 5]);
        assert_eq!(parsed.wards[0].0.county_code, Some(47));
        assert!(parsed.wards[0].0.bbox.is_none());
    }

    #[test]
    fn test_parse_ward_features_requires_collection() {
        assert!(parse_ward_features(SQUARE).is_err());
        assert!(parse_ward_features("not json").is_err());
    }

    #[test]
    fn test_parse_boundary_forms() {
        let (name, geometry) = parse_boundary(SQUARE).unwrap();
        assert_eq!(name, "country");
        assert_eq!(geometry.kind(), "Polygon");

        let feature = format!(
            r#"{{"type":"Feature","properties":{{"name":"Kenya"}},"geometry":{SQUARE}}}"#
        );
        assert_eq!(parse_boundary(&feature).unwrap().0, "Kenya");

        let collection = format!(r#"{{"type":"FeatureCollection","features":[{feature}]}}"#);
        assert_eq!(parse_boundary(&collection).unwrap().0, "Kenya");
    }

    #[test]
    fn test_parse_boundary_rejects_points() {
        let point = r#"{"type":"Point","coordinates":[36.8,-1.3]}"#;
        assert!(matches!(parse_boundary(point), Err(QueryError::Geometry(_))));
    }
}
