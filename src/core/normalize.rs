//! Field extraction over the many record shapes open-data portals publish.
//!
//! Every function here is pure: it reads a [`Record`] and never mutates it.

use crate::core::{Coordinates, Playground, Record};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Direct latitude/longitude column pairs, tried in order.
const COORDINATE_PAIRS: [(&str, &str); 10] = [
    ("lat", "lon"),
    ("latitude", "longitude"),
    ("y", "x"),
    ("LAT", "LON"),
    ("Lat", "Long"),
    ("LATITUDE", "LONGITUDE"),
    ("lat_dd", "lon_dd"),
    ("lat_wgs84", "lon_wgs84"),
    ("Latitude", "Longitude"),
    ("Y", "X"),
];

const WKT_FIELDS: [&str; 5] = ["location", "geom", "geometry", "point", "wkt"];

const TITLE_FIELDS: [&str; 9] = [
    "name",
    "Name",
    "SITE_NAME",
    "site_name",
    "park_name",
    "PlaygroundName",
    "title",
    "TITLE",
    "Facility",
];

pub const DEFAULT_TITLE: &str = "Playground";

const SUBTITLE_GROUPS: [&[&str]; 4] = [
    &["address", "Address", "ADDRESS"],
    &["suburb", "Suburb", "SUBURB"],
    &["municipality", "council", "LGA", "local_government_area"],
    &["postcode", "Postcode", "POSTCODE"],
];

pub const SUBTITLE_SEPARATOR: &str = " • ";

// "lat, lon" as CKAN renders geo_point_2d when it is flattened to text.
static GEO_POINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?[0-9]+\.?[0-9]*)\s*,\s*(-?[0-9]+\.?[0-9]*)")
        .expect("geo point pattern is valid")
});

// WKT orders coordinates as "lon lat".
static WKT_POINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)POINT\s*\(\s*(-?[0-9]+\.?[0-9]*)\s+(-?[0-9]+\.?[0-9]*)\s*\)")
        .expect("WKT point pattern is valid")
});

/// Find a coordinate pair in a record, trying direct columns, CKAN
/// `geo_point_2d`, WKT point strings and GeoJSON geometry in that order.
pub fn extract_coords(record: &Record) -> Option<Coordinates> {
    for (lat_key, lon_key) in COORDINATE_PAIRS {
        let lat = record.get(lat_key).and_then(as_number);
        let lon = record.get(lon_key).and_then(as_number);
        if let (Some(lat), Some(lon)) = (lat, lon) {
            return Coordinates::new(lat, lon);
        }
    }

    if let Some(coords) = record
        .get("geo_point_2d")
        .filter(|v| is_truthy(v))
        .and_then(geo_point_coords)
    {
        return Some(coords);
    }

    if let Some(Value::String(wkt)) = first_truthy(record, &WKT_FIELDS) {
        if let Some(coords) = wkt_point_coords(wkt) {
            return Some(coords);
        }
    }

    if let Some(Value::Object(geometry)) = record.get("geometry") {
        if let Some(Value::Array(coordinates)) = geometry.get("coordinates") {
            let lon = coordinates.first().and_then(Value::as_f64);
            let lat = coordinates.get(1).and_then(Value::as_f64);
            if let (Some(lat), Some(lon)) = (lat, lon) {
                return Coordinates::new(lat, lon);
            }
        }
    }

    None
}

fn geo_point_coords(value: &Value) -> Option<Coordinates> {
    match value {
        Value::Object(point) => {
            let lat = point.get("lat").filter(|v| !v.is_null())?;
            let lon = point.get("lon").filter(|v| !v.is_null())?;
            Coordinates::new(as_number(lat)?, as_number(lon)?)
        }
        Value::String(text) => {
            let caps = GEO_POINT_PATTERN.captures(text)?;
            let lat = caps[1].parse::<f64>().ok()?;
            let lon = caps[2].parse::<f64>().ok()?;
            Coordinates::new(lat, lon)
        }
        _ => None,
    }
}

fn wkt_point_coords(text: &str) -> Option<Coordinates> {
    let caps = WKT_POINT_PATTERN.captures(text)?;
    let lon = caps[1].parse::<f64>().ok()?;
    let lat = caps[2].parse::<f64>().ok()?;
    Coordinates::new(lat, lon)
}

/// Friendly title for the list and the map popup.
pub fn record_title(record: &Record) -> String {
    first_truthy(record, &TITLE_FIELDS)
        .map(display_value)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Address, suburb, council and postcode joined into one line.
pub fn record_subtitle(record: &Record) -> String {
    SUBTITLE_GROUPS
        .iter()
        .filter_map(|keys| first_truthy(record, keys))
        .map(display_value)
        .collect::<Vec<_>>()
        .join(SUBTITLE_SEPARATOR)
}

pub fn to_playground(record: Record) -> Playground {
    Playground {
        title: record_title(&record),
        subtitle: record_subtitle(&record),
        coords: extract_coords(&record),
        record,
    }
}

fn first_truthy<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|value| is_truthy(value))
}

/// null, false, 0 and "" are empty; objects and arrays never are.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_geo_fields_returns_none() {
        let rec = record(json!({"name": "Edinburgh Gardens", "suburb": "Fitzroy North"}));
        assert_eq!(extract_coords(&rec), None);
        assert_eq!(extract_coords(&Record::new()), None);
    }

    #[test]
    fn test_direct_numeric_pair() {
        let rec = record(json!({"lat": -37.8136, "lon": 144.9631}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.8136, 144.9631));
    }

    #[test]
    fn test_direct_string_pair_from_csv() {
        let rec = record(json!({"Latitude": " -37.79 ", "Longitude": "144.98"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.79, 144.98));
    }

    #[test]
    fn test_pair_priority_order() {
        // (y, x) comes before (LAT, LON)
        let rec = record(json!({"LAT": "-38.0", "LON": "145.0", "y": "-37.5", "x": "144.5"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.5, 144.5));
    }

    #[test]
    fn test_incomplete_or_non_numeric_pair_is_skipped() {
        let rec = record(json!({
            "lat": "-37.8",
            "lon": "",
            "latitude": "n/a",
            "longitude": "144.9",
            "lat_dd": "-37.81",
            "lon_dd": "144.96"
        }));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.81, 144.96));
    }

    #[test]
    fn test_non_finite_strings_are_not_numbers() {
        let rec = record(json!({"lat": "inf", "lon": "144.9", "Y": "NaN", "X": "1"}));
        assert_eq!(extract_coords(&rec), None);
    }

    #[test]
    fn test_geo_point_object() {
        let rec = record(json!({"geo_point_2d": {"lat": -37.7, "lon": "145.1"}}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.7, 145.1));
    }

    #[test]
    fn test_geo_point_object_with_null_member() {
        let rec = record(json!({"geo_point_2d": {"lat": null, "lon": 145.1}}));
        assert_eq!(extract_coords(&rec), None);
    }

    #[test]
    fn test_geo_point_string() {
        let rec = record(json!({"geo_point_2d": "-37.8136, 144.9631"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.8136, 144.9631));
    }

    #[test]
    fn test_geo_point_string_skips_non_ascii_digits() {
        let rec = record(json!({"geo_point_2d": "٣٧, ١٤٤ / -37.8136, 144.9631"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.8136, 144.9631));
    }

    #[test]
    fn test_wkt_point_skips_non_ascii_digits() {
        let rec = record(json!({"wkt": "POINT (١٤٤ ٣٧) POINT (145.0 -38.0)"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-38.0, 145.0));
    }

    #[test]
    fn test_wkt_point_swaps_lon_lat() {
        let rec = record(json!({"geom": "POINT (144.9631 -37.8136)"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.8136, 144.9631));

        let lower = record(json!({"wkt": "point(145 -38)"}));
        assert_eq!(extract_coords(&lower), Coordinates::new(-38.0, 145.0));
    }

    #[test]
    fn test_wkt_uses_first_non_empty_field() {
        let rec = record(json!({"location": "", "point": "POINT (145.2 -37.9)"}));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.9, 145.2));
    }

    #[test]
    fn test_geojson_coordinates() {
        let rec = record(json!({
            "geometry": {"type": "Point", "coordinates": [144.95, -37.82]}
        }));
        assert_eq!(extract_coords(&rec), Coordinates::new(-37.82, 144.95));
    }

    #[test]
    fn test_geojson_string_coordinates_are_rejected() {
        let rec = record(json!({
            "geometry": {"type": "Point", "coordinates": ["144.95", "-37.82"]}
        }));
        assert_eq!(extract_coords(&rec), None);
    }

    #[test]
    fn test_direct_pair_wins_over_geometry() {
        let rec = record(json!({
            "lat": -30.0,
            "lon": 140.0,
            "geometry": {"coordinates": [144.95, -37.82]}
        }));
        assert_eq!(extract_coords(&rec), Coordinates::new(-30.0, 140.0));
    }

    #[test]
    fn test_title_priority_and_default() {
        let rec = record(json!({"name": "", "SITE_NAME": "Fawkner Park", "title": "Other"}));
        assert_eq!(record_title(&rec), "Fawkner Park");

        let rec = record(json!({"Facility": 42}));
        assert_eq!(record_title(&rec), "42");

        assert_eq!(record_title(&Record::new()), DEFAULT_TITLE);
    }

    #[test]
    fn test_subtitle_joins_present_parts() {
        let rec = record(json!({
            "Address": "1 Park St",
            "SUBURB": "Carlton",
            "council": "Melbourne",
            "postcode": 3053
        }));
        assert_eq!(
            record_subtitle(&rec),
            "1 Park St • Carlton • Melbourne • 3053"
        );
    }

    #[test]
    fn test_subtitle_omits_empty_parts() {
        let rec = record(json!({"address": "", "suburb": "Brunswick", "LGA": null}));
        assert_eq!(record_subtitle(&rec), "Brunswick");
        assert_eq!(record_subtitle(&Record::new()), "");
    }

    #[test]
    fn test_to_playground() {
        let rec = record(json!({
            "park_name": "Princes Park",
            "suburb": "Carlton North",
            "geo_point_2d": "-37.78, 144.96"
        }));
        let playground = to_playground(rec.clone());
        assert_eq!(playground.title, "Princes Park");
        assert_eq!(playground.subtitle, "Carlton North");
        assert_eq!(playground.coords, Coordinates::new(-37.78, 144.96));
        assert_eq!(playground.record, rec);
    }
}
