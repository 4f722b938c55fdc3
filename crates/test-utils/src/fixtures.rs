//! Common test fixtures for request generator tests.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Common regions as (min_x, min_y, max_x, max_y).
pub mod regions {
    /// Unit-less 10x10 square.
    pub const SQUARE_10: (f64, f64, f64, f64) = (0.0, 0.0, 10.0, 10.0);
}

/// Closed polygon ring for a rectangle.
fn ring(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Value {
    json!([[
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
        [min_x, min_y]
    ]])
}

/// GeoJSON Feature holding a rectangular polygon.
pub fn rect_feature(rect: (f64, f64, f64, f64)) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": ring(rect.0, rect.1, rect.2, rect.3)
        }
    })
}

/// GeoJSON FeatureCollection with one rectangular polygon per entry.
pub fn rect_feature_collection(rects: &[(f64, f64, f64, f64)]) -> String {
    let features: Vec<Value> = rects.iter().copied().map(rect_feature).collect();
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// GeoJSON FeatureCollection whose only feature has a null geometry.
pub fn empty_geometry_collection() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [{ "type": "Feature", "properties": {}, "geometry": null }]
    })
    .to_string()
}

/// Create a scratch directory removed when the handle drops.
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("failed to create scratch dir")
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_feature_collection_shape() {
        let text = rect_feature_collection(&[regions::SQUARE_10, (20.0, 20.0, 30.0, 30.0)]);
        let value: Value = serde_json::from_str(&text).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["coordinates"][0][2], json!([10.0, 10.0]));
    }

    #[test]
    fn test_write_fixture() {
        let dir = scratch_dir();
        let path = write_fixture(dir.path(), "filter.geojson", "{}");
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }
}
