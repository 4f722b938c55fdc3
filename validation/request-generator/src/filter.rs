//! Spatial filter loaded from a GeoJSON dataset.

use std::fs;
use std::path::Path;

use geo::{coord, BooleanOps, Contains, Geometry, MultiPolygon, Polygon, Rect};
use geojson::GeoJson;
use tracing::{info, warn};
use wms_common::BoundingBox;

use crate::error::{GeneratorError, GeneratorResult};
use crate::provider::ContainmentFilter;

/// Union of every polygon in a dataset.
#[derive(Debug, Clone)]
pub struct FilterGeometry {
    area: MultiPolygon<f64>,
    polygons: usize,
}

impl FilterGeometry {
    /// Load a GeoJSON FeatureCollection, Feature, or bare Geometry.
    ///
    /// Features without geometry are skipped; a dataset with no geometry
    /// at all is an error.
    pub fn load(path: &Path) -> GeneratorResult<Self> {
        let dataset_error = |message: String| GeneratorError::Dataset {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| dataset_error(e.to_string()))?;
        let filter = Self::from_geojson_str(&content).map_err(dataset_error)?;
        info!(
            path = %path.display(),
            polygons = filter.len(),
            parts = filter.area.0.len(),
            "loaded filter geometry"
        );
        Ok(filter)
    }

    /// Parse GeoJSON text into a filter.
    pub fn from_geojson_str(text: &str) -> Result<Self, String> {
        let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| e.to_string())?;

        let geometries = match geojson {
            GeoJson::FeatureCollection(collection) => {
                let mut geometries = Vec::with_capacity(collection.features.len());
                for (index, feature) in collection.features.into_iter().enumerate() {
                    match feature.geometry {
                        Some(geometry) => geometries.push(geometry),
                        None => warn!(feature = index, "skipping feature without geometry"),
                    }
                }
                geometries
            }
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::Geometry(geometry) => vec![geometry],
        };
        if geometries.is_empty() {
            return Err("dataset contains no geometry".to_string());
        }

        let mut polygons = Vec::new();
        for geometry in geometries {
            let geometry = Geometry::<f64>::try_from(geometry).map_err(|e| e.to_string())?;
            push_polygons(geometry, &mut polygons);
        }

        let count = polygons.len();
        let mut parts = polygons.into_iter().map(|p| MultiPolygon::new(vec![p]));
        let first = parts
            .next()
            .ok_or_else(|| "dataset contains no polygon geometry".to_string())?;
        // Overlapping and adjacent features merge into one area.
        let area = parts.fold(first, |union, part| union.union(&part));

        Ok(Self {
            area,
            polygons: count,
        })
    }

    /// Number of source polygons merged into the filter.
    pub fn len(&self) -> usize {
        self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons == 0
    }

    /// Rectangular polygon covering a bbox.
    pub fn rectangle(bbox: &BoundingBox) -> Polygon<f64> {
        Rect::new(
            coord! { x: bbox.min_x, y: bbox.min_y },
            coord! { x: bbox.max_x, y: bbox.max_y },
        )
        .to_polygon()
    }
}

/// Collect the polygonal parts of a geometry. Points and lines have no area
/// and can never contain a box.
fn push_polygons(geometry: Geometry<f64>, polygons: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(polygon) => polygons.push(polygon),
        Geometry::MultiPolygon(multi) => polygons.extend(multi),
        Geometry::Rect(rect) => polygons.push(rect.to_polygon()),
        Geometry::Triangle(triangle) => polygons.push(triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                push_polygons(geometry, polygons);
            }
        }
        _ => warn!("skipping geometry without area"),
    }
}

impl ContainmentFilter for FilterGeometry {
    fn contains(&self, bbox: &BoundingBox) -> bool {
        self.area.contains(&Self::rectangle(bbox))
    }
}
