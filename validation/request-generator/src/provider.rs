//! Geometry capability used for filtering and reprojection.
//!
//! The sample generator only sees the [`ContainmentFilter`] and
//! [`CoordinateTransform`] traits. A [`GeometryProvider`] builds them from
//! the configuration before generation starts; without one, `-filter_within`
//! and `-srs2` are configuration errors.

use std::path::Path;

use wms_common::BoundingBox;

use crate::error::GeneratorResult;

/// Accept/reject test for candidate boxes.
pub trait ContainmentFilter {
    /// True when the rectangle is fully inside the filter geometry.
    fn contains(&self, bbox: &BoundingBox) -> bool;
}

/// Point mapping from the input SRS to the output SRS.
pub trait CoordinateTransform {
    /// Transform points, failing if any point cannot be mapped.
    fn transform_points(&self, points: &[(f64, f64)]) -> GeneratorResult<Vec<(f64, f64)>>;
}

/// Builds filters and transforms.
pub trait GeometryProvider {
    /// Load every geometry of the dataset at `path` into one filter.
    fn load_filter(&self, path: &Path) -> GeneratorResult<Box<dyn ContainmentFilter>>;

    /// Build a transform between two EPSG codes.
    fn build_transform(
        &self,
        source_epsg: u32,
        target_epsg: u32,
    ) -> GeneratorResult<Box<dyn CoordinateTransform>>;
}

impl<F> ContainmentFilter for F
where
    F: Fn(&BoundingBox) -> bool,
{
    fn contains(&self, bbox: &BoundingBox) -> bool {
        self(bbox)
    }
}

/// The provider compiled into this build, if any.
pub fn default_provider() -> Option<Box<dyn GeometryProvider>> {
    #[cfg(feature = "geometry")]
    {
        Some(Box::new(geometry::GeoProvider))
    }
    #[cfg(not(feature = "geometry"))]
    {
        None
    }
}

#[cfg(feature = "geometry")]
pub mod geometry {
    //! Provider backed by `geo`/`geojson` for filtering and `projection`
    //! (proj4rs) for reprojection.

    use std::path::Path;

    use projection::{CoordTransformer, EpsgCode};

    use super::{ContainmentFilter, CoordinateTransform, GeometryProvider};
    use crate::error::{GeneratorError, GeneratorResult};
    use crate::filter::FilterGeometry;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct GeoProvider;

    impl GeometryProvider for GeoProvider {
        fn load_filter(&self, path: &Path) -> GeneratorResult<Box<dyn ContainmentFilter>> {
            Ok(Box::new(FilterGeometry::load(path)?))
        }

        fn build_transform(
            &self,
            source_epsg: u32,
            target_epsg: u32,
        ) -> GeneratorResult<Box<dyn CoordinateTransform>> {
            let transformer =
                CoordTransformer::new(EpsgCode::new(source_epsg), EpsgCode::new(target_epsg))
                    .map_err(|e| GeneratorError::Projection(e.to_string()))?;
            Ok(Box::new(transformer))
        }
    }

    impl CoordinateTransform for CoordTransformer {
        fn transform_points(&self, points: &[(f64, f64)]) -> GeneratorResult<Vec<(f64, f64)>> {
            CoordTransformer::transform_points(self, points)
                .map_err(|e| GeneratorError::Projection(e.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_unknown_epsg_is_projection_error() {
            let err = GeoProvider.build_transform(4326, 99999).err().unwrap();
            assert!(matches!(err, GeneratorError::Projection(_)));
            assert!(err.to_string().contains("EPSG:99999"));
        }

        #[test]
        fn test_transform_points() {
            let transform = GeoProvider.build_transform(4326, 3857).unwrap();
            let points = transform.transform_points(&[(0.0, 0.0), (90.0, 0.0)]).unwrap();
            assert!(points[0].0.abs() < 1e-6);
            assert!((points[1].0 - 10_018_754.171394622).abs() < 1e-3);
        }

        #[test]
        fn test_missing_dataset() {
            let err = GeoProvider
                .load_filter(Path::new("/nonexistent/filter.geojson"))
                .err()
                .unwrap();
            assert!(matches!(err, GeneratorError::Dataset { .. }));
        }
    }
}
