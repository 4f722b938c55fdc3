//! Coordinate transforms between two EPSG systems.

use std::f64::consts::PI;
use std::fmt;

use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use tracing::debug;

use crate::epsg::EpsgCode;
use crate::error::{ProjectionError, ProjectionResult};

/// Earth radius used by spherical mercator (meters).
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// How a transformer maps points.
enum Strategy {
    /// Source and target are the same system.
    Identity,
    /// Inline math for EPSG:4326 -> EPSG:3857.
    LonLatToWebMercator,
    /// Generic proj4rs transform.
    Proj {
        source: Box<Proj>,
        target: Box<Proj>,
    },
}

/// Reusable transformer from a source to a target EPSG system.
///
/// Geographic systems take and return degrees; radian conversion for
/// proj4rs happens internally.
pub struct CoordTransformer {
    source: EpsgCode,
    target: EpsgCode,
    strategy: Strategy,
}

impl fmt::Debug for CoordTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            Strategy::Identity => "identity",
            Strategy::LonLatToWebMercator => "lonlat-to-web-mercator",
            Strategy::Proj { .. } => "proj4rs",
        };
        f.debug_struct("CoordTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("strategy", &strategy)
            .finish()
    }
}

impl CoordTransformer {
    /// Create a transformer between two EPSG systems.
    ///
    /// # Errors
    /// Fails when either code is missing from the definition table or when
    /// proj4rs rejects the definition.
    pub fn new(source: EpsgCode, target: EpsgCode) -> ProjectionResult<Self> {
        let source_def = source
            .proj_string()
            .ok_or(ProjectionError::UnknownCode(source.code()))?;
        let target_def = target
            .proj_string()
            .ok_or(ProjectionError::UnknownCode(target.code()))?;

        let web_mercator = EpsgCode::WEB_MERCATOR.proj_string();
        let strategy = if source_def == target_def {
            Strategy::Identity
        } else if source == EpsgCode::WGS84
            && web_mercator.as_deref() == Some(target_def.as_ref())
        {
            Strategy::LonLatToWebMercator
        } else {
            Strategy::Proj {
                source: Box::new(parse_proj(source, &source_def)?),
                target: Box::new(parse_proj(target, &target_def)?),
            }
        };

        let transformer = Self {
            source,
            target,
            strategy,
        };
        debug!(?transformer, "built coordinate transformer");
        Ok(transformer)
    }

    /// Transform one point from the source to the target system.
    pub fn transform(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        let (out_x, out_y) = match &self.strategy {
            Strategy::Identity => (x, y),
            Strategy::LonLatToWebMercator => {
                if y.abs() >= 90.0 {
                    return Err(self.failure(x, y, "latitude out of mercator range".to_string()));
                }
                lonlat_to_web_mercator(x, y)
            }
            Strategy::Proj { source, target } => {
                let mut point = if self.source.is_geographic() {
                    (x.to_radians(), y.to_radians(), 0.0)
                } else {
                    (x, y, 0.0)
                };

                transform(source, target, &mut point)
                    .map_err(|e| self.failure(x, y, format!("{e:?}")))?;

                if self.target.is_geographic() {
                    (point.0.to_degrees(), point.1.to_degrees())
                } else {
                    (point.0, point.1)
                }
            }
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(self.failure(x, y, "result is not finite".to_string()));
        }
        Ok((out_x, out_y))
    }

    /// Transform a list of points, failing on the first bad one.
    pub fn transform_points(&self, points: &[(f64, f64)]) -> ProjectionResult<Vec<(f64, f64)>> {
        points.iter().map(|&(x, y)| self.transform(x, y)).collect()
    }

    fn failure(&self, x: f64, y: f64, message: String) -> ProjectionError {
        ProjectionError::TransformFailed {
            source_code: self.source.code(),
            target_code: self.target.code(),
            x,
            y,
            message,
        }
    }
}

fn parse_proj(code: EpsgCode, definition: &str) -> ProjectionResult<Proj> {
    Proj::from_proj_string(definition).map_err(|e| ProjectionError::InvalidDefinition {
        code: code.code(),
        message: format!("{e:?}"),
    })
}

fn lonlat_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * WEB_MERCATOR_RADIUS;
    let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * WEB_MERCATOR_RADIUS;
    (x, y)
}
