//! Random BBOX/size sample generation.

use rand::Rng;
use tracing::trace;
use wms_common::BoundingBox;

use crate::config::{GeneratorConfig, PixelSize, ResolutionRange, SizeRange};
use crate::error::{GeneratorError, GeneratorResult};
use crate::provider::{ContainmentFilter, CoordinateTransform};
use crate::stats::{GenerationStats, Rejection};

/// One generated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub size: PixelSize,
    pub bbox: BoundingBox,
    /// Ground resolution the bbox was derived from.
    pub resolution: f64,
    pub reprojected: Option<ReprojectedSample>,
}

/// The same request expressed in the output SRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReprojectedSample {
    pub size: PixelSize,
    pub bbox: BoundingBox,
}

/// Draw a resolution log-uniformly in `[min, max]`.
///
/// `log2(r)` is uniform, so every order of magnitude is equally likely.
pub fn sample_resolution<R: Rng + ?Sized>(rng: &mut R, range: &ResolutionRange) -> f64 {
    let min_log = range.min.log2();
    let max_log = range.max.log2();
    let random_log = rng.gen::<f64>() * (max_log - min_log) + min_log;
    2f64.powf(random_log).clamp(range.min, range.max)
}

/// Output image size for a reprojected bbox.
///
/// Keeps the aspect ratio of the transformed box (so pixels stay square on
/// the ground) while approximating the source pixel count. Returns `None`
/// for degenerate boxes.
pub fn reprojected_size(pixel_count: u64, transformed: &BoundingBox) -> Option<PixelSize> {
    let aspect = transformed.aspect_ratio();
    if !aspect.is_finite() || aspect <= 0.0 {
        return None;
    }

    let height = (pixel_count as f64 / aspect).sqrt().floor();
    let width = (aspect * height).floor();
    if height < 1.0 || width < 1.0 || height > f64::from(u32::MAX) || width > f64::from(u32::MAX) {
        return None;
    }
    Some(PixelSize::new(width as u32, height as u32))
}

/// Produces accepted samples one at a time.
pub struct SampleGenerator<R> {
    region: BoundingBox,
    size: SizeRange,
    resolution: ResolutionRange,
    requested: u64,
    max_attempts: u64,
    filter: Option<Box<dyn ContainmentFilter>>,
    transform: Option<Box<dyn CoordinateTransform>>,
    rng: R,
    stats: GenerationStats,
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(config: &GeneratorConfig, rng: R) -> Self {
        Self {
            region: config.region,
            size: config.size,
            resolution: config.resolution,
            requested: config.count,
            max_attempts: config.max_attempts,
            filter: None,
            transform: None,
            rng,
            stats: GenerationStats::new(),
        }
    }

    /// Only accept boxes contained by `filter`.
    pub fn with_filter(mut self, filter: Box<dyn ContainmentFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attach a reprojected version to every accepted sample.
    pub fn with_transform(mut self, transform: Box<dyn CoordinateTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn into_stats(self) -> GenerationStats {
        self.stats
    }

    /// Draw candidates until one is accepted.
    ///
    /// # Errors
    /// [`GeneratorError::AcceptanceRateTooLow`] after `max_attempts`
    /// consecutive rejections.
    pub fn next_sample(&mut self) -> GeneratorResult<Sample> {
        let mut consecutive = 0;
        loop {
            if consecutive >= self.max_attempts {
                return Err(GeneratorError::AcceptanceRateTooLow {
                    attempts: consecutive,
                    accepted: self.stats.accepted(),
                    requested: self.requested,
                });
            }
            consecutive += 1;

            match self.try_candidate() {
                Ok(sample) => {
                    self.stats
                        .record_accept(sample.size.pixel_count(), sample.resolution);
                    return Ok(sample);
                }
                Err((reason, bbox)) => {
                    trace!(?reason, ?bbox, "rejected candidate");
                    self.stats.record_reject(reason);
                }
            }
        }
    }

    fn try_candidate(&mut self) -> Result<Sample, (Rejection, BoundingBox)> {
        let width = self.rng.gen_range(self.size.min.width..=self.size.max.width);
        let height = self.rng.gen_range(self.size.min.height..=self.size.max.height);

        let center_x = self.rng.gen::<f64>() * self.region.width() + self.region.min_x;
        let center_y = self.rng.gen::<f64>() * self.region.height() + self.region.min_y;

        let resolution = sample_resolution(&mut self.rng, &self.resolution);

        let bbox = BoundingBox::from_center(
            center_x,
            center_y,
            f64::from(width) * 0.5 * resolution,
            f64::from(height) * 0.5 * resolution,
        );

        if !self.region.contains_bbox(&bbox) {
            return Err((Rejection::OutsideRegion, bbox));
        }

        if let Some(filter) = &self.filter {
            if !filter.contains(&bbox) {
                return Err((Rejection::Filter, bbox));
            }
        }

        let size = PixelSize::new(width, height);
        let reprojected = match &self.transform {
            Some(transform) => {
                Some(reproject(transform.as_ref(), size, &bbox).map_err(|r| (r, bbox))?)
            }
            None => None,
        };

        Ok(Sample {
            size,
            bbox,
            resolution,
            reprojected,
        })
    }
}

fn reproject(
    transform: &dyn CoordinateTransform,
    size: PixelSize,
    bbox: &BoundingBox,
) -> Result<ReprojectedSample, Rejection> {
    let points = transform.transform_points(&bbox.corners()).map_err(|e| {
        trace!(error = %e, "corner transform failed");
        Rejection::Transform
    })?;
    let &[lower_left, upper_right] = points.as_slice() else {
        return Err(Rejection::Transform);
    };

    let bbox = BoundingBox::from_corners(lower_left, upper_right);
    let size = reprojected_size(size.pixel_count(), &bbox).ok_or(Rejection::Transform)?;
    Ok(ReprojectedSample { size, bbox })
}
