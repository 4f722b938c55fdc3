//! Counters and distributions collected while generating samples.

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

/// Why a candidate box was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Box extends past the configured region.
    OutsideRegion,
    /// Box is not contained by the filter geometry.
    Filter,
    /// Corners could not be reprojected, or the result was degenerate.
    Transform,
}

/// Collects statistics during a generation run.
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pixel_histogram: Histogram<u64>,
    attempts: u64,
    accepted: u64,
    rejected_outside_region: u64,
    rejected_by_filter: u64,
    rejected_by_transform: u64,
    min_resolution: Option<f64>,
    max_resolution: Option<f64>,
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationStats {
    pub fn new() -> Self {
        Self {
            pixel_histogram: Histogram::new(3).expect("Failed to create histogram"),
            attempts: 0,
            accepted: 0,
            rejected_outside_region: 0,
            rejected_by_filter: 0,
            rejected_by_transform: 0,
            min_resolution: None,
            max_resolution: None,
        }
    }

    /// Record an accepted sample.
    pub fn record_accept(&mut self, pixels: u64, resolution: f64) {
        self.attempts += 1;
        self.accepted += 1;
        self.pixel_histogram.record(pixels).ok();
        self.min_resolution = Some(self.min_resolution.map_or(resolution, |r| r.min(resolution)));
        self.max_resolution = Some(self.max_resolution.map_or(resolution, |r| r.max(resolution)));
    }

    /// Record a rejected candidate.
    pub fn record_reject(&mut self, reason: Rejection) {
        self.attempts += 1;
        match reason {
            Rejection::OutsideRegion => self.rejected_outside_region += 1,
            Rejection::Filter => self.rejected_by_filter += 1,
            Rejection::Transform => self.rejected_by_transform += 1,
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected_outside_region + self.rejected_by_filter + self.rejected_by_transform
    }

    pub fn rejected_outside_region(&self) -> u64 {
        self.rejected_outside_region
    }

    pub fn rejected_by_filter(&self) -> u64 {
        self.rejected_by_filter
    }

    pub fn rejected_by_transform(&self) -> u64 {
        self.rejected_by_transform
    }

    /// Accepted samples as a percentage of all candidates.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts > 0 {
            (self.accepted as f64 / self.attempts as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Produce the serializable summary of this run.
    pub fn summary(&self, requested: u64, outputs: Vec<String>) -> RunSummary {
        let has_samples = self.pixel_histogram.len() > 0;
        let quantile = |q: f64| {
            if has_samples {
                self.pixel_histogram.value_at_quantile(q)
            } else {
                0
            }
        };

        RunSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            requested,
            accepted: self.accepted,
            attempts: self.attempts,
            rejected_outside_region: self.rejected_outside_region,
            rejected_by_filter: self.rejected_by_filter,
            rejected_by_transform: self.rejected_by_transform,
            acceptance_rate: self.acceptance_rate(),
            pixels_p50: quantile(0.5),
            pixels_p90: quantile(0.9),
            pixels_max: if has_samples { self.pixel_histogram.max() } else { 0 },
            resolution_min: self.min_resolution,
            resolution_max: self.max_resolution,
            outputs,
        }
    }
}

/// Final statistics of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub requested: u64,
    pub accepted: u64,
    pub attempts: u64,
    pub rejected_outside_region: u64,
    pub rejected_by_filter: u64,
    pub rejected_by_transform: u64,
    /// Percentage of candidates accepted.
    pub acceptance_rate: f64,
    pub pixels_p50: u64,
    pub pixels_p90: u64,
    pub pixels_max: u64,
    pub resolution_min: Option<f64>,
    pub resolution_max: Option<f64>,
    pub outputs: Vec<String>,
}
