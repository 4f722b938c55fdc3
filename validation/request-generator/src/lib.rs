//! Randomized WMS request generator.
//!
//! Produces files of `width;height;minx,miny,maxx,maxy` lines used to drive
//! WMS load tests:
//! - Image sizes drawn uniformly between a minimum and maximum size
//! - Ground resolutions drawn log-uniformly, so every zoom level is covered
//! - Boxes kept inside a region and, optionally, inside GeoJSON geometries
//! - An optional second file with every box reprojected to another EPSG code

pub mod args;
pub mod config;
pub mod error;
#[cfg(feature = "geometry")]
pub mod filter;
pub mod format;
pub mod generator;
pub mod provider;
pub mod report;
pub mod runner;
pub mod stats;
pub mod writer;

pub use args::{Cli, ParseOutcome, USAGE};
pub use config::{GeneratorConfig, PixelSize, ResolutionRange, ScenarioFile, SizeRange};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::{ReprojectedSample, Sample, SampleGenerator};
pub use provider::{default_provider, ContainmentFilter, CoordinateTransform, GeometryProvider};
pub use report::{ReportFormat, RunReport};
pub use runner::Runner;
pub use stats::{GenerationStats, RunSummary};
pub use writer::SampleWriter;
