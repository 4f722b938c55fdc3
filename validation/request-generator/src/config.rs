//! Generator configuration: command line flags merged over an optional
//! YAML scenario file, then validated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use wms_common::BoundingBox;

use crate::args::Cli;
use crate::error::{GeneratorError, GeneratorResult};
use crate::format::g8;

pub const DEFAULT_COUNT: u64 = 1000;
pub const DEFAULT_MIN_SIZE: PixelSize = PixelSize::new(128, 128);
pub const DEFAULT_MAX_SIZE: PixelSize = PixelSize::new(1024, 768);
pub const DEFAULT_SRS: u32 = 4326;
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Program name echoed in the invocation annotation.
const PROGRAM_NAME: &str = "wms-request";

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Inclusive bounds for generated image sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeRange {
    pub min: PixelSize,
    pub max: PixelSize,
}

/// Bounds for the ground resolution (map units per pixel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolutionRange {
    pub min: f64,
    pub max: f64,
}

/// Fully resolved generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorConfig {
    pub region: BoundingBox,
    pub resolution: ResolutionRange,
    pub size: SizeRange,
    pub count: u64,
    pub srs: u32,
    pub srs2: Option<u32>,
    pub filter_within: Option<PathBuf>,
    pub output: PathBuf,
    /// Set exactly when `srs2` is set.
    pub output2: Option<PathBuf>,
    pub seed: Option<u64>,
    pub max_attempts: u64,
}

/// YAML scenario file. Every key is optional; command line flags win.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// WMS style "minx,miny,maxx,maxy".
    #[serde(default, deserialize_with = "deserialize_wms_bbox")]
    pub region: Option<BoundingBox>,
    pub minres: Option<f64>,
    pub maxres: Option<f64>,
    pub count: Option<u64>,
    pub minsize: Option<[u32; 2]>,
    pub maxsize: Option<[u32; 2]>,
    pub srs: Option<u32>,
    pub srs2: Option<u32>,
    pub filter_within: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub output2: Option<PathBuf>,
    pub seed: Option<u64>,
    pub max_attempts: Option<u64>,
}

fn deserialize_wms_bbox<'de, D>(deserializer: D) -> Result<Option<BoundingBox>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| BoundingBox::from_wms_string(&s).map_err(serde::de::Error::custom))
        .transpose()
}

impl ScenarioFile {
    /// Load a scenario from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> GeneratorResult<Self> {
        let path = path.as_ref();
        let scenario_error = |message: String| GeneratorError::Scenario {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| scenario_error(e.to_string()))?;
        serde_yaml::from_str(&content).map_err(|e| scenario_error(e.to_string()))
    }
}

impl GeneratorConfig {
    /// Build the configuration from parsed flags, loading `-scenario` if given.
    pub fn from_cli(cli: &Cli) -> GeneratorResult<Self> {
        let scenario = match &cli.scenario {
            Some(path) => ScenarioFile::from_file(path)?,
            None => ScenarioFile::default(),
        };
        Self::merge(cli, scenario)
    }

    /// Merge flags over a scenario, fill defaults and validate.
    pub fn merge(cli: &Cli, scenario: ScenarioFile) -> GeneratorResult<Self> {
        let region = match &cli.region {
            Some(values) => region_from_values(values)?,
            None => scenario.region.ok_or(GeneratorError::MissingRequired("-region"))?,
        };
        let minres = cli
            .minres
            .or(scenario.minres)
            .ok_or(GeneratorError::MissingRequired("-minres"))?;
        let maxres = cli
            .maxres
            .or(scenario.maxres)
            .ok_or(GeneratorError::MissingRequired("-maxres"))?;

        let min_size = match &cli.minsize {
            Some(values) => size_from_values("-minsize", values)?,
            None => scenario.minsize.map_or(DEFAULT_MIN_SIZE, |[w, h]| PixelSize::new(w, h)),
        };
        let max_size = match &cli.maxsize {
            Some(values) => size_from_values("-maxsize", values)?,
            None => scenario.maxsize.map_or(DEFAULT_MAX_SIZE, |[w, h]| PixelSize::new(w, h)),
        };

        let srs = cli.srs.or(scenario.srs).unwrap_or(DEFAULT_SRS);
        let srs2 = cli.srs2.or(scenario.srs2);
        let output = cli
            .output
            .clone()
            .or(scenario.output)
            .unwrap_or_else(|| default_output(srs));
        let output2 = srs2.map(|code| {
            cli.output2
                .clone()
                .or_else(|| scenario.output2.clone())
                .unwrap_or_else(|| default_output(code))
        });

        let config = Self {
            region,
            resolution: ResolutionRange {
                min: minres,
                max: maxres,
            },
            size: SizeRange {
                min: min_size,
                max: max_size,
            },
            count: cli.count.or(scenario.count).unwrap_or(DEFAULT_COUNT),
            srs,
            srs2,
            filter_within: cli.filter_within.clone().or(scenario.filter_within),
            output,
            output2,
            seed: cli.seed.or(scenario.seed),
            max_attempts: cli
                .max_attempts
                .or(scenario.max_attempts)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the sample generator relies on.
    pub fn validate(&self) -> GeneratorResult<()> {
        if !self.region.is_valid() {
            return Err(invalid(
                "-region",
                "expected minx < maxx and miny < maxy with finite values",
            ));
        }
        let ResolutionRange { min, max } = self.resolution;
        if !(min.is_finite() && min > 0.0) {
            return Err(invalid("-minres", "must be a positive number"));
        }
        if !(max.is_finite() && max >= min) {
            return Err(invalid("-maxres", "must be a number >= minres"));
        }
        let SizeRange {
            min: min_size,
            max: max_size,
        } = self.size;
        if min_size.width == 0 || min_size.height == 0 {
            return Err(invalid("-minsize", "width and height must be at least 1"));
        }
        if max_size.width < min_size.width || max_size.height < min_size.height {
            return Err(invalid("-maxsize", "must not be smaller than minsize"));
        }
        if self.count == 0 {
            return Err(invalid("-count", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("-max_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Whether a second, reprojected output file is produced.
    pub fn reprojects(&self) -> bool {
        self.srs2.is_some()
    }

    /// Command line annotation stored on the first line of each output file.
    ///
    /// Rebuilt from the effective configuration, so defaults appear as
    /// explicit flags.
    pub fn invocation(&self) -> String {
        let r = &self.region;
        let mut line = format!(
            "{PROGRAM_NAME} -count {} -region {} {} {} {} -minsize {} {} -maxsize {} {} -minres {} -maxres {}",
            self.count,
            g8(r.min_x),
            g8(r.min_y),
            g8(r.max_x),
            g8(r.max_y),
            self.size.min.width,
            self.size.min.height,
            self.size.max.width,
            self.size.max.height,
            g8(self.resolution.min),
            g8(self.resolution.max),
        );
        if let Some(srs2) = self.srs2 {
            line.push_str(&format!(" -srs {} -srs2 {}", self.srs, srs2));
        }
        if let Some(path) = &self.filter_within {
            line.push_str(&format!(" -filter_within {}", path.display()));
        }
        if let Some(seed) = self.seed {
            line.push_str(&format!(" -seed {seed}"));
        }
        line
    }
}

fn invalid(flag: &'static str, message: &str) -> GeneratorError {
    GeneratorError::InvalidValue {
        flag,
        message: message.to_string(),
    }
}

fn default_output(srs: u32) -> PathBuf {
    PathBuf::from(format!("{srs}.csv"))
}

fn region_from_values(values: &[f64]) -> GeneratorResult<BoundingBox> {
    match values {
        [min_x, min_y, max_x, max_y] => Ok(BoundingBox::new(*min_x, *min_y, *max_x, *max_y)),
        _ => Err(invalid("-region", "expected minx miny maxx maxy")),
    }
}

fn size_from_values(flag: &'static str, values: &[u32]) -> GeneratorResult<PixelSize> {
    match values {
        [width, height] => Ok(PixelSize::new(*width, *height)),
        _ => Err(invalid(flag, "expected width height")),
    }
}
