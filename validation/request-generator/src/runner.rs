//! Generation run orchestration.

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::SampleGenerator;
use crate::provider::{default_provider, GeometryProvider};
use crate::stats::RunSummary;
use crate::writer::SampleWriter;

/// Runs one generation: resolves the geometry capability, opens the output
/// files and writes `count` accepted samples.
pub struct Runner {
    config: GeneratorConfig,
    provider: Option<Box<dyn GeometryProvider>>,
    show_progress: bool,
}

impl Runner {
    /// Create a runner using the geometry provider compiled into this build.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            provider: default_provider(),
            show_progress: false,
        }
    }

    /// Replace the geometry provider; `None` disables filtering and reprojection.
    pub fn with_provider(mut self, provider: Option<Box<dyn GeometryProvider>>) -> Self {
        self.provider = provider;
        self
    }

    /// Draw a progress bar on stderr.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the generation.
    ///
    /// Configuration problems (missing dataset, unknown EPSG code, no
    /// geometry backend) are reported before any output file is created.
    pub fn run(&self) -> GeneratorResult<RunSummary> {
        let rng = match self.config.seed {
            Some(seed) => {
                debug!(seed, "using seeded random generator");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let mut generator = self.build_generator(rng)?;

        let mut writer = SampleWriter::create(&self.config)?;
        let outputs: Vec<String> = writer
            .paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        info!(
            count = self.config.count,
            srs = self.config.srs,
            srs2 = ?self.config.srs2,
            outputs = ?outputs,
            "Generating requests"
        );

        let result = self.generate(&mut generator, &mut writer);
        // Keep whatever was generated before a failure.
        writer.finish()?;
        result?;

        let stats = generator.into_stats();
        info!(
            accepted = stats.accepted(),
            attempts = stats.attempts(),
            acceptance_rate = format!("{:.1}%", stats.acceptance_rate()),
            "Generation complete"
        );
        Ok(stats.summary(self.config.count, outputs))
    }

    /// Build the sample generator with the filter and transform the
    /// configuration asks for.
    pub fn build_generator<R: Rng>(&self, rng: R) -> GeneratorResult<SampleGenerator<R>> {
        let mut generator = SampleGenerator::new(&self.config, rng);

        if let Some(path) = &self.config.filter_within {
            let provider = self.provider("-filter_within")?;
            generator = generator.with_filter(provider.load_filter(path)?);
        }

        if let Some(srs2) = self.config.srs2 {
            let provider = self.provider("-srs2")?;
            generator = generator.with_transform(provider.build_transform(self.config.srs, srs2)?);
        }

        Ok(generator)
    }

    fn provider(&self, flag: &'static str) -> GeneratorResult<&dyn GeometryProvider> {
        self.provider
            .as_deref()
            .ok_or(GeneratorError::GeometryUnavailable { flag })
    }

    fn generate<R: Rng>(
        &self,
        generator: &mut SampleGenerator<R>,
        writer: &mut SampleWriter,
    ) -> GeneratorResult<()> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(self.config.count);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .expect("Invalid progress bar template")
                    .progress_chars("##-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        for i in 0..self.config.count {
            let sample = match generator.next_sample() {
                Ok(sample) => sample,
                Err(e) => {
                    pb.abandon_with_message("Failed");
                    warn!(
                        accepted = generator.stats().accepted(),
                        requested = self.config.count,
                        "Stopping generation"
                    );
                    return Err(e);
                }
            };
            debug!(
                remaining = self.config.count - i - 1,
                width = sample.size.width,
                height = sample.size.height,
                resolution = sample.resolution,
                "Accepted sample"
            );
            writer.write_sample(&sample)?;
            pb.inc(1);
        }

        pb.finish_with_message("Complete!");
        Ok(())
    }
}
