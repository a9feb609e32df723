//! Parallel processing of many scores against one sample bank.

use crate::error::Result;
use crate::pipeline::FeaturePipeline;
use cadenza_core::{ArtifactWarning, AudioConfig};
use cadenza_synth::{BankLibrary, MidiRenderer, RenderSettings, SoundFont};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// One score and where its artifacts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub score: PathBuf,
    pub wave: Option<PathBuf>,
    pub features: Option<PathBuf>,
}

impl BatchJob {
    /// Render `score` without writing anything.
    pub fn new(score: impl Into<PathBuf>) -> Self {
        Self {
            score: score.into(),
            wave: None,
            features: None,
        }
    }

    /// `<out_dir>/<stem>.wav` and `<out_dir>/<stem>.npy` for `score`.
    pub fn for_score(score: impl Into<PathBuf>, out_dir: &Path) -> Self {
        let score = score.into();
        let stem = score
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "score".to_string());

        Self {
            wave: Some(out_dir.join(format!("{}.wav", stem))),
            features: Some(out_dir.join(format!("{}.npy", stem))),
            score,
        }
    }

    pub fn with_wave(mut self, path: impl Into<PathBuf>) -> Self {
        self.wave = Some(path.into());
        self
    }

    pub fn with_features(mut self, path: impl Into<PathBuf>) -> Self {
        self.features = Some(path.into());
        self
    }
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// `(frequency_bins, time_frames)`
    pub shape: (usize, usize),
    pub warnings: Vec<ArtifactWarning>,
}

/// Outcome of one job.
#[derive(Debug)]
pub struct BatchResult {
    pub score: PathBuf,
    pub outcome: Result<BatchSummary>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Sound source each worker builds its renderer from.
enum Source {
    Bank(Arc<SoundFont>),
    Oscillator,
}

/// Runs a [`FeaturePipeline`] per worker thread over a shared bank.
pub struct BatchProcessor {
    source: Source,
    config: AudioConfig,
    settings: RenderSettings,
    threads: Option<usize>,
}

impl BatchProcessor {
    /// Load the bank and check it can be rendered at `config.sample_rate()`.
    pub fn new(bank_path: impl AsRef<Path>, config: AudioConfig) -> Result<Self> {
        Self::with_library(&BankLibrary::new(), bank_path, config)
    }

    /// Like [`new`](Self::new), reusing banks already parsed by `library`.
    pub fn with_library(library: &BankLibrary, bank_path: impl AsRef<Path>, config: AudioConfig) -> Result<Self> {
        let soundfont = library.load(bank_path)?;
        MidiRenderer::from_soundfont(Arc::clone(&soundfont), config.sample_rate())?;

        Ok(Self {
            source: Source::Bank(soundfont),
            config,
            settings: RenderSettings::default(),
            threads: None,
        })
    }

    /// Bank-less batch rendering through [`OscillatorEngine`](cadenza_synth::OscillatorEngine).
    pub fn oscillator(config: AudioConfig) -> Self {
        Self {
            source: Source::Oscillator,
            config,
            settings: RenderSettings::default(),
            threads: None,
        }
    }

    /// Worker count. Defaults to rayon's global pool.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    pub fn render_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Process every job; results come back in input order.
    ///
    /// A failing job does not stop the others.
    pub fn run(&self, jobs: &[BatchJob]) -> Vec<BatchResult> {
        let results = match self.threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| self.run_parallel(jobs)),
                Err(e) => {
                    warn!("Could not build a {}-thread pool ({}), using the global pool", n, e);
                    self.run_parallel(jobs)
                }
            },
            None => self.run_parallel(jobs),
        };

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!("Batch finished: {} ok, {} failed", results.len() - failed, failed);
        results
    }

    fn run_parallel(&self, jobs: &[BatchJob]) -> Vec<BatchResult> {
        jobs.par_iter()
            .map_init(
                || None,
                |slot, job| BatchResult {
                    score: job.score.clone(),
                    outcome: self
                        .worker(slot)
                        .and_then(|pipeline| Self::process(pipeline, job)),
                },
            )
            .collect()
    }

    /// The worker's pipeline, built on first use.
    ///
    /// A failed build leaves the slot empty, so every job it would have
    /// served reports the construction error unchanged.
    fn worker<'a>(&self, slot: &'a mut Option<FeaturePipeline>) -> Result<&'a mut FeaturePipeline> {
        let pipeline = match slot.take() {
            Some(pipeline) => pipeline,
            None => self.pipeline()?,
        };
        Ok(slot.insert(pipeline))
    }

    fn pipeline(&self) -> Result<FeaturePipeline> {
        let sample_rate = self.config.sample_rate();
        let renderer = match &self.source {
            Source::Bank(soundfont) => MidiRenderer::from_soundfont(Arc::clone(soundfont), sample_rate)?,
            Source::Oscillator => MidiRenderer::oscillator(sample_rate),
        }
        .with_settings(self.settings);
        FeaturePipeline::from_parts(renderer, self.config)
    }

    fn process(pipeline: &mut FeaturePipeline, job: &BatchJob) -> Result<BatchSummary> {
        let output = pipeline.process_detailed(&job.score, job.wave.as_deref(), job.features.as_deref());
        match output {
            Ok(output) => {
                info!("{}: {:?}", job.score.display(), output.features.shape());
                Ok(BatchSummary {
                    shape: output.features.shape(),
                    warnings: output.warnings,
                })
            }
            Err(e) => {
                warn!("{}: {}", job.score.display(), e);
                Err(e)
            }
        }
    }
}
