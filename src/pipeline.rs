//! Score to feature map, end to end.

use crate::error::{Error, Result};
use cadenza_analysis::SpectralProcessor;
use cadenza_core::{ArtifactKind, ArtifactWarning, AudioConfig, SpectralMap};
use cadenza_export::write_npy;
use cadenza_synth::{save_waveform, MidiRenderer, RenderSettings};
use std::path::Path;
use tracing::{debug, warn};

/// Features plus every side artifact that failed to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub features: SpectralMap,
    pub warnings: Vec<ArtifactWarning>,
}

/// Renders a score and computes its spectrogram with one shared config.
///
/// Nothing is cached between calls: each `process` re-reads the score and
/// starts from a reset synthesizer.
pub struct FeaturePipeline {
    renderer: MidiRenderer,
    processor: SpectralProcessor,
}

impl FeaturePipeline {
    /// Load the sample bank and build renderer and processor from `config`.
    pub fn new(bank_path: impl AsRef<Path>, config: AudioConfig) -> Result<Self> {
        let renderer = MidiRenderer::new(bank_path, config.sample_rate())?;
        Self::from_parts(renderer, config)
    }

    /// Pair an existing renderer with a processor for `config`.
    ///
    /// The renderer must produce audio at `config.sample_rate()`.
    pub fn from_parts(renderer: MidiRenderer, config: AudioConfig) -> Result<Self> {
        if renderer.sample_rate() != config.sample_rate() {
            return Err(Error::Config(cadenza_core::Error::InvalidConfig(format!(
                "renderer runs at {} Hz but config sample_rate is {} Hz",
                renderer.sample_rate(),
                config.sample_rate()
            ))));
        }
        Ok(Self {
            renderer,
            processor: SpectralProcessor::new(config),
        })
    }

    pub fn with_render_settings(mut self, settings: RenderSettings) -> Self {
        self.renderer = self.renderer.with_settings(settings);
        self
    }

    pub fn config(&self) -> &AudioConfig {
        self.processor.config()
    }

    pub fn renderer(&self) -> &MidiRenderer {
        &self.renderer
    }

    /// Render `score_path`, optionally saving the waveform and the features.
    ///
    /// Returns the `(frequency_bins, time_frames)` map. Failed artifact
    /// writes are logged and otherwise ignored; use
    /// [`process_detailed`](Self::process_detailed) to inspect them.
    pub fn process(
        &mut self,
        score_path: impl AsRef<Path>,
        wave_path: Option<&Path>,
        feature_path: Option<&Path>,
    ) -> Result<SpectralMap> {
        Ok(self.process_detailed(score_path, wave_path, feature_path)?.features)
    }

    /// Like [`process`](Self::process), also returning artifact warnings.
    pub fn process_detailed(
        &mut self,
        score_path: impl AsRef<Path>,
        wave_path: Option<&Path>,
        feature_path: Option<&Path>,
    ) -> Result<PipelineOutput> {
        let score_path = score_path.as_ref();
        let waveform = self.renderer.render(score_path)?;
        let features = self.processor.compute_waveform(&waveform)?;

        // Artifacts are written only once both stages have succeeded
        let mut warnings: Vec<ArtifactWarning> = wave_path
            .and_then(|path| save_waveform(&waveform, path))
            .into_iter()
            .collect();

        if let Some(path) = feature_path {
            if let Err(e) = write_npy(path, &features) {
                let warning = ArtifactWarning::new(ArtifactKind::Features, path, e.to_string());
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        debug!(
            "Processed '{}' -> {:?} ({} warnings)",
            score_path.display(),
            features.shape(),
            warnings.len()
        );

        Ok(PipelineOutput { features, warnings })
    }
}
