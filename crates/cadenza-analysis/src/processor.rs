//! Waveform to spectrogram.

use crate::error::{Error, Result};
use crate::mel::MelFilterBank;
use crate::scale::{to_db, Scale};
use crate::stft::Stft;
use cadenza_core::{AudioConfig, SpectralMap, Waveform};
use tracing::debug;

/// Computes mel or linear spectrograms for one [`AudioConfig`].
///
/// The FFT plan, window and filter bank are built once in [`new`](Self::new)
/// and reused for every waveform. Output is a pure function of the config
/// and the samples.
///
/// ```
/// use cadenza_analysis::SpectralProcessor;
/// use cadenza_core::AudioConfig;
///
/// let mut processor = SpectralProcessor::new(AudioConfig::default());
/// let samples = vec![0.1f32; 22050];
/// let map = processor.compute(&samples).unwrap();
/// assert_eq!(map.shape(), (128, 44));
/// ```
pub struct SpectralProcessor {
    config: AudioConfig,
    stft: Stft,
    mel: Option<MelFilterBank>,
}

impl SpectralProcessor {
    pub fn new(config: AudioConfig) -> Self {
        let stft = Stft::new(config.n_fft(), config.hop_length(), config.win_length());
        let mel = config
            .use_mel()
            .then(|| MelFilterBank::new(config.sample_rate(), config.n_fft(), config.n_mels()));

        Self { config, stft, mel }
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Spectrogram of a waveform, checking it was rendered at the configured rate.
    pub fn compute_waveform(&mut self, waveform: &Waveform) -> Result<SpectralMap> {
        if waveform.sample_rate() != self.config.sample_rate() {
            return Err(Error::SampleRateMismatch {
                expected: self.config.sample_rate(),
                actual: waveform.sample_rate(),
            });
        }
        self.compute(waveform.samples())
    }

    /// Spectrogram of raw samples at the configured sample rate.
    ///
    /// Shape is `config.output_shape(samples.len())`. Fails on empty input
    /// or any NaN/infinite sample.
    pub fn compute(&mut self, samples: &[f32]) -> Result<SpectralMap> {
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, s)| !s.is_finite()) {
            return Err(Error::NonFiniteSample { index, value });
        }

        let Self { config, stft, mel } = self;
        let (bins, frames) = config.output_shape(samples.len());
        let mut map = SpectralMap::zeros(bins, frames);

        let mut power = vec![0.0f32; stft.n_bins()];
        let mut column = vec![0.0f32; bins];

        stft.for_each_frame(samples, |frame, spectrum| {
            match mel.as_ref() {
                Some(bank) => {
                    for (p, x) in power.iter_mut().zip(spectrum) {
                        *p = x.norm_sqr();
                    }
                    bank.apply(&power, &mut column);
                }
                None => {
                    for (m, x) in column.iter_mut().zip(spectrum) {
                        *m = x.norm();
                    }
                }
            }
            for (bin, &value) in column.iter().enumerate() {
                map.set(bin, frame, value);
            }
        });

        if config.log_scale() {
            let scale = if mel.is_some() {
                Scale::Power
            } else {
                Scale::Amplitude
            };
            to_db(map.as_mut_slice(), scale, config.top_db());
        }

        debug!(
            "Computed {} spectrogram {}x{} from {} samples",
            if mel.is_some() { "mel" } else { "linear" },
            bins,
            frames,
            samples.len()
        );

        Ok(map)
    }
}
