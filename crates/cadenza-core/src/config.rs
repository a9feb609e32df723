//! Audio and spectral-transform configuration.

use crate::{Error, Result};

/// Default synthesis / analysis sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;
/// Default FFT size in samples.
pub const DEFAULT_N_FFT: usize = 2048;
/// Default stride between frames in samples.
pub const DEFAULT_HOP_LENGTH: usize = 512;
/// Default analysis window length in samples.
pub const DEFAULT_WIN_LENGTH: usize = 2048;
/// Default number of mel bands.
pub const DEFAULT_N_MELS: usize = 128;
/// Default dynamic range of log-scaled output, in dB below the maximum.
pub const DEFAULT_TOP_DB: f32 = 80.0;

/// Parameters shared by the renderer and the spectral processor.
///
/// There are no setters: a config is fixed once built, so every stage of a
/// pipeline run sees the same sample rate and transform geometry. Use
/// [`AudioConfig::builder`] to construct a non-default config.
///
/// ```
/// use cadenza_core::AudioConfig;
///
/// let config = AudioConfig::builder()
///     .n_mels(64)
///     .hop_length(256)
///     .build()
///     .unwrap();
/// assert_eq!(config.frequency_bins(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AudioConfigBuilder"))]
pub struct AudioConfig {
    sample_rate: u32,
    n_fft: usize,
    hop_length: usize,
    win_length: usize,
    n_mels: usize,
    use_mel: bool,
    log_scale: bool,
    top_db: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            n_fft: DEFAULT_N_FFT,
            hop_length: DEFAULT_HOP_LENGTH,
            win_length: DEFAULT_WIN_LENGTH,
            n_mels: DEFAULT_N_MELS,
            use_mel: true,
            log_scale: true,
            top_db: DEFAULT_TOP_DB,
        }
    }
}

impl AudioConfig {
    /// Start from the defaults.
    pub fn builder() -> AudioConfigBuilder {
        AudioConfigBuilder::default()
    }

    /// Samples per second for synthesis and analysis.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Transform size in samples.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Stride between successive frames in samples.
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Window length applied before the transform.
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Number of mel bands (only used when [`use_mel`](Self::use_mel) is set).
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Mel-scale power spectrogram instead of linear magnitude.
    pub fn use_mel(&self) -> bool {
        self.use_mel
    }

    /// Convert the output to dB relative to its own maximum.
    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    /// Dynamic range of log output. Values are clamped to `-top_db`.
    pub fn top_db(&self) -> f32 {
        self.top_db
    }

    /// Number of rows in the resulting [`SpectralMap`](crate::SpectralMap).
    pub fn frequency_bins(&self) -> usize {
        if self.use_mel {
            self.n_mels
        } else {
            1 + self.n_fft / 2
        }
    }

    /// Number of frames produced for a waveform of `num_samples` samples.
    pub fn time_frames(&self, num_samples: usize) -> usize {
        num_samples / self.hop_length + 1
    }

    /// Expected `(frequency_bins, time_frames)` for a waveform length.
    pub fn output_shape(&self, num_samples: usize) -> (usize, usize) {
        (self.frequency_bins(), self.time_frames(num_samples))
    }

    fn validate(&self) -> Result<()> {
        let positive = [
            ("sample_rate", self.sample_rate as usize),
            ("n_fft", self.n_fft),
            ("hop_length", self.hop_length),
            ("win_length", self.win_length),
            ("n_mels", self.n_mels),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidConfig(format!("{} must be positive", name)));
        }
        if self.hop_length > self.n_fft {
            return Err(Error::InvalidConfig(format!(
                "hop_length {} exceeds n_fft {}",
                self.hop_length, self.n_fft
            )));
        }
        if self.win_length > self.n_fft {
            return Err(Error::InvalidConfig(format!(
                "win_length {} exceeds n_fft {}",
                self.win_length, self.n_fft
            )));
        }
        if !(self.top_db.is_finite() && self.top_db > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "top_db {} must be finite and positive",
                self.top_db
            )));
        }
        Ok(())
    }
}

/// Validating builder for [`AudioConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AudioConfigBuilder {
    sample_rate: u32,
    n_fft: usize,
    hop_length: usize,
    win_length: usize,
    n_mels: usize,
    use_mel: bool,
    log_scale: bool,
    top_db: f32,
}

impl Default for AudioConfigBuilder {
    fn default() -> Self {
        let d = AudioConfig::default();
        Self {
            sample_rate: d.sample_rate,
            n_fft: d.n_fft,
            hop_length: d.hop_length,
            win_length: d.win_length,
            n_mels: d.n_mels,
            use_mel: d.use_mel,
            log_scale: d.log_scale,
            top_db: d.top_db,
        }
    }
}

impl AudioConfigBuilder {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn n_fft(mut self, n_fft: usize) -> Self {
        self.n_fft = n_fft;
        self
    }

    pub fn hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = hop_length;
        self
    }

    pub fn win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    pub fn n_mels(mut self, n_mels: usize) -> Self {
        self.n_mels = n_mels;
        self
    }

    pub fn use_mel(mut self, use_mel: bool) -> Self {
        self.use_mel = use_mel;
        self
    }

    pub fn log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    pub fn top_db(mut self, top_db: f32) -> Self {
        self.top_db = top_db;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<AudioConfig> {
        let config = AudioConfig {
            sample_rate: self.sample_rate,
            n_fft: self.n_fft,
            hop_length: self.hop_length,
            win_length: self.win_length,
            n_mels: self.n_mels,
            use_mel: self.use_mel,
            log_scale: self.log_scale,
            top_db: self.top_db,
        };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<AudioConfigBuilder> for AudioConfig {
    type Error = Error;

    fn try_from(builder: AudioConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.sample_rate(), 22050);
        assert_eq!(config.n_fft(), 2048);
        assert_eq!(config.hop_length(), 512);
        assert_eq!(config.win_length(), 2048);
        assert_eq!(config.n_mels(), 128);
        assert!(config.use_mel());
        assert!(config.log_scale());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_matches_default() {
        assert_eq!(AudioConfig::builder().build().unwrap(), AudioConfig::default());
    }

    #[test]
    fn test_frequency_bins() {
        let mel = AudioConfig::builder().n_mels(40).build().unwrap();
        assert_eq!(mel.frequency_bins(), 40);

        let linear = AudioConfig::builder().use_mel(false).build().unwrap();
        assert_eq!(linear.frequency_bins(), 1025);
    }

    #[test]
    fn test_time_frames() {
        let config = AudioConfig::default();
        assert_eq!(config.time_frames(66150), 130);
        assert_eq!(config.time_frames(1024), 3);
        assert_eq!(config.time_frames(1025), 3);
        assert_eq!(config.time_frames(1), 1);
    }

    #[test]
    fn test_rejects_zero_fields() {
        assert!(AudioConfig::builder().sample_rate(0).build().is_err());
        assert!(AudioConfig::builder().n_fft(0).build().is_err());
        assert!(AudioConfig::builder().hop_length(0).build().is_err());
        assert!(AudioConfig::builder().win_length(0).build().is_err());
        assert!(AudioConfig::builder().n_mels(0).build().is_err());
    }

    #[test]
    fn test_rejects_hop_and_window_larger_than_fft() {
        let err = AudioConfig::builder().n_fft(1024).hop_length(2048).build();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));

        let err = AudioConfig::builder()
            .n_fft(1024)
            .hop_length(256)
            .win_length(2048)
            .build();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_top_db() {
        assert!(AudioConfig::builder().top_db(0.0).build().is_err());
        assert!(AudioConfig::builder().top_db(f32::NAN).build().is_err());
        assert!(AudioConfig::builder().top_db(-10.0).build().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let config: AudioConfig =
            serde_json::from_str(r#"{"n_mels": 64, "use_mel": true}"#).unwrap();
        assert_eq!(config.n_mels(), 64);
        assert_eq!(config.sample_rate(), 22050);

        let bad = serde_json::from_str::<AudioConfig>(r#"{"hop_length": 4096}"#);
        assert!(bad.is_err());
    }
}
