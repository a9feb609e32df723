//! Mel filter bank
//!
//! Triangular filters evenly spaced on the Slaney mel scale (linear below
//! 1 kHz, logarithmic above) with area normalisation, so each filter has
//! the same total weight per Hz.

use tracing::warn;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Hz to Slaney mels.
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Slaney mels to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        mel * F_SP
    }
}

/// One triangular filter, stored from its first non-zero bin.
#[derive(Debug, Clone)]
struct Band {
    start: usize,
    weights: Vec<f32>,
}

/// Projects a linear-frequency spectrum onto `n_mels` bands.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    bands: Vec<Band>,
    n_bins: usize,
}

impl MelFilterBank {
    /// Filters spanning 0 Hz to Nyquist for an `n_fft`-point transform.
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        Self::with_range(sample_rate, n_fft, n_mels, 0.0, sample_rate as f64 / 2.0)
    }

    pub fn with_range(sample_rate: u32, n_fft: usize, n_mels: usize, f_min: f64, f_max: f64) -> Self {
        let n_bins = n_fft / 2 + 1;
        let bin_hz: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
            .collect();

        // n_mels + 2 edges, evenly spaced in mel
        let mel_min = hz_to_mel(f_min);
        let mel_max = hz_to_mel(f_max);
        let edges: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
            .collect();

        let mut bands = Vec::with_capacity(n_mels);
        let mut empty = 0usize;

        for m in 0..n_mels {
            let (lo, centre, hi) = (edges[m], edges[m + 1], edges[m + 2]);
            let norm = 2.0 / (hi - lo);

            let weights: Vec<f64> = bin_hz
                .iter()
                .map(|&f| {
                    let rising = (f - lo) / (centre - lo);
                    let falling = (hi - f) / (hi - centre);
                    rising.min(falling).max(0.0) * norm
                })
                .collect();

            match weights.iter().position(|&w| w > 0.0) {
                Some(start) => {
                    let end = weights.iter().rposition(|&w| w > 0.0).unwrap_or(start);
                    bands.push(Band {
                        start,
                        weights: weights[start..=end].iter().map(|&w| w as f32).collect(),
                    });
                }
                None => {
                    empty += 1;
                    bands.push(Band {
                        start: 0,
                        weights: Vec::new(),
                    });
                }
            }
        }

        if empty > 0 {
            warn!(
                "{} of {} mel filters are empty; n_mels may be too high for n_fft={}",
                empty, n_mels, n_fft
            );
        }

        Self { bands, n_bins }
    }

    pub fn n_mels(&self) -> usize {
        self.bands.len()
    }

    /// Length of the spectrum [`apply`](Self::apply) expects.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Dense weight row for one band (mostly for inspection and tests).
    pub fn weights(&self, band: usize) -> Vec<f32> {
        let mut row = vec![0.0; self.n_bins];
        if let Some(b) = self.bands.get(band) {
            row[b.start..b.start + b.weights.len()].copy_from_slice(&b.weights);
        }
        row
    }

    /// Write one value per band into `out`.
    pub fn apply(&self, spectrum: &[f32], out: &mut [f32]) {
        for (band, slot) in self.bands.iter().zip(out.iter_mut()) {
            *slot = band
                .weights
                .iter()
                .zip(&spectrum[band.start..])
                .map(|(w, s)| w * s)
                .sum();
        }
    }
}
