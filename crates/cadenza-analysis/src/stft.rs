//! Short-time Fourier transform with left-aligned framing.
//!
//! Frame `i` covers samples `[i * hop, i * hop + win_length)`. Samples past
//! the end of the input read as zero, and the frame count is
//! `len / hop + 1`, so the last frame is always partial (possibly empty).
//! The windowed frame sits in the centre of an `n_fft` buffer before the
//! transform.

use crate::window::{hann_periodic, pad_center};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Reusable STFT plan and scratch buffers.
pub struct Stft {
    n_fft: usize,
    hop_length: usize,
    win_length: usize,
    fft: Arc<dyn Fft<f32>>,
    /// Window padded to `n_fft`
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Stft {
    /// `hop_length` and `win_length` must be non-zero and at most `n_fft`.
    pub fn new(n_fft: usize, hop_length: usize, win_length: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(n_fft);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let window = pad_center(&hann_periodic(win_length), n_fft);

        Self {
            n_fft,
            hop_length,
            win_length,
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); n_fft],
            scratch,
        }
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Number of non-negative frequency bins per frame.
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Frames produced for `len` input samples.
    pub fn frame_count(&self, len: usize) -> usize {
        len / self.hop_length + 1
    }

    /// Transform every frame, handing `(frame_index, spectrum)` to `f`.
    ///
    /// `spectrum` holds bins `0..=n_fft/2`.
    pub fn for_each_frame<F>(&mut self, samples: &[f32], mut f: F)
    where
        F: FnMut(usize, &[Complex<f32>]),
    {
        let offset = (self.n_fft - self.win_length) / 2;
        let n_bins = self.n_bins();

        for frame in 0..self.frame_count(samples.len()) {
            let start = frame * self.hop_length;
            let end = (start + self.win_length).min(samples.len());
            let available = samples.get(start..end).unwrap_or(&[]);

            self.buffer.fill(Complex::new(0.0, 0.0));
            for (j, &s) in available.iter().enumerate() {
                let pos = offset + j;
                self.buffer[pos] = Complex::new(s * self.window[pos], 0.0);
            }

            self.fft
                .process_with_scratch(&mut self.buffer, &mut self.scratch);
            f(frame, &self.buffer[..n_bins]);
        }
    }
}
