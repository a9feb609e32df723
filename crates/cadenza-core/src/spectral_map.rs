//! Two-dimensional time-frequency feature array.

use crate::{Error, Result};

/// Summary statistics over every value of a [`SpectralMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

/// A `(frequency_bins, time_frames)` array of `f32`, stored row-major:
/// all frames of bin 0, then all frames of bin 1, and so on.
///
/// This is the same memory order as a C-contiguous NumPy array of that
/// shape, which is what gets written to `.npy` files.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMap {
    bins: usize,
    frames: usize,
    data: Vec<f32>,
}

impl SpectralMap {
    /// Zero-filled map.
    pub fn zeros(bins: usize, frames: usize) -> Self {
        Self {
            bins,
            frames,
            data: vec![0.0; bins * frames],
        }
    }

    /// Wrap row-major data, checking that it matches the shape.
    pub fn from_vec(bins: usize, frames: usize, data: Vec<f32>) -> Result<Self> {
        let expected = bins * frames;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                bins,
                frames,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { bins, frames, data })
    }

    /// `(frequency_bins, time_frames)`
    pub fn shape(&self) -> (usize, usize) {
        (self.bins, self.frames)
    }

    pub fn frequency_bins(&self) -> usize {
        self.bins
    }

    pub fn time_frames(&self) -> usize {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, bin: usize, frame: usize) -> Option<f32> {
        if bin >= self.bins || frame >= self.frames {
            return None;
        }
        Some(self.data[bin * self.frames + frame])
    }

    pub(crate) fn index(&self, bin: usize, frame: usize) -> usize {
        bin * self.frames + frame
    }

    /// Replace a single value, returning the old one.
    ///
    /// Returns `None` and leaves the map untouched when `(bin, frame)` is
    /// outside [`shape`](Self::shape).
    pub fn set(&mut self, bin: usize, frame: usize, value: f32) -> Option<f32> {
        if bin >= self.bins || frame >= self.frames {
            return None;
        }
        let i = self.index(bin, frame);
        Some(std::mem::replace(&mut self.data[i], value))
    }

    /// All frames of one frequency bin.
    pub fn row(&self, bin: usize) -> Option<&[f32]> {
        if bin >= self.bins {
            return None;
        }
        let start = bin * self.frames;
        Some(&self.data[start..start + self.frames])
    }

    /// All bins of one frame (a column, so this copies).
    pub fn frame(&self, frame: usize) -> Option<Vec<f32>> {
        if frame >= self.frames {
            return None;
        }
        Some(
            (0..self.bins)
                .map(|bin| self.data[bin * self.frames + frame])
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Smallest value, or `None` for an empty map.
    pub fn min(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    /// Largest value, or `None` for an empty map.
    pub fn max(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    pub fn stats(&self) -> Option<MapStats> {
        let min = self.min()?;
        let max = self.max()?;
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        Some(MapStats {
            min,
            max,
            mean: (sum / self.data.len() as f64) as f32,
        })
    }
}
