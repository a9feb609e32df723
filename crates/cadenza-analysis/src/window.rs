//! Analysis windows.

/// Periodic Hann window of `size` samples.
///
/// Periodic (denominator `size`, not `size - 1`) so that overlapping
/// frames sum to a constant, matching the DFT-even windows used by common
/// spectrogram libraries.
pub fn hann_periodic(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let angle = 2.0 * core::f64::consts::PI * i as f64 / size as f64;
            (0.5 - 0.5 * angle.cos()) as f32
        })
        .collect()
}

/// Place `window` in the middle of an `n_fft`-long buffer of zeros.
///
/// `window.len()` must not exceed `n_fft`.
pub fn pad_center(window: &[f32], n_fft: usize) -> Vec<f32> {
    let mut padded = vec![0.0; n_fft];
    let offset = (n_fft - window.len()) / 2;
    padded[offset..offset + window.len()].copy_from_slice(window);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hann_shape() {
        let w = hann_periodic(8);
        assert_eq!(w.len(), 8);
        assert_abs_diff_eq!(w[0], 0.0);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-7);
        // Periodic window is symmetric around the centre sample
        assert_abs_diff_eq!(w[1], w[7], epsilon = 1e-7);
        assert_abs_diff_eq!(w[3], w[5], epsilon = 1e-7);
    }

    #[test]
    fn test_hann_overlap_add_constant() {
        // 50% overlap of a periodic Hann sums to 1
        let w = hann_periodic(16);
        for i in 0..8 {
            assert_abs_diff_eq!(w[i] + w[i + 8], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pad_center() {
        let padded = pad_center(&[1.0, 2.0], 6);
        assert_eq!(padded, vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);

        let same = pad_center(&[1.0, 2.0, 3.0], 3);
        assert_eq!(same, vec![1.0, 2.0, 3.0]);
    }
}
