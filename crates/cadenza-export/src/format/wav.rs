//! WAV format encoder using hound
//!
//! Mono only: the renderer downmixes before anything reaches disk.
//! Supports 16-bit, 24-bit, and 32-bit float WAV files.

use crate::atomic::atomic_write;
use crate::error::{ExportError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;

/// Bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Int16,
    Int24,
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }
}

/// WAV encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth
    pub bit_depth: BitDepth,
}

impl WavConfig {
    /// 16-bit PCM at the given rate
    pub fn pcm16(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            bit_depth: BitDepth::Int16,
        }
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }
}

/// Write mono samples to a WAV file.
///
/// The file appears at `path` only if encoding succeeds.
pub fn write_wav_mono(path: &Path, samples: &[f32], config: &WavConfig) -> Result<()> {
    if config.sample_rate == 0 {
        return Err(ExportError::InvalidData("sample rate must be non-zero".into()));
    }
    atomic_write(path, |w| encode_wav_mono(&mut *w, samples, config))
}

/// Encode mono audio to WAV in memory
pub fn encode_wav_mono_memory(samples: &[f32], config: &WavConfig) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_wav_mono(std::io::Cursor::new(&mut buffer), samples, config)?;
    Ok(buffer)
}

fn encode_wav_mono<W: Write + Seek>(out: W, samples: &[f32], config: &WavConfig) -> Result<()> {
    let mut writer = WavWriter::new(out, create_wav_spec(config))?;

    match config.bit_depth {
        BitDepth::Int16 => {
            for &s in samples {
                writer.write_sample(to_int(s, 32767.0) as i16)?;
            }
        }
        BitDepth::Int24 => {
            for &s in samples {
                writer.write_sample(to_int(s, 8_388_607.0))?;
            }
        }
        BitDepth::Float32 => {
            for &s in samples {
                writer.write_sample(s)?;
            }
        }
    }

    // Finalize writes the header and flushes
    writer.finalize()?;
    Ok(())
}

fn to_int(sample: f32, scale: f32) -> i32 {
    (sample.clamp(-1.0, 1.0) * scale).round() as i32
}

fn create_wav_spec(config: &WavConfig) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bit_depth.bits(),
        sample_format: match config.bit_depth {
            BitDepth::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        },
    }
}

/// Read a mono WAV back as `f32` samples in [-1, 1] plus its sample rate.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(ExportError::UnsupportedFormat(format!(
            "expected mono WAV, found {} channels",
            spec.channels
        )));
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
        }
    };

    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22050.0).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_memory_header() {
        let bytes = encode_wav_mono_memory(&sine(100), &WavConfig::pcm16(22050)).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte header + 100 16-bit samples
        assert_eq!(bytes.len(), 44 + 200);
    }

    #[test]
    fn test_pcm16_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = sine(2205);

        write_wav_mono(&path, &samples, &WavConfig::pcm16(22050)).unwrap();

        let (read, rate) = read_wav_mono(&path).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(read.len(), samples.len());
        for (a, b) in read.iter().zip(samples.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1.0 / 16384.0);
        }
    }

    #[test]
    fn test_float_file_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = sine(512);
        let config = WavConfig::pcm16(44100).with_bit_depth(BitDepth::Float32);

        write_wav_mono(&path, &samples, &config).unwrap();

        let (read, rate) = read_wav_mono(&path).unwrap();
        assert_eq!(rate, 44100);
        assert_eq!(read, samples);
    }

    #[test]
    fn test_integer_output_clamps() {
        assert_eq!(to_int(2.0, 32767.0), 32767);
        assert_eq!(to_int(-2.0, 32767.0), -32767);
    }

    #[test]
    fn test_unwritable_path_fails_cleanly() {
        let path = Path::new("/nonexistent-cadenza-dir/tone.wav");
        assert!(write_wav_mono(path, &sine(10), &WavConfig::pcm16(22050)).is_err());
    }
}
