//! Feature pipeline integration tests
//!
//! End-to-end score -> waveform -> spectrogram runs over the oscillator
//! engine, so they need no sample bank.
//!
//! Run with:
//! ```bash
//! cargo test -p cadenza --test pipeline_tests
//! ```

mod helpers;

use cadenza::export::{read_npy, read_wav_mono};
use cadenza::prelude::*;
use cadenza::ArtifactKind;
use helpers::tolerances::*;
use helpers::{
    assert_has_audio, assert_in_range, oscillator_pipeline, three_second_chord, FixtureNote,
    ScoreBuilder, TICKS_PER_BEAT,
};

// =============================================================================
// Shape and range
// =============================================================================

#[test]
fn test_three_second_score_at_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let features = pipeline.process(&score, None, None).unwrap();

    assert_eq!(features.shape(), (128, 130));
    assert_in_range(&features, -80.0, 0.0);
    assert_eq!(features.max(), Some(0.0));
}

#[test]
fn test_shape_law_for_uneven_hops() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());

    // 66150 samples: 256 does not divide it, 300 leaves a half hop
    for hop in [256, 300, 1024] {
        let config = AudioConfig::builder()
            .n_fft(1024)
            .win_length(1024)
            .hop_length(hop)
            .build()
            .unwrap();
        let mut pipeline = oscillator_pipeline(config);
        let features = pipeline.process(&score, None, None).unwrap();
        assert_eq!(features.shape(), (128, 66150 / hop + 1), "hop {}", hop);
    }
}

#[test]
fn test_config_controls_shape() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());

    let narrow = AudioConfig::builder().n_mels(64).build().unwrap();
    let features = oscillator_pipeline(narrow).process(&score, None, None).unwrap();
    assert_eq!(features.shape(), (64, 130));

    let linear = AudioConfig::builder().use_mel(false).build().unwrap();
    let features = oscillator_pipeline(linear).process(&score, None, None).unwrap();
    assert_eq!(features.shape(), (1025, 130));
    assert_in_range(&features, -80.0, 0.0);

    let raw = AudioConfig::builder().use_mel(false).log_scale(false).build().unwrap();
    let features = oscillator_pipeline(raw).process(&score, None, None).unwrap();
    assert!(features.min().unwrap() >= 0.0);
    assert!(features.max().unwrap() > 0.0);
}

#[test]
fn test_top_db_sets_floor() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());

    let config = AudioConfig::builder().top_db(40.0).build().unwrap();
    let features = oscillator_pipeline(config).process(&score, None, None).unwrap();
    assert_in_range(&features, -40.0, 0.0);
    assert_eq!(features.min(), Some(-40.0));
}

#[test]
fn test_tempo_map_sets_length() {
    let dir = tempfile::tempdir().unwrap();
    // One beat at 60 BPM = 1 second
    let score = ScoreBuilder::new()
        .tempo(0, 1_000_000)
        .note(FixtureNote::new(0, 69, 0, TICKS_PER_BEAT as u32))
        .write(&dir.path().join("slow.mid"));

    let features = oscillator_pipeline(AudioConfig::default())
        .process(&score, None, None)
        .unwrap();
    assert_eq!(features.time_frames(), 22050 / 512 + 1);
}

#[test]
fn test_tail_extends_frames() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());

    let mut pipeline = oscillator_pipeline(AudioConfig::default())
        .with_render_settings(RenderSettings::default().tail_seconds(1.0));
    let features = pipeline.process(&score, None, None).unwrap();
    assert_eq!(features.time_frames(), 88200 / 512 + 1);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_process_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let score = helpers::scale_fixture(dir.path(), "scale.mid", 60, 8);

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let first = pipeline.process(&score, None, None).unwrap();
    let second = pipeline.process(&score, None, None).unwrap();
    let fresh = oscillator_pipeline(AudioConfig::default())
        .process(&score, None, None)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

// =============================================================================
// Artifacts
// =============================================================================

#[test]
fn test_artifacts_match_results() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());
    let wav = dir.path().join("chord.wav");
    let npy = dir.path().join("chord.npy");

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let output = pipeline.process_detailed(&score, Some(&wav), Some(&npy)).unwrap();
    assert!(output.warnings.is_empty());

    assert_eq!(read_npy(&npy).unwrap(), output.features);

    let (samples, sample_rate) = read_wav_mono(&wav).unwrap();
    assert_eq!(sample_rate, 22050);
    assert_eq!(samples.len(), 66150);
    assert_has_audio(&samples, AUDIBLE_RMS);

    let rendered = MidiRenderer::oscillator(22050).render(&score).unwrap();
    let max_diff = samples
        .iter()
        .zip(rendered.samples())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    // Written at 32767 full scale, read back at 32768
    assert!(max_diff <= 2.0 * INT16_EPSILON, "WAV differs by {}", max_diff);
}

#[test]
fn test_unwritable_artifacts_are_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let score = three_second_chord(dir.path());
    let wav = dir.path().join("missing").join("chord.wav");
    let npy = dir.path().join("missing").join("chord.npy");

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let output = pipeline.process_detailed(&score, Some(&wav), Some(&npy)).unwrap();

    assert_eq!(output.features.shape(), (128, 130));
    let kinds: Vec<ArtifactKind> = output.warnings.iter().map(|w| w.artifact).collect();
    assert_eq!(kinds, vec![ArtifactKind::Waveform, ArtifactKind::Features]);
    assert_eq!(output.warnings[1].path, npy);
    assert!(!wav.exists());
    assert!(!npy.exists());
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_score_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let npy = dir.path().join("out.npy");
    let wav = dir.path().join("out.wav");

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let err = pipeline
        .process(dir.path().join("nope.mid"), Some(&wav), Some(&npy))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert!(!npy.exists());
    assert!(!wav.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_score_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let score = dir.path().join("broken.mid");
    std::fs::write(&score, b"definitely not a midi file").unwrap();
    let npy = dir.path().join("broken.npy");

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let err = pipeline.process(&score, None, Some(&npy)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputParse);
    assert!(!npy.exists());
}

#[test]
fn test_empty_score_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let score = ScoreBuilder::new().write(&dir.path().join("empty.mid"));
    let wav = dir.path().join("empty.wav");
    let npy = dir.path().join("empty.npy");

    let mut pipeline = oscillator_pipeline(AudioConfig::default());
    let err = pipeline.process(&score, Some(&wav), Some(&npy)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!wav.exists());
    assert!(!npy.exists());
}

#[test]
fn test_invalid_config_rejected() {
    let err = AudioConfig::builder().hop_length(4096).build().unwrap_err();
    assert_eq!(Error::from(err).kind(), ErrorKind::InvalidConfig);
}
