//! # Strudel DSP
//!
//! An audio analysis engine that transcribes decoded audio into a Strudel
//! pattern program: tempo and key detection, percussive onset detection per
//! instrument band, bass/melody pitch tracking, grid quantization, and
//! deterministic code emission.
//!
//! ## Features
//!
//! - **Tempo**: FFT tempogram over the spectral-flux envelope, with beat placement
//! - **Key**: chroma-profile root plus a third-comparison major/minor heuristic
//! - **Drums**: HPSS separation and percentile-thresholded band peak picking
//! - **Bass/Melody**: range-restricted pitch tracking with grid quantization
//! - **Emission**: reproducible Strudel code, with documented fallbacks at
//!   every stage boundary
//!
//! ## Quick Start
//!
//! ```no_run
//! use strudel_dsp::{transcribe_audio, TranscriptionConfig};
//!
//! // Decoded mono samples, normalized to [-1.0, 1.0]
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 22050;
//!
//! let result = transcribe_audio(&samples, sample_rate, TranscriptionConfig::default())?;
//!
//! println!("BPM: {:.0}", result.tempo.bpm);
//! println!("Key: {} {}", result.key.root_name(), result.key.mode_name());
//! println!("{}", result.code);
//! # Ok::<(), strudel_dsp::TranscribeError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a single straight-line transformation per invocation:
//!
//! ```text
//! Signal → Estimates/Events → Quantized → Simplified → Emitted
//! ```
//!
//! No component reads back upstream state, nothing is cached across calls,
//! and every stage boundary substitutes a documented fallback when its
//! upstream output is empty or degenerate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod emit;
pub mod error;
pub mod features;
pub mod pattern;
pub mod quantize;
pub mod signal;
pub mod spectral;

// Re-export main types
pub use analysis::result::{DrumAnalysis, Transcription, TranscriptionMetadata};
pub use config::TranscriptionConfig;
pub use error::TranscribeError;
pub use features::key::KeyEstimate;
pub use features::tempo::TempoEstimate;
pub use signal::AudioSignal;

use emit::emit_program;
use features::chroma::chroma_profile;
use features::key::estimate_key;
use features::onset::PercussiveOnsetDetector;
use features::pitch::PitchTracker;
use features::tempo::TempoEstimator;
use pattern::DrumPatternSet;
use quantize::quantize_notes;
use spectral::{hpss, preemphasis, stft};

/// Pre-emphasis coefficient for bass tracking; negative boosts lows
const BASS_PREEMPHASIS: f32 = -0.97;

/// Transcribe decoded audio into a Strudel pattern program
///
/// Runs the full pipeline: tempo and key estimation, percussive onset
/// detection, bass/melody pitch tracking, quantization, pattern folding,
/// and code emission. The drum, bass, and melody layers of the result are
/// `None` when their stage produced nothing usable; tempo and key always
/// resolve via documented fallbacks.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 22050 or 44100)
/// * `config` - Pipeline configuration parameters
///
/// # Returns
///
/// A [`Transcription`] with the emitted program in `code`
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` for an empty or silent signal
/// (fatal, surfaced before stage 1) or malformed configuration. Stages
/// that merely find nothing (no onsets, no voiced frames) never error.
///
/// # Example
///
/// ```no_run
/// use strudel_dsp::{transcribe_audio, TranscriptionConfig};
///
/// let samples = vec![0.1f32; 22050 * 8];
/// let result = transcribe_audio(&samples, 22050, TranscriptionConfig::default())?;
/// # Ok::<(), strudel_dsp::TranscribeError>(())
/// ```
pub fn transcribe_audio(
    samples: &[f32],
    sample_rate: u32,
    config: TranscriptionConfig,
) -> Result<Transcription, TranscribeError> {
    use std::time::Instant;
    let start_time = Instant::now();

    let signal = AudioSignal::new(samples.to_vec(), sample_rate)?;

    log::debug!(
        "Starting transcription: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    // Spectral analysis shared by tempo, key, and drum stages
    let spec = stft(
        signal.samples(),
        sample_rate,
        config.frame_size,
        config.hop_size,
    )?;

    // Tempo and key
    let tempo = TempoEstimator::from_config(&config).estimate(&spec)?;
    let profile = chroma_profile(&spec);
    let key = estimate_key(&profile);

    // Percussive onsets over the percussive component
    let (harmonic, percussive) = hpss(&spec, config.hpss_kernel)?;
    let onsets = PercussiveOnsetDetector::from_config(&config).detect(&percussive)?;
    let patterns = DrumPatternSet::from_onsets(&onsets, tempo.bpm, signal.duration());
    let drums = Some(DrumAnalysis { onsets, patterns });

    // Bass: pre-emphasized full signal, low range
    let bass_samples = preemphasis(signal.samples(), BASS_PREEMPHASIS);
    let bass_spec = stft(
        &bass_samples,
        sample_rate,
        config.frame_size,
        config.hop_size,
    )?;
    let bass_notes = PitchTracker::new(config.bass_range.clone(), false).track(&bass_spec)?;
    let bass = quantize_notes(&bass_notes, config.grid_resolution)?;

    // Melody: harmonic component only, with the median magnitude floor
    let melody_notes = PitchTracker::new(config.melody_range.clone(), true).track(&harmonic)?;
    let melody = quantize_notes(&melody_notes, config.grid_resolution)?;

    let bass = if bass.is_empty() { None } else { Some(bass) };
    let melody = if melody.is_empty() { None } else { Some(melody) };

    let code = emit_program(
        &tempo,
        key,
        drums.as_ref().map(|d| &d.patterns),
        bass.as_deref().unwrap_or(&[]),
        melody.as_deref().unwrap_or(&[]),
        signal.duration(),
    );

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Transcription complete in {:.1} ms: {:.0} BPM, {} {}",
        processing_time_ms,
        tempo.bpm,
        key.root_name(),
        key.mode_name()
    );

    Ok(Transcription {
        tempo,
        key,
        drums,
        bass,
        melody,
        code,
        metadata: TranscriptionMetadata {
            duration_seconds: signal.duration(),
            sample_rate,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
