//! Tempo estimation and beat placement
//!
//! Applies an FFT tempogram to the spectral-flux envelope: the envelope
//! frequency with the highest power indicates the tempo. Beats are then
//! placed on the period grid whose phase best explains the envelope.
//!
//! # Reference
//!
//! Grosche, P., Müller, M., & Serrà, J. (2012). Robust Local Features for
//! Remote Folk Music Identification. *IEEE Transactions on Audio, Speech,
//! and Language Processing*.

use crate::config::TranscriptionConfig;
use crate::error::TranscribeError;
use crate::spectral::{spectral_flux, Spectrogram};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Minimum envelope length for tempogram analysis
const MIN_ENVELOPE_LEN: usize = 8;

/// Tempo estimate with beat timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Estimated tempo in BPM, rounded to the nearest integer, always > 0
    pub bpm: f32,

    /// Beat timestamps in seconds, non-decreasing; empty when the
    /// tempogram produced no candidate and the fallback BPM was used
    pub beat_times: Vec<f32>,
}

/// Tempo estimator over a BPM search range
#[derive(Debug, Clone)]
pub struct TempoEstimator {
    min_bpm: f32,
    max_bpm: f32,
    fallback_bpm: f32,
}

impl TempoEstimator {
    /// Build an estimator from the pipeline configuration
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self {
            min_bpm: config.min_bpm,
            max_bpm: config.max_bpm,
            fallback_bpm: config.fallback_bpm,
        }
    }

    /// Estimate tempo and beat times from a magnitude spectrogram
    ///
    /// The envelope frequency axis is searched within `[min_bpm, max_bpm]`;
    /// candidates are ranked by tempogram power and the first is used. If
    /// no candidate exists (signal too short, or a flat envelope), the
    /// configured fallback BPM is returned with empty beat times — a
    /// documented substitution, not an error.
    ///
    /// # Arguments
    ///
    /// * `spec` - Magnitude spectrogram of the full signal
    ///
    /// # Returns
    ///
    /// A [`TempoEstimate`] with `bpm > 0`.
    ///
    /// # Errors
    ///
    /// Returns `TranscribeError::InvalidInput` if the configured BPM range
    /// is empty or non-positive.
    pub fn estimate(&self, spec: &Spectrogram) -> Result<TempoEstimate, TranscribeError> {
        if self.min_bpm <= 0.0 || self.max_bpm <= self.min_bpm {
            return Err(TranscribeError::InvalidInput(format!(
                "Invalid BPM range: min={}, max={}",
                self.min_bpm, self.max_bpm
            )));
        }
        if self.fallback_bpm <= 0.0 {
            return Err(TranscribeError::InvalidInput(
                "Fallback BPM must be > 0".to_string(),
            ));
        }

        let envelope = spectral_flux(spec);
        if envelope.len() < MIN_ENVELOPE_LEN {
            log::warn!(
                "Envelope too short for tempo estimation ({} values), using fallback {} BPM",
                envelope.len(),
                self.fallback_bpm
            );
            return Ok(self.fallback());
        }

        let frame_rate = spec.frame_rate();
        let candidates = tempogram_candidates(&envelope, frame_rate, self.min_bpm, self.max_bpm);

        let raw_bpm = match candidates.first() {
            Some(&(bpm, _)) => bpm,
            None => {
                log::warn!(
                    "No tempo candidate in [{:.0}, {:.0}] BPM, using fallback {} BPM",
                    self.min_bpm,
                    self.max_bpm,
                    self.fallback_bpm
                );
                return Ok(self.fallback());
            }
        };

        let bpm = raw_bpm.round().max(1.0);

        // Place beats on the period grid whose phase maximizes envelope sum
        let period_frames = 60.0 / bpm * frame_rate;
        let beat_times = place_beats(&envelope, period_frames, spec);

        log::debug!(
            "Estimated tempo: {:.0} BPM (raw {:.2}), {} beats",
            bpm,
            raw_bpm,
            beat_times.len()
        );

        Ok(TempoEstimate { bpm, beat_times })
    }

    fn fallback(&self) -> TempoEstimate {
        TempoEstimate {
            bpm: self.fallback_bpm,
            beat_times: Vec::new(),
        }
    }
}

/// Rank tempo candidates by FFT power over the envelope
///
/// The envelope is mean-subtracted, Hann-windowed, and zero-padded before
/// the FFT so nearby tempi resolve to distinct bins. Returns `(bpm, power)`
/// pairs within the requested range, highest power first.
fn tempogram_candidates(
    envelope: &[f32],
    frame_rate: f32,
    min_bpm: f32,
    max_bpm: f32,
) -> Vec<(f32, f32)> {
    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;

    let fft_size = (envelope.len() * 4).next_power_of_two().max(8192);

    let mut buffer: Vec<Complex<f32>> = envelope
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let w = 0.5
                * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (envelope.len() - 1) as f32)
                        .cos());
            Complex::new((x - mean) * w, 0.0)
        })
        .collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    let mut candidates = Vec::new();
    for (k, value) in buffer.iter().enumerate().take(fft_size / 2).skip(1) {
        let freq_hz = k as f32 * frame_rate / fft_size as f32;
        let bpm = freq_hz * 60.0;
        if bpm < min_bpm || bpm > max_bpm {
            continue;
        }
        let power = value.norm_sqr();
        if power > EPSILON {
            candidates.push((bpm, power));
        }
    }

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Choose the beat phase that maximizes summed envelope energy and expand
/// it to beat timestamps covering the spectrogram
fn place_beats(envelope: &[f32], period_frames: f32, spec: &Spectrogram) -> Vec<f32> {
    if period_frames < 1.0 {
        return Vec::new();
    }

    let period_int = period_frames.floor() as usize;
    let mut best_phase = 0usize;
    let mut best_sum = f32::MIN;

    for phase in 0..period_int.max(1) {
        let mut sum = 0.0f32;
        let mut k = 0usize;
        loop {
            let idx = (phase as f32 + k as f32 * period_frames).round() as usize;
            if idx >= envelope.len() {
                break;
            }
            sum += envelope[idx];
            k += 1;
        }
        if sum > best_sum {
            best_sum = sum;
            best_phase = phase;
        }
    }

    let mut beats = Vec::new();
    let mut k = 0usize;
    loop {
        let frame = best_phase as f32 + k as f32 * period_frames;
        if frame >= envelope.len() as f32 {
            break;
        }
        // Envelope index i describes the transition into frame i + 1
        beats.push((frame + 1.0) * spec.hop_size as f32 / spec.sample_rate as f32);
        k += 1;
    }
    beats
}
