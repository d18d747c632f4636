//! Immutable audio signal container
//!
//! The pipeline consumes an already-decoded mono PCM buffer; decoding and
//! resampling are the caller's responsibility.

use crate::error::TranscribeError;

/// Peak amplitude below which a signal is considered silent
const SILENCE_PEAK: f32 = 1e-6;

/// Immutable mono audio signal
///
/// Created once at load time; every downstream stage borrows it read-only.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
    duration: f32,
}

impl AudioSignal {
    /// Create a signal from decoded mono samples
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
    /// * `sample_rate` - Sample rate in Hz (typically 22050 or 44100)
    ///
    /// # Errors
    ///
    /// Returns `TranscribeError::InvalidInput` if the buffer is empty, the
    /// sample rate is zero, or the signal is entirely silent. These are
    /// fatal: the pipeline aborts before stage 1.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, TranscribeError> {
        if samples.is_empty() {
            return Err(TranscribeError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }

        if sample_rate == 0 {
            return Err(TranscribeError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }

        let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        if !peak.is_finite() {
            return Err(TranscribeError::InvalidInput(
                "Audio contains non-finite samples".to_string(),
            ));
        }
        if peak < SILENCE_PEAK {
            return Err(TranscribeError::InvalidInput(
                "Audio signal is silent".to_string(),
            ));
        }

        let duration = samples.len() as f32 / sample_rate as f32;

        log::debug!(
            "Loaded signal: {} samples at {} Hz ({:.1}s)",
            samples.len(),
            sample_rate,
            duration
        );

        Ok(Self {
            samples,
            sample_rate,
            duration,
        })
    }

    /// Audio samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
