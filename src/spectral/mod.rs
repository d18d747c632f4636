//! Spectral transform primitives
//!
//! Low-level DSP plumbing shared by the feature extractors:
//! - Short-time Fourier transform (magnitude spectrogram)
//! - Harmonic/percussive source separation (median filtering)
//! - Spectral flux envelope
//! - Pre-emphasis filtering

pub mod flux;
pub mod hpss;
pub mod stft;

pub use flux::spectral_flux;
pub use hpss::hpss;
pub use stft::{stft, Spectrogram};

/// Apply a first-order pre-emphasis filter: `y[n] = x[n] - coef * x[n-1]`
///
/// With a positive coefficient this boosts high frequencies; with a
/// negative coefficient (e.g. -0.97) it boosts low frequencies instead,
/// which is used to bring out bass content before pitch tracking.
///
/// # Arguments
///
/// * `samples` - Input samples
/// * `coef` - Filter coefficient, typically in [-1.0, 1.0]
///
/// # Returns
///
/// Filtered samples, same length as the input
pub fn preemphasis(samples: &[f32], coef: f32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(samples.len());
    out.push(samples[0]);
    for i in 1..samples.len() {
        out.push(samples[i] - coef * samples[i - 1]);
    }
    out
}
