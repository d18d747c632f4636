//! Spectral flux envelope
//!
//! Frame-to-frame spectral change with half-wave rectification: increases
//! in magnitude count, decays do not. Serves as the onset-strength envelope
//! for tempo estimation and percussive diagnostics.

use crate::spectral::stft::Spectrogram;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Compute the spectral flux envelope of a magnitude spectrogram
///
/// # Arguments
///
/// * `spec` - Magnitude spectrogram (n_frames x n_bins)
///
/// # Returns
///
/// Envelope of length `n_frames - 1` (one value per frame transition),
/// normalized to [0, 1]. Fewer than 2 frames yields an empty envelope.
pub fn spectral_flux(spec: &Spectrogram) -> Vec<f32> {
    if spec.num_frames() < 2 {
        return Vec::new();
    }

    log::debug!(
        "Computing spectral flux: {} frames, {} bins",
        spec.num_frames(),
        spec.num_bins()
    );

    let mut flux = Vec::with_capacity(spec.num_frames() - 1);

    for i in 1..spec.num_frames() {
        let prev = &spec.frames[i - 1];
        let curr = &spec.frames[i];

        let sum: f32 = prev
            .iter()
            .zip(curr.iter())
            .map(|(&p, &c)| (c - p).max(0.0))
            .sum();
        flux.push(sum);
    }

    // Normalize to [0, 1]
    let max_flux = flux.iter().copied().fold(0.0f32, f32::max);
    if max_flux > EPSILON {
        for v in &mut flux {
            *v /= max_flux;
        }
    }

    flux
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::stft::stft;

    #[test]
    fn test_flux_step_function() {
        // Silence then a tone: flux should spike at the transition
        let sample_rate = 22050.0;
        let mut samples = vec![0.0f32; 44100];
        for (i, s) in samples.iter_mut().enumerate().skip(22050) {
            *s = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin() * 0.5;
        }

        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let flux = spectral_flux(&spec);

        assert_eq!(flux.len(), spec.num_frames() - 1);

        let (peak_idx, peak_val) = flux
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap();
        assert!((*peak_val - 1.0).abs() < 1e-6, "Envelope should be normalized");

        // Transition sits at ~1.0s = frame 43
        let expected = 22050 / 512;
        assert!(
            (peak_idx as i32 - expected as i32).abs() <= 3,
            "Flux peak should be near frame {}, got {}",
            expected,
            peak_idx
        );
    }

    #[test]
    fn test_flux_too_few_frames() {
        // Exactly one STFT frame: no transition to measure
        let spec = stft(&vec![0.5f32; 2048], 22050, 2048, 512).unwrap();
        assert_eq!(spec.num_frames(), 1);
        assert!(spectral_flux(&spec).is_empty());
    }
}
