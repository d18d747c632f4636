//! Harmonic/percussive source separation
//!
//! Median-filtering HPSS: harmonic content is sustained along time,
//! percussive content is broadband along frequency. Median filtering the
//! spectrogram in each direction and comparing the two enhanced copies
//! assigns every time-frequency cell to exactly one component.
//!
//! # Reference
//!
//! Fitzgerald, D. (2010). Harmonic/Percussive Separation Using Median
//! Filtering. *Proceedings of the International Conference on Digital Audio
//! Effects (DAFx)*.

use crate::error::TranscribeError;
use crate::spectral::stft::Spectrogram;

/// Separate a magnitude spectrogram into harmonic and percussive parts
///
/// # Arguments
///
/// * `spec` - Magnitude spectrogram
/// * `kernel` - Median filter length in frames/bins (typically 31); even
///   values are rounded up to the next odd length
///
/// # Returns
///
/// `(harmonic, percussive)` spectrograms with the same shape as the input.
/// Each cell of the input appears in exactly one of the two outputs (binary
/// masking); ties go to the harmonic component.
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` if `kernel` is zero.
pub fn hpss(
    spec: &Spectrogram,
    kernel: usize,
) -> Result<(Spectrogram, Spectrogram), TranscribeError> {
    if kernel == 0 {
        return Err(TranscribeError::InvalidInput(
            "HPSS kernel must be > 0".to_string(),
        ));
    }

    let num_frames = spec.num_frames();
    let num_bins = spec.num_bins();

    log::debug!(
        "HPSS: {} frames x {} bins, kernel={}",
        num_frames,
        num_bins,
        kernel
    );

    let half = kernel / 2;

    // Harmonic enhancement: median along time, per frequency bin
    let mut harmonic_enhanced = vec![vec![0.0f32; num_bins]; num_frames];
    let mut column = Vec::with_capacity(kernel);
    for b in 0..num_bins {
        for t in 0..num_frames {
            let start = t.saturating_sub(half);
            let end = (t + half + 1).min(num_frames);
            column.clear();
            for frame in &spec.frames[start..end] {
                column.push(frame[b]);
            }
            harmonic_enhanced[t][b] = median(&mut column);
        }
    }

    // Percussive enhancement: median along frequency, per frame
    let mut percussive_enhanced = vec![vec![0.0f32; num_bins]; num_frames];
    for (t, frame) in spec.frames.iter().enumerate() {
        for b in 0..num_bins {
            let start = b.saturating_sub(half);
            let end = (b + half + 1).min(num_bins);
            column.clear();
            column.extend_from_slice(&frame[start..end]);
            percussive_enhanced[t][b] = median(&mut column);
        }
    }

    // Binary masking: each cell goes to the side whose enhanced copy wins
    let mut harmonic_frames = vec![vec![0.0f32; num_bins]; num_frames];
    let mut percussive_frames = vec![vec![0.0f32; num_bins]; num_frames];
    for t in 0..num_frames {
        for b in 0..num_bins {
            if percussive_enhanced[t][b] > harmonic_enhanced[t][b] {
                percussive_frames[t][b] = spec.frames[t][b];
            } else {
                harmonic_frames[t][b] = spec.frames[t][b];
            }
        }
    }

    let harmonic = Spectrogram {
        frames: harmonic_frames,
        bin_frequencies: spec.bin_frequencies.clone(),
        sample_rate: spec.sample_rate,
        frame_size: spec.frame_size,
        hop_size: spec.hop_size,
    };
    let percussive = Spectrogram {
        frames: percussive_frames,
        bin_frequencies: spec.bin_frequencies.clone(),
        sample_rate: spec.sample_rate,
        frame_size: spec.frame_size,
        hop_size: spec.hop_size,
    };

    Ok((harmonic, percussive))
}

/// Median of a scratch buffer (reorders the buffer)
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if values.len() % 2 == 0 {
        (values[values.len() / 2 - 1] + values[values.len() / 2]) * 0.5
    } else {
        values[values.len() / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::stft::stft;

    /// Sustained sine plus periodic broadband clicks
    fn sine_with_clicks(sample_rate: f32) -> Vec<f32> {
        let n = (2.0 * sample_rate) as usize;
        let mut samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin() * 0.3)
            .collect();
        // Clicks every 0.5s: single-sample impulses spread energy across all bins
        let mut pos = 0;
        while pos < n {
            for j in 0..64.min(n - pos) {
                samples[pos + j] += if j % 2 == 0 { 0.6 } else { -0.6 };
            }
            pos += (0.5 * sample_rate) as usize;
        }
        samples
    }

    #[test]
    fn test_hpss_shapes_match() {
        let samples = sine_with_clicks(22050.0);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let (harmonic, percussive) = hpss(&spec, 31).unwrap();

        assert_eq!(harmonic.num_frames(), spec.num_frames());
        assert_eq!(percussive.num_frames(), spec.num_frames());
        assert_eq!(harmonic.num_bins(), spec.num_bins());
    }

    #[test]
    fn test_hpss_partitions_energy() {
        let samples = sine_with_clicks(22050.0);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let (harmonic, percussive) = hpss(&spec, 31).unwrap();

        // Binary masking: harmonic + percussive reassembles the input
        for t in (0..spec.num_frames()).step_by(7) {
            for b in (0..spec.num_bins()).step_by(13) {
                let sum = harmonic.frames[t][b] + percussive.frames[t][b];
                assert!(
                    (sum - spec.frames[t][b]).abs() < 1e-4,
                    "Cell ({}, {}) should be preserved: {} vs {}",
                    t,
                    b,
                    sum,
                    spec.frames[t][b]
                );
            }
        }
    }

    #[test]
    fn test_hpss_sustained_tone_is_harmonic() {
        let samples = sine_with_clicks(22050.0);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let (harmonic, percussive) = hpss(&spec, 31).unwrap();

        // The 440 Hz bin should land mostly in the harmonic component
        let bin = (440.0f32 / (22050.0 / 2048.0)).round() as usize;
        let h_energy: f32 = harmonic.frames.iter().map(|f| f[bin]).sum();
        let p_energy: f32 = percussive.frames.iter().map(|f| f[bin]).sum();
        assert!(
            h_energy > p_energy,
            "Sustained tone should be harmonic: h={:.2}, p={:.2}",
            h_energy,
            p_energy
        );
    }

    #[test]
    fn test_hpss_zero_kernel_rejected() {
        let spec = stft(&vec![0.5f32; 4096], 22050, 2048, 512).unwrap();
        assert!(hpss(&spec, 0).is_err());
    }
}
