//! Chroma profile extraction
//!
//! Folds the magnitude spectrogram onto the 12 pitch classes, averaged over
//! the whole signal. One profile per signal is all the key heuristic needs.

use crate::spectral::Spectrogram;

/// Compute a 12-bin pitch-class energy profile averaged over all frames
///
/// Each FFT bin's magnitude is assigned to the pitch class of its center
/// frequency (nearest semitone, octave-folded). The per-frame sums are
/// averaged over the whole spectrogram.
///
/// # Arguments
///
/// * `spec` - Magnitude spectrogram
///
/// # Returns
///
/// 12-element profile, index 0 = C. An empty spectrogram yields the
/// all-zero profile; the key estimator treats that as degenerate input.
pub fn chroma_profile(spec: &Spectrogram) -> [f32; 12] {
    let mut profile = [0.0f32; 12];

    if spec.num_frames() == 0 {
        return profile;
    }

    log::debug!(
        "Computing chroma profile over {} frames",
        spec.num_frames()
    );

    // Bin 0 is DC and has no pitch class; precompute the mapping once
    let bin_classes: Vec<Option<usize>> = spec
        .bin_frequencies
        .iter()
        .map(|&f| {
            if f > 0.0 {
                let midi = 69.0 + 12.0 * (f / 440.0).log2();
                Some((midi.round() as i64).rem_euclid(12) as usize)
            } else {
                None
            }
        })
        .collect();

    for frame in &spec.frames {
        for (b, &mag) in frame.iter().enumerate() {
            if let Some(pc) = bin_classes[b] {
                profile[pc] += mag;
            }
        }
    }

    let n = spec.num_frames() as f32;
    for v in &mut profile {
        *v /= n;
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::stft;

    fn sine(freq: f32, duration: f32, sample_rate: f32) -> Vec<f32> {
        let n = (duration * sample_rate) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_chroma_profile_a440() {
        let samples = sine(440.0, 2.0, 22050.0);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let profile = chroma_profile(&spec);

        let argmax = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(argmax, 9, "A440 should dominate pitch class 9 (A)");
    }

    #[test]
    fn test_chroma_profile_octave_folding() {
        // A2 (110 Hz) and A5 (880 Hz) both land in pitch class 9
        let sample_rate = 22050.0;
        let samples: Vec<f32> = sine(110.0, 2.0, sample_rate)
            .iter()
            .zip(sine(880.0, 2.0, sample_rate).iter())
            .map(|(&a, &b)| a + b)
            .collect();
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let profile = chroma_profile(&spec);

        let argmax = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(argmax, 9);
    }

    #[test]
    fn test_chroma_profile_empty_spectrogram() {
        let spec = stft(&vec![0.1f32; 100], 22050, 2048, 512).unwrap();
        let profile = chroma_profile(&spec);
        assert!(profile.iter().all(|&v| v == 0.0));
    }
}
