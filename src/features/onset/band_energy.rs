//! Per-band energy curves
//!
//! Averages spectrogram magnitude within a frequency band, one value per
//! frame. The curves feed percentile-thresholded peak picking.

use crate::error::TranscribeError;
use crate::spectral::Spectrogram;

/// Average magnitude within a frequency band, per frame
///
/// # Arguments
///
/// * `spec` - Magnitude spectrogram
/// * `low_hz` - Lower band edge (inclusive)
/// * `high_hz` - Upper band edge (inclusive)
///
/// # Returns
///
/// One mean magnitude per frame. If no FFT bin falls inside the band
/// (e.g. the band sits above Nyquist) the curve is all zeros and a
/// warning is logged; the caller treats that as a silent band.
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` if the band edges are not an
/// increasing non-negative pair.
pub fn band_energy_curve(
    spec: &Spectrogram,
    low_hz: f32,
    high_hz: f32,
) -> Result<Vec<f32>, TranscribeError> {
    if low_hz < 0.0 || high_hz <= low_hz {
        return Err(TranscribeError::InvalidInput(format!(
            "Invalid band range: [{}, {}] Hz",
            low_hz, high_hz
        )));
    }

    let bins: Vec<usize> = spec
        .bin_frequencies
        .iter()
        .enumerate()
        .filter(|(_, &f)| f >= low_hz && f <= high_hz)
        .map(|(i, _)| i)
        .collect();

    if bins.is_empty() {
        log::warn!(
            "No FFT bins in band [{:.0}, {:.0}] Hz at {} Hz sample rate",
            low_hz,
            high_hz,
            spec.sample_rate
        );
        return Ok(vec![0.0; spec.num_frames()]);
    }

    let curve = spec
        .frames
        .iter()
        .map(|frame| bins.iter().map(|&b| frame[b]).sum::<f32>() / bins.len() as f32)
        .collect();

    Ok(curve)
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
    fn test_band_energy_captures_in_band_tone() {
        let samples = sine(100.0, 1.0, 22050.0);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();

        let kick_curve = band_energy_curve(&spec, 60.0, 150.0).unwrap();
        let hihat_curve = band_energy_curve(&spec, 5000.0, 15000.0).unwrap();

        assert_eq!(kick_curve.len(), spec.num_frames());

        let kick_mean: f32 = kick_curve.iter().sum::<f32>() / kick_curve.len() as f32;
        let hihat_mean: f32 = hihat_curve.iter().sum::<f32>() / hihat_curve.len() as f32;
        assert!(
            kick_mean > hihat_mean * 100.0,
            "100 Hz tone should dominate the kick band: kick={:.4}, hihat={:.6}",
            kick_mean,
            hihat_mean
        );
    }

    #[test]
    fn test_band_energy_above_nyquist_is_zero() {
        let samples = sine(100.0, 0.5, 8000.0);
        let spec = stft(&samples, 8000, 2048, 512).unwrap();
        // Band entirely above the 4 kHz Nyquist
        let curve = band_energy_curve(&spec, 5000.0, 15000.0).unwrap();
        assert!(curve.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_band_energy_invalid_range() {
        let spec = stft(&vec![0.5f32; 4096], 22050, 2048, 512).unwrap();
        assert!(band_energy_curve(&spec, 400.0, 150.0).is_err());
        assert!(band_energy_curve(&spec, -10.0, 150.0).is_err());
    }
}
