//! Peak picking over band energy curves
//!
//! Percentile-derived thresholds plus local-maximum selection with a
//! refractory gap. The percentile threshold trades precision for
//! robustness: it adapts to each band's overall level instead of assuming
//! a calibrated absolute scale.

use crate::error::TranscribeError;

/// Windowing parameters for peak selection
///
/// A frame is a peak when it is the maximum of its `[i - pre_max,
/// i + post_max)` neighborhood, exceeds the neighborhood mean over
/// `[i - pre_avg, i + post_avg)` by at least `delta`, and is more than
/// `wait` frames after the previous accepted peak.
#[derive(Debug, Clone)]
pub struct PeakPickParams {
    /// Frames to inspect before a candidate for the max test
    pub pre_max: usize,

    /// Frames to inspect after a candidate for the max test
    pub post_max: usize,

    /// Frames before a candidate for the mean test
    pub pre_avg: usize,

    /// Frames after a candidate for the mean test
    pub post_avg: usize,

    /// Minimum gap between accepted peaks, in frames
    pub wait: usize,
}

impl Default for PeakPickParams {
    fn default() -> Self {
        Self {
            pre_max: 3,
            post_max: 3,
            pre_avg: 3,
            post_avg: 5,
            wait: 4,
        }
    }
}

/// Compute a percentile threshold over a set of values
///
/// # Arguments
///
/// * `values` - Energy/flux values to threshold
/// * `percentile` - Percentile in [0.0, 1.0], e.g. 0.8 for the 80th
///
/// # Returns
///
/// The value at the given percentile of the sorted input
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` if `values` is empty or the
/// percentile is out of range.
pub fn percentile_threshold(values: &[f32], percentile: f32) -> Result<f32, TranscribeError> {
    if values.is_empty() {
        return Err(TranscribeError::InvalidInput(
            "Empty values for threshold calculation".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&percentile) {
        return Err(TranscribeError::InvalidInput(format!(
            "Percentile must be in [0.0, 1.0], got {}",
            percentile
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let idx = ((sorted.len() as f32) * percentile) as usize;
    Ok(sorted[idx.min(sorted.len() - 1)])
}

/// Pick peaks in an energy curve
///
/// # Arguments
///
/// * `curve` - Energy curve (one value per frame)
/// * `delta` - Minimum margin above the local mean
/// * `params` - Windowing parameters
///
/// # Returns
///
/// Frame indices of accepted peaks, in increasing order
pub fn pick_peaks(curve: &[f32], delta: f32, params: &PeakPickParams) -> Vec<usize> {
    let n = curve.len();
    if n == 0 {
        return Vec::new();
    }

    let mut peaks: Vec<usize> = Vec::new();

    for i in 0..n {
        let max_start = i.saturating_sub(params.pre_max);
        let max_end = (i + params.post_max).min(n);
        let window_max = curve[max_start..max_end]
            .iter()
            .copied()
            .fold(f32::MIN, f32::max);

        if curve[i] < window_max || window_max <= 0.0 {
            continue;
        }

        let avg_start = i.saturating_sub(params.pre_avg);
        let avg_end = (i + params.post_avg).min(n);
        let window_mean =
            curve[avg_start..avg_end].iter().sum::<f32>() / (avg_end - avg_start) as f32;

        if curve[i] < window_mean + delta {
            continue;
        }

        if let Some(&last) = peaks.last() {
            if i <= last + params.wait {
                continue;
            }
        }

        peaks.push(i);
    }

    log::debug!("Picked {} peaks from {} frames (delta={:.4})", peaks.len(), n, delta);

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_threshold_basic() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let threshold = percentile_threshold(&values, 0.8).unwrap();
        assert!((threshold - 5.0).abs() < 0.1);

        let median = percentile_threshold(&values, 0.5).unwrap();
        assert!((median - 3.0).abs() < 0.1);
    }

    #[test]
    fn test_percentile_threshold_empty() {
        assert!(percentile_threshold(&[], 0.8).is_err());
    }

    #[test]
    fn test_percentile_threshold_invalid_percentile() {
        let values = vec![1.0, 2.0, 3.0];
        assert!(percentile_threshold(&values, -0.1).is_err());
        assert!(percentile_threshold(&values, 1.1).is_err());
    }

    #[test]
    fn test_pick_peaks_isolated_spikes() {
        let mut curve = vec![0.0f32; 64];
        curve[10] = 1.0;
        curve[30] = 0.8;
        curve[50] = 0.9;

        let peaks = pick_peaks(&curve, 0.1, &PeakPickParams::default());
        assert_eq!(peaks, vec![10, 30, 50]);
    }

    #[test]
    fn test_pick_peaks_refractory_gap() {
        let mut curve = vec![0.0f32; 32];
        curve[10] = 1.0;
        curve[12] = 0.9; // too close: within wait=4 of the first peak

        let peaks = pick_peaks(&curve, 0.1, &PeakPickParams::default());
        assert_eq!(peaks, vec![10]);
    }

    #[test]
    fn test_pick_peaks_below_delta_rejected() {
        let curve = vec![0.5f32; 32];
        // Flat curve: nothing exceeds the local mean by delta
        let peaks = pick_peaks(&curve, 0.1, &PeakPickParams::default());
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_pick_peaks_empty_curve() {
        assert!(pick_peaks(&[], 0.1, &PeakPickParams::default()).is_empty());
    }
}
