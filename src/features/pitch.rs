//! Range-restricted pitch tracking
//!
//! Picks the strongest spectral peak inside a frequency range per frame,
//! refines it with parabolic interpolation, and converts accepted
//! frequencies to MIDI. Frames with no positive, finite pitch are
//! rejected at detection time so invalid values never reach quantization.

use crate::error::TranscribeError;
use crate::spectral::Spectrogram;
use serde::{Deserialize, Serialize};

/// Frequency search range for pitch tracking
#[derive(Debug, Clone)]
pub struct PitchRange {
    /// Lower bound in Hz (inclusive)
    pub min_hz: f32,

    /// Upper bound in Hz (inclusive)
    pub max_hz: f32,
}

/// A pitched frame observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PitchedNote {
    /// Frame time in seconds
    pub time: f32,

    /// MIDI note number (nearest semitone)
    pub midi: i32,

    /// Interpolated frequency in Hz
    pub frequency: f32,
}

/// Convert a frequency in Hz to a (fractional) MIDI note number
///
/// # Arguments
///
/// * `frequency` - Frequency in Hz, must be > 0 for a meaningful result
pub fn hz_to_midi(frequency: f32) -> f32 {
    69.0 + 12.0 * (frequency / 440.0).log2()
}

/// Pitch tracker restricted to a frequency range
///
/// With `median_floor` enabled (melody), candidates must also exceed the
/// median of all positive candidate magnitudes; quiet frames are treated
/// as unvoiced.
#[derive(Debug, Clone)]
pub struct PitchTracker {
    range: PitchRange,
    median_floor: bool,
}

impl PitchTracker {
    /// Create a tracker for a frequency range
    ///
    /// # Arguments
    ///
    /// * `range` - Frequency search range
    /// * `median_floor` - Apply the median magnitude floor (melody mode)
    pub fn new(range: PitchRange, median_floor: bool) -> Self {
        Self {
            range,
            median_floor,
        }
    }

    /// Track pitches over a magnitude spectrogram
    ///
    /// # Arguments
    ///
    /// * `spec` - Magnitude spectrogram (full signal for bass, harmonic
    ///   component for melody)
    ///
    /// # Returns
    ///
    /// Time-ordered pitched notes. An empty result is degenerate analysis
    /// (no voiced frames), not an error.
    ///
    /// # Errors
    ///
    /// Returns `TranscribeError::InvalidInput` if the range is malformed.
    pub fn track(&self, spec: &Spectrogram) -> Result<Vec<PitchedNote>, TranscribeError> {
        if self.range.min_hz <= 0.0 || self.range.max_hz <= self.range.min_hz {
            return Err(TranscribeError::InvalidInput(format!(
                "Invalid pitch range: [{}, {}] Hz",
                self.range.min_hz, self.range.max_hz
            )));
        }

        let bins: Vec<usize> = spec
            .bin_frequencies
            .iter()
            .enumerate()
            .filter(|(_, &f)| f >= self.range.min_hz && f <= self.range.max_hz)
            .map(|(i, _)| i)
            .collect();

        if bins.is_empty() {
            log::warn!(
                "No FFT bins in pitch range [{:.0}, {:.0}] Hz",
                self.range.min_hz,
                self.range.max_hz
            );
            return Ok(Vec::new());
        }

        log::debug!(
            "Tracking pitch in [{:.0}, {:.0}] Hz over {} frames (median_floor={})",
            self.range.min_hz,
            self.range.max_hz,
            spec.num_frames(),
            self.median_floor
        );

        // Pass 1: strongest in-range candidate per frame
        let mut candidates: Vec<(f32, f32, f32)> = Vec::new(); // (time, freq, magnitude)

        for (t, frame) in spec.frames.iter().enumerate() {
            let mut best_bin = bins[0];
            let mut best_mag = 0.0f32;
            for &b in &bins {
                if frame[b] > best_mag {
                    best_mag = frame[b];
                    best_bin = b;
                }
            }

            if best_mag <= 0.0 {
                continue; // unvoiced frame
            }

            let frequency = interpolate_peak(frame, best_bin, spec);
            if !frequency.is_finite() || frequency <= 0.0 {
                continue; // numeric edge case, rejected at detection
            }

            candidates.push((spec.frame_time(t), frequency, best_mag));
        }

        // Pass 2: optional magnitude floor at the median positive magnitude
        let floor = if self.median_floor && !candidates.is_empty() {
            let mut mags: Vec<f32> = candidates.iter().map(|c| c.2).collect();
            mags.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            mags[mags.len() / 2]
        } else {
            0.0
        };

        let notes: Vec<PitchedNote> = candidates
            .into_iter()
            .filter(|&(_, _, mag)| !self.median_floor || mag > floor)
            .map(|(time, frequency, _)| PitchedNote {
                time,
                midi: hz_to_midi(frequency).round() as i32,
                frequency,
            })
            .collect();

        log::debug!("Tracked {} pitched frames", notes.len());

        Ok(notes)
    }
}

/// Refine a peak bin to a fractional frequency via parabolic interpolation
fn interpolate_peak(frame: &[f32], bin: usize, spec: &Spectrogram) -> f32 {
    let bin_width = spec.sample_rate as f32 / spec.frame_size as f32;

    if bin == 0 || bin + 1 >= frame.len() {
        return bin as f32 * bin_width;
    }

    let left = frame[bin - 1];
    let center = frame[bin];
    let right = frame[bin + 1];

    let denom = left - 2.0 * center + right;
    let offset = if denom.abs() > 1e-12 {
        0.5 * (left - right) / denom
    } else {
        0.0
    };

    (bin as f32 + offset.clamp(-0.5, 0.5)) * bin_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::stft;

    fn sine(freq: f32, duration: f32, sample_rate: f32, amplitude: f32) -> Vec<f32> {
        let n = (duration * sample_rate) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin() * amplitude
            })
            .collect()
    }

    #[test]
    fn test_hz_to_midi_reference_points() {
        assert!((hz_to_midi(440.0) - 69.0).abs() < 1e-4);
        assert!((hz_to_midi(220.0) - 57.0).abs() < 1e-4);
        assert!((hz_to_midi(261.63) - 60.0).abs() < 0.05);
    }

    #[test]
    fn test_track_bass_sine() {
        let samples = sine(110.0, 2.0, 22050.0, 0.5);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let tracker = PitchTracker::new(
            PitchRange {
                min_hz: 30.0,
                max_hz: 300.0,
            },
            false,
        );
        let notes = tracker.track(&spec).unwrap();

        assert!(!notes.is_empty());
        // A2 = MIDI 45
        let hits = notes.iter().filter(|n| n.midi == 45).count();
        assert!(
            hits * 2 > notes.len(),
            "Most frames should track A2 (MIDI 45): {} of {}",
            hits,
            notes.len()
        );
    }

    #[test]
    fn test_track_range_restriction() {
        // A 440 Hz tone is invisible to a 30-300 Hz tracker
        let samples = sine(440.0, 1.0, 22050.0, 0.5);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let tracker = PitchTracker::new(
            PitchRange {
                min_hz: 30.0,
                max_hz: 300.0,
            },
            false,
        );
        let notes = tracker.track(&spec).unwrap();

        // Whatever leaks through windowing sidelobes must stay in range
        for note in &notes {
            assert!(
                note.frequency >= 30.0 - 11.0 && note.frequency <= 300.0 + 11.0,
                "Tracked frequency {:.1} Hz outside the configured range",
                note.frequency
            );
        }
    }

    #[test]
    fn test_track_median_floor_rejects_quiet_frames() {
        // Loud A4 for 1s, quiet E4 for 1s: the floor keeps the loud tone
        let sample_rate = 22050.0;
        let mut samples = sine(440.0, 1.0, sample_rate, 0.8);
        samples.extend(sine(330.0, 1.0, sample_rate, 0.1));

        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let tracker = PitchTracker::new(
            PitchRange {
                min_hz: 200.0,
                max_hz: 2000.0,
            },
            true,
        );
        let notes = tracker.track(&spec).unwrap();

        assert!(!notes.is_empty());
        let a4 = notes.iter().filter(|n| n.midi == 69).count();
        let e4 = notes.iter().filter(|n| n.midi == 64).count();
        assert!(
            a4 > e4,
            "Median floor should favor the loud tone: a4={}, e4={}",
            a4,
            e4
        );
    }

    #[test]
    fn test_track_invalid_range() {
        let spec = stft(&vec![0.5f32; 4096], 22050, 2048, 512).unwrap();
        let tracker = PitchTracker::new(
            PitchRange {
                min_hz: 300.0,
                max_hz: 30.0,
            },
            false,
        );
        assert!(tracker.track(&spec).is_err());
    }

    #[test]
    fn test_track_times_non_decreasing() {
        let samples = sine(110.0, 2.0, 22050.0, 0.5);
        let spec = stft(&samples, 22050, 2048, 512).unwrap();
        let tracker = PitchTracker::new(
            PitchRange {
                min_hz: 30.0,
                max_hz: 300.0,
            },
            false,
        );
        let notes = tracker.track(&spec).unwrap();
        for pair in notes.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }
}
