//! Event quantization
//!
//! Snaps pitched notes to a fixed time grid and collapses runs of
//! identical notes. Quantization is idempotent: grid times are exact
//! multiples of the resolution, so re-quantizing changes nothing.

use crate::error::TranscribeError;
use crate::features::key::NOTE_NAMES;
use crate::features::pitch::PitchedNote;
use serde::{Deserialize, Serialize};

/// A note snapped to the quantization grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedNote {
    /// Grid-aligned time in seconds (multiple of the resolution)
    pub grid_time: f32,

    /// MIDI note number
    pub midi: i32,

    /// Note name with octave, lowercase (e.g. "c2", "eb3")
    pub name: String,
}

/// Convert a MIDI note number to its lowercase name with octave
///
/// Octave numbering follows the MIDI convention where middle C (60) is C4.
pub fn midi_note_name(midi: i32) -> String {
    let octave = midi.div_euclid(12) - 1;
    let idx = midi.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[idx].to_lowercase(), octave)
}

/// Quantize notes to the grid and collapse consecutive duplicates
///
/// Each note's time snaps to the nearest multiple of `resolution`; a note
/// is emitted only when its `(grid_time, midi)` pair differs from the
/// previously emitted one, so runs of identical observations collapse to
/// one representative.
///
/// # Arguments
///
/// * `notes` - Time-ordered pitched notes
/// * `resolution` - Grid resolution in seconds (shared across extractors)
///
/// # Returns
///
/// Time-ordered quantized notes. Empty input yields empty output.
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` if `resolution` is not a
/// positive finite number.
pub fn quantize_notes(
    notes: &[PitchedNote],
    resolution: f32,
) -> Result<Vec<QuantizedNote>, TranscribeError> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(TranscribeError::InvalidInput(format!(
            "Quantization resolution must be positive, got {}",
            resolution
        )));
    }

    let mut quantized: Vec<QuantizedNote> = Vec::new();

    for note in notes {
        let grid_time = (note.time / resolution).round() * resolution;

        let is_duplicate = quantized
            .last()
            .map(|last| last.grid_time == grid_time && last.midi == note.midi)
            .unwrap_or(false);

        if !is_duplicate {
            quantized.push(QuantizedNote {
                grid_time,
                midi: note.midi,
                name: midi_note_name(note.midi),
            });
        }
    }

    log::debug!(
        "Quantized {} notes down to {} at {:.3}s resolution",
        notes.len(),
        quantized.len(),
        resolution
    );

    Ok(quantized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(time: f32, midi: i32) -> PitchedNote {
        PitchedNote {
            time,
            midi,
            frequency: 440.0 * 2.0f32.powf((midi - 69) as f32 / 12.0),
        }
    }

    #[test]
    fn test_quantize_dedup_collapses_runs() {
        // Runs of identical notes at matching grid times collapse
        let notes = vec![
            note(0.00, 60),
            note(0.01, 60),
            note(0.26, 62),
            note(0.27, 62),
            note(0.50, 64),
        ];
        let quantized = quantize_notes(&notes, 0.125).unwrap();
        let midis: Vec<i32> = quantized.iter().map(|n| n.midi).collect();
        assert_eq!(midis, vec![60, 62, 64]);
    }

    #[test]
    fn test_quantize_snaps_to_grid() {
        let notes = vec![note(0.30, 60)];
        let quantized = quantize_notes(&notes, 0.125).unwrap();
        assert_eq!(quantized.len(), 1);
        // 0.30 / 0.125 = 2.4 -> rounds to 2 -> 0.25
        assert!((quantized[0].grid_time - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_quantize_idempotent() {
        let notes = vec![
            note(0.03, 60),
            note(0.22, 62),
            note(0.74, 64),
            note(1.13, 60),
        ];
        let once = quantize_notes(&notes, 0.125).unwrap();

        let as_pitched: Vec<PitchedNote> = once
            .iter()
            .map(|q| note(q.grid_time, q.midi))
            .collect();
        let twice = quantize_notes(&as_pitched, 0.125).unwrap();

        assert_eq!(once, twice, "Re-quantizing a quantized sequence must be a no-op");
    }

    #[test]
    fn test_quantize_same_pitch_different_slots_kept() {
        let notes = vec![note(0.0, 60), note(0.5, 60)];
        let quantized = quantize_notes(&notes, 0.125).unwrap();
        assert_eq!(quantized.len(), 2, "Same pitch on different grid slots is not a duplicate");
    }

    #[test]
    fn test_quantize_empty() {
        assert!(quantize_notes(&[], 0.125).unwrap().is_empty());
    }

    #[test]
    fn test_quantize_invalid_resolution() {
        let notes = vec![note(0.0, 60)];
        assert!(quantize_notes(&notes, 0.0).is_err());
        assert!(quantize_notes(&notes, -0.5).is_err());
        assert!(quantize_notes(&notes, f32::NAN).is_err());
    }

    #[test]
    fn test_midi_note_name() {
        assert_eq!(midi_note_name(60), "c4");
        assert_eq!(midi_note_name(36), "c2");
        assert_eq!(midi_note_name(69), "a4");
        assert_eq!(midi_note_name(63), "eb4");
        assert_eq!(midi_note_name(34), "bb1");
    }
}
