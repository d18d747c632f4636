//! Transcription result types

use serde::{Deserialize, Serialize};

use crate::features::key::KeyEstimate;
use crate::features::onset::DrumOnsets;
use crate::features::tempo::TempoEstimate;
use crate::pattern::DrumPatternSet;
use crate::quantize::QuantizedNote;

/// Drum stage output: detected hits plus their folded bar patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrumAnalysis {
    /// Per-band detected hits
    pub onsets: DrumOnsets,

    /// Majority-voted bar patterns
    pub patterns: DrumPatternSet,
}

/// Complete transcription result
///
/// Tempo and key are always present (both have documented fallbacks);
/// the drum, bass, and melody layers are explicit options — `None` means
/// the stage produced nothing usable and the emitter applied its
/// documented substitution or omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Tempo estimate
    pub tempo: TempoEstimate,

    /// Key estimate
    pub key: KeyEstimate,

    /// Drum stage result
    pub drums: Option<DrumAnalysis>,

    /// Quantized bass notes, `None` when no bass frames survived
    pub bass: Option<Vec<QuantizedNote>>,

    /// Quantized melody notes, `None` when no melody frames survived
    pub melody: Option<Vec<QuantizedNote>>,

    /// Emitted Strudel program
    pub code: String,

    /// Run metadata
    pub metadata: TranscriptionMetadata,
}

/// Transcription metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,
}
