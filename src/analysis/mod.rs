//! Result aggregation
//!
//! Composes the per-stage results into one transcription:
//! - Result types (tempo, key, optional drum/bass/melody layers)
//! - Metadata

pub mod result;

pub use result::{DrumAnalysis, Transcription, TranscriptionMetadata};
