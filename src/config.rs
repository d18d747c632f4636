//! Configuration parameters for audio transcription
//!
//! Every threshold the pipeline relies on (band ranges, percentile cutoffs,
//! grid resolution, BPM search range) lives here so detectors can be
//! constructed with tuned values in isolation.

use crate::features::onset::BandConfig;
use crate::features::pitch::PitchRange;

/// Transcription configuration parameters
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    // STFT parameters
    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    // Tempo estimation
    /// Minimum BPM to consider (default: 60.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 180.0)
    pub max_bpm: f32,

    /// BPM used when the tempogram yields no candidate at all (default: 120.0)
    /// This is a documented fallback, not an error condition.
    pub fallback_bpm: f32,

    // Harmonic/percussive separation
    /// Median filter kernel length for HPSS, in frames/bins (default: 31)
    pub hpss_kernel: usize,

    // Percussive onset detection
    /// Kick band: 60-150 Hz, 80th percentile threshold
    pub kick_band: BandConfig,

    /// Snare band: 150-400 Hz, 80th percentile threshold
    pub snare_band: BandConfig,

    /// Hihat band: 5000-15000 Hz, 70th percentile threshold
    /// The lower percentile trades precision for recall; hihats are quiet.
    pub hihat_band: BandConfig,

    // Pitch tracking
    /// Bass pitch search range (default: 30-300 Hz)
    pub bass_range: PitchRange,

    /// Melody pitch search range (default: 200-2000 Hz)
    pub melody_range: PitchRange,

    // Quantization
    /// Time grid resolution in seconds, shared by all note extractors so
    /// bass/melody/drum grids are comparable (default: 0.125)
    ///
    /// 0.125 is exactly representable in binary floating point, which is
    /// what makes re-quantizing an already-quantized sequence a no-op.
    pub grid_resolution: f32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_bpm: 60.0,
            max_bpm: 180.0,
            fallback_bpm: 120.0,
            hpss_kernel: 31,
            kick_band: BandConfig {
                low_hz: 60.0,
                high_hz: 150.0,
                threshold_percentile: 0.80,
            },
            snare_band: BandConfig {
                low_hz: 150.0,
                high_hz: 400.0,
                threshold_percentile: 0.80,
            },
            hihat_band: BandConfig {
                low_hz: 5000.0,
                high_hz: 15000.0,
                threshold_percentile: 0.70,
            },
            bass_range: PitchRange {
                min_hz: 30.0,
                max_hz: 300.0,
            },
            melody_range: PitchRange {
                min_hz: 200.0,
                max_hz: 2000.0,
            },
            grid_resolution: 0.125,
        }
    }
}
