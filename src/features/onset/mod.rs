//! Percussive onset detection
//!
//! Detects kick/snare/hihat hits from the percussive spectrogram:
//! - Per-band mean magnitude curves
//! - Percentile-derived thresholds with peak picking
//! - Spectral-flux onset envelope (diagnostic)
//!
//! Bands are processed independently; there is no cross-band suppression.

pub mod band_energy;
pub mod peak_picking;

pub use band_energy::band_energy_curve;
pub use peak_picking::{percentile_threshold, pick_peaks, PeakPickParams};

use crate::config::TranscriptionConfig;
use crate::error::TranscribeError;
use crate::spectral::{spectral_flux, Spectrogram};
use serde::{Deserialize, Serialize};

/// Percussive instrument band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrumBand {
    /// Low band, 60-150 Hz
    Kick,
    /// Mid band, 150-400 Hz
    Snare,
    /// High band, 5000-15000 Hz
    Hihat,
}

impl DrumBand {
    /// All bands, in emission order
    pub const ALL: [DrumBand; 3] = [DrumBand::Kick, DrumBand::Snare, DrumBand::Hihat];

    /// Band name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DrumBand::Kick => "kick",
            DrumBand::Snare => "snare",
            DrumBand::Hihat => "hihat",
        }
    }
}

/// Frequency band with its detection threshold
#[derive(Debug, Clone)]
pub struct BandConfig {
    /// Lower band edge in Hz (inclusive)
    pub low_hz: f32,

    /// Upper band edge in Hz (inclusive)
    pub high_hz: f32,

    /// Percentile in [0.0, 1.0] used to derive the peak-picking delta
    pub threshold_percentile: f32,
}

/// A detected percussive hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnsetEvent {
    /// Hit time in seconds
    pub time: f32,

    /// Instrument band the hit belongs to
    pub band: DrumBand,
}

/// Detected hits for all three bands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrumOnsets {
    /// Kick hits, time-ordered
    pub kick: Vec<OnsetEvent>,

    /// Snare hits, time-ordered
    pub snare: Vec<OnsetEvent>,

    /// Hihat hits, time-ordered
    pub hihat: Vec<OnsetEvent>,

    /// Spectral-flux onset envelope over the percussive component,
    /// normalized to [0, 1]; kept for diagnostics
    pub onset_envelope: Vec<f32>,
}

impl DrumOnsets {
    /// Hits for one band
    pub fn band(&self, band: DrumBand) -> &[OnsetEvent] {
        match band {
            DrumBand::Kick => &self.kick,
            DrumBand::Snare => &self.snare,
            DrumBand::Hihat => &self.hihat,
        }
    }

    /// Total hits across all bands
    pub fn total_hits(&self) -> usize {
        self.kick.len() + self.snare.len() + self.hihat.len()
    }
}

/// Percussive onset detector over three configured bands
#[derive(Debug, Clone)]
pub struct PercussiveOnsetDetector {
    kick: BandConfig,
    snare: BandConfig,
    hihat: BandConfig,
    params: PeakPickParams,
}

impl PercussiveOnsetDetector {
    /// Build a detector from the pipeline configuration
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self {
            kick: config.kick_band.clone(),
            snare: config.snare_band.clone(),
            hihat: config.hihat_band.clone(),
            params: PeakPickParams::default(),
        }
    }

    /// Detect hits in all bands over the percussive spectrogram
    ///
    /// Zero hits in every band is degenerate analysis, not an error; the
    /// pattern stage renders all-rest patterns and the emitter substitutes
    /// its documented fallback.
    ///
    /// # Arguments
    ///
    /// * `percussive` - Percussive-component magnitude spectrogram
    ///
    /// # Errors
    ///
    /// Returns `TranscribeError::InvalidInput` if a band range or
    /// percentile is malformed.
    pub fn detect(&self, percussive: &Spectrogram) -> Result<DrumOnsets, TranscribeError> {
        let onset_envelope = spectral_flux(percussive);

        let kick = self.detect_band(percussive, &self.kick, DrumBand::Kick)?;
        let snare = self.detect_band(percussive, &self.snare, DrumBand::Snare)?;
        let hihat = self.detect_band(percussive, &self.hihat, DrumBand::Hihat)?;

        log::debug!(
            "Detected drums - kick: {}, snare: {}, hihat: {}",
            kick.len(),
            snare.len(),
            hihat.len()
        );

        Ok(DrumOnsets {
            kick,
            snare,
            hihat,
            onset_envelope,
        })
    }

    fn detect_band(
        &self,
        spec: &Spectrogram,
        band_config: &BandConfig,
        band: DrumBand,
    ) -> Result<Vec<OnsetEvent>, TranscribeError> {
        let curve = band_energy_curve(spec, band_config.low_hz, band_config.high_hz)?;

        if curve.is_empty() {
            return Ok(Vec::new());
        }

        let threshold = percentile_threshold(&curve, band_config.threshold_percentile)?;
        let delta = threshold * 0.5;

        let peaks = pick_peaks(&curve, delta, &self.params);

        Ok(peaks
            .into_iter()
            .map(|frame| OnsetEvent {
                time: spec.frame_time(frame),
                band,
            })
            .collect())
    }
}
