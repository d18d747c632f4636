//! Bar pattern simplification
//!
//! Folds multi-bar onset observations into a single 16-slot bar pattern by
//! majority vote across the observed bars, then groups the slots into
//! beat-level tokens for emission. The majority vote is the pipeline's key
//! noise-robustness mechanism: a hit must recur across bars to survive.

use crate::features::onset::{DrumBand, DrumOnsets};
use serde::{Deserialize, Serialize};

/// Slots per bar (16th-note grid in 4/4)
pub const STEPS_PER_BAR: usize = 16;

/// Slots per beat
pub const STEPS_PER_BEAT: usize = 4;

/// Beats per bar
pub const BEATS_PER_BAR: usize = 4;

/// Maximum number of bars folded into one pattern
pub const MAX_PATTERN_BARS: usize = 4;

/// One bar of 16 boolean hit slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarPattern {
    slots: [bool; STEPS_PER_BAR],
}

impl BarPattern {
    /// The all-rest pattern
    pub fn empty() -> Self {
        Self {
            slots: [false; STEPS_PER_BAR],
        }
    }

    /// Fold hit times into a majority-voted bar pattern
    ///
    /// Bar duration is `4 * (60 / bpm)`; `N = min(4, floor(duration /
    /// bar))` bars are observed. Each hit inside the observation window
    /// lands on slot `round(position_in_bar / (bar / 16)) mod 16` of its
    /// bar; a slot is marked hit iff at least `ceil(N / 2)` **distinct
    /// bars** contributed a hit there (clamped to at least 1).
    ///
    /// # Arguments
    ///
    /// * `hit_times` - Hit timestamps in seconds, any order
    /// * `bpm` - Tempo, must be > 0
    /// * `duration` - Signal duration in seconds
    ///
    /// # Returns
    ///
    /// The folded pattern. When not even one full bar was observed
    /// (`N = 0`) the pattern is all rests — degenerate, not an error.
    pub fn from_hit_times(hit_times: &[f32], bpm: f32, duration: f32) -> Self {
        if bpm <= 0.0 {
            log::warn!("Non-positive BPM {} in pattern folding, returning rests", bpm);
            return Self::empty();
        }

        let bar_duration = 4.0 * (60.0 / bpm);
        let num_bars = ((duration / bar_duration).floor() as usize).min(MAX_PATTERN_BARS);

        if num_bars == 0 {
            log::debug!(
                "Signal shorter than one bar ({:.2}s < {:.2}s), pattern is all rests",
                duration,
                bar_duration
            );
            return Self::empty();
        }

        let step_duration = bar_duration / STEPS_PER_BAR as f32;

        // Distinct-bar contributions per slot
        let mut bar_hits = vec![[false; STEPS_PER_BAR]; num_bars];

        for &t in hit_times {
            if t < 0.0 || t >= num_bars as f32 * bar_duration {
                continue;
            }
            let bar_idx = (t / bar_duration).floor() as usize;
            if bar_idx >= num_bars {
                continue;
            }
            let position_in_bar = t - bar_idx as f32 * bar_duration;
            let slot =
                (position_in_bar / step_duration).round() as usize % STEPS_PER_BAR;
            bar_hits[bar_idx][slot] = true;
        }

        let threshold = ((num_bars + 1) / 2).max(1);

        let mut slots = [false; STEPS_PER_BAR];
        for (slot, flag) in slots.iter_mut().enumerate() {
            let count = bar_hits.iter().filter(|bar| bar[slot]).count();
            *flag = count >= threshold;
        }

        Self { slots }
    }

    /// Slot flags
    pub fn slots(&self) -> &[bool; STEPS_PER_BAR] {
        &self.slots
    }

    /// Number of hit slots
    pub fn hit_count(&self) -> usize {
        self.slots.iter().filter(|&&s| s).count()
    }

    /// True when no slot is hit
    pub fn is_empty(&self) -> bool {
        self.hit_count() == 0
    }

    /// Render the pattern as 4 beat-grouped tokens
    ///
    /// Each beat of 4 slots becomes one token: `~` for no hits, `x` for a
    /// single hit, a bracketed group (`[x x]`) for several. Hit
    /// subdivisions all render identically regardless of their position
    /// within the beat.
    pub fn to_beat_tokens(&self) -> String {
        let mut tokens = Vec::with_capacity(BEATS_PER_BAR);

        for beat in 0..BEATS_PER_BAR {
            let hits = self.slots[beat * STEPS_PER_BEAT..(beat + 1) * STEPS_PER_BEAT]
                .iter()
                .filter(|&&s| s)
                .count();

            let token = match hits {
                0 => "~".to_string(),
                1 => "x".to_string(),
                n => format!("[{}]", vec!["x"; n].join(" ")),
            };
            tokens.push(token);
        }

        tokens.join(" ")
    }
}

#[cfg(test)]
pub(crate) fn pattern_from_slots(flags: [bool; STEPS_PER_BAR]) -> BarPattern {
    BarPattern { slots: flags }
}

/// Majority-voted patterns for all three drum bands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrumPatternSet {
    /// Kick pattern
    pub kick: BarPattern,

    /// Snare pattern
    pub snare: BarPattern,

    /// Hihat pattern
    pub hihat: BarPattern,
}

impl DrumPatternSet {
    /// Fold detected onsets into per-band patterns
    pub fn from_onsets(onsets: &DrumOnsets, bpm: f32, duration: f32) -> Self {
        let fold = |band: DrumBand| {
            let times: Vec<f32> = onsets.band(band).iter().map(|e| e.time).collect();
            BarPattern::from_hit_times(&times, bpm, duration)
        };

        let set = Self {
            kick: fold(DrumBand::Kick),
            snare: fold(DrumBand::Snare),
            hihat: fold(DrumBand::Hihat),
        };

        log::debug!(
            "Folded patterns - kick: {}/16, snare: {}/16, hihat: {}/16",
            set.kick.hit_count(),
            set.snare.hit_count(),
            set.hihat.hit_count()
        );

        set
    }

    /// True when at least one band has at least one hit slot
    pub fn has_any_hit(&self) -> bool {
        !self.kick.is_empty() || !self.snare.is_empty() || !self.hihat.is_empty()
    }
}
