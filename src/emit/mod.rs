//! Strudel code emission
//!
//! Renders the analysis results into a pattern program. Emission is a pure
//! function of its inputs: no signal analysis happens here, and the same
//! inputs always produce byte-identical output.

use crate::features::key::KeyEstimate;
use crate::features::tempo::TempoEstimate;
use crate::pattern::DrumPatternSet;
use crate::quantize::QuantizedNote;

/// Quantized bass notes considered for the bass stanza
const BASS_NOTE_POOL: usize = 32;

/// Quantized melody notes considered for the melody stanza
const MELODY_NOTE_POOL: usize = 64;

/// Unique notes emitted in the bass pattern
const BASS_PATTERN_NOTES: usize = 4;

/// Unique notes emitted in the melody pattern
const MELODY_PATTERN_NOTES: usize = 8;

/// Notes taken from the two-bar window before deduplication
const WINDOW_NOTES: usize = 8;

/// Hihat slot counts that switch to the repeating shorthands
const HIHAT_DENSE_SLOTS: usize = 12;
const HIHAT_MEDIUM_SLOTS: usize = 8;

/// Synth parameter chains per voice
const KICK_CHAIN: &str = "s(\"square\").decay(0.08).lpf(150).gain(0.9)";
const SNARE_CHAIN: &str = "s(\"square\").hpf(400).decay(0.06).gain(0.7)";
const HIHAT_CHAIN: &str = "s(\"pink\").hpf(8000).decay(0.02).gain(0.4)";
const BASS_CHAIN: &str = "s(\"sawtooth\").lpf(400).decay(0.2).sustain(0.3).gain(0.6)";
const MELODY_CHAIN: &str = "s(\"triangle\").decay(0.3).sustain(0.4).delay(0.2).gain(0.5)";

/// Steady four-on-the-floor kick used when no band produced a hit
const FALLBACK_DRUMS: &str = "note(\"c2*4\").s(\"square\").decay(0.08).lpf(150)";

/// Render the complete pattern program
///
/// Stanzas are separated by blank lines, in order: header comments, the
/// tempo statement, drums (when the drum stage is present), bass, melody.
/// The bass and melody stanzas are omitted entirely when their note
/// sources are empty.
///
/// # Arguments
///
/// * `tempo` - Tempo estimate (bpm > 0)
/// * `key` - Key estimate for the header
/// * `drums` - Folded drum patterns; `None` when the drum stage is absent
/// * `bass` - Quantized bass notes (empty = omit stanza)
/// * `melody` - Quantized melody notes (empty = omit stanza)
/// * `duration` - Signal duration in seconds, for the header
pub fn emit_program(
    tempo: &TempoEstimate,
    key: KeyEstimate,
    drums: Option<&DrumPatternSet>,
    bass: &[QuantizedNote],
    melody: &[QuantizedNote],
    duration: f32,
) -> String {
    let mut stanzas: Vec<String> = Vec::new();

    stanzas.push(emit_header(key, tempo.bpm, duration));
    stanzas.push(format!("setcpm({:.0})", tempo.bpm));

    if let Some(patterns) = drums {
        stanzas.push(emit_drums(patterns));
    }

    let bar_duration = 4.0 * (60.0 / tempo.bpm);

    if let Some(stanza) = emit_melodic_stanza(
        "// Bass",
        bass,
        BASS_NOTE_POOL,
        BASS_PATTERN_NOTES,
        bar_duration,
        BASS_CHAIN,
    ) {
        stanzas.push(stanza);
    }

    if let Some(stanza) = emit_melodic_stanza(
        "// Melody",
        melody,
        MELODY_NOTE_POOL,
        MELODY_PATTERN_NOTES,
        bar_duration,
        MELODY_CHAIN,
    ) {
        stanzas.push(stanza);
    }

    stanzas.join("\n\n")
}

fn emit_header(key: KeyEstimate, bpm: f32, duration: f32) -> String {
    format!(
        "// Generated from audio analysis\n// Key: {} {}\n// BPM: {:.0}\n// Duration: {:.1}s",
        key.root_name(),
        key.mode_name(),
        bpm,
        duration
    )
}

fn emit_drums(patterns: &DrumPatternSet) -> String {
    let mut parts: Vec<String> = Vec::new();

    let kick_tokens = patterns.kick.to_beat_tokens();
    if kick_tokens.contains('x') {
        parts.push(format!(
            "note(\"c2\").struct(\"{}\").{}",
            kick_tokens, KICK_CHAIN
        ));
    }

    let snare_tokens = patterns.snare.to_beat_tokens();
    if snare_tokens.contains('x') {
        parts.push(format!(
            "note(\"c3\").struct(\"{}\").{}",
            snare_tokens, SNARE_CHAIN
        ));
    }

    // Dense hihats collapse to a repeating shorthand instead of a literal
    // pattern; the slot-count cutoffs come before token rendering
    let hihat_slots = patterns.hihat.hit_count();
    if hihat_slots >= HIHAT_DENSE_SLOTS {
        parts.push(format!("note(\"c6*8\").{}", HIHAT_CHAIN));
    } else if hihat_slots >= HIHAT_MEDIUM_SLOTS {
        parts.push(format!("note(\"c6*4\").{}", HIHAT_CHAIN));
    } else {
        let hihat_tokens = patterns.hihat.to_beat_tokens();
        if hihat_tokens.contains('x') {
            parts.push(format!(
                "note(\"c6\").struct(\"{}\").{}",
                hihat_tokens, HIHAT_CHAIN
            ));
        }
    }

    if parts.is_empty() {
        log::debug!("No band produced a hit token, emitting fallback kick");
        format!("// Drums\n{}", FALLBACK_DRUMS)
    } else {
        format!("// Drums\nstack({})", parts.join(", "))
    }
}

fn emit_melodic_stanza(
    label: &str,
    notes: &[QuantizedNote],
    pool_cap: usize,
    pattern_cap: usize,
    bar_duration: f32,
    chain: &str,
) -> Option<String> {
    let pool = &notes[..notes.len().min(pool_cap)];
    if pool.is_empty() {
        return None;
    }

    // Prefer notes from the first two bars; an empty window falls back to
    // the first few notes wherever they sit
    let window: Vec<&QuantizedNote> = pool
        .iter()
        .filter(|n| n.grid_time < 2.0 * bar_duration)
        .collect();
    let window: Vec<&QuantizedNote> = if window.is_empty() {
        pool.iter().take(WINDOW_NOTES).collect()
    } else {
        window
    };

    let mut unique: Vec<&str> = Vec::new();
    for note in window.iter().take(WINDOW_NOTES) {
        if unique.last() != Some(&note.name.as_str()) {
            unique.push(note.name.as_str());
        }
    }
    unique.truncate(pattern_cap);

    if unique.is_empty() {
        return None;
    }

    Some(format!(
        "{}\nnote(\"{}\").{}",
        label,
        unique.join(" "),
        chain
    ))
}
