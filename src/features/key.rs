//! Key estimation
//!
//! Picks the root as the strongest chroma bin and decides major vs minor by
//! comparing the third above it. Deliberately simplistic: the point is a
//! stable, reproducible label for the emitted header, not music-theoretic
//! accuracy.

use serde::{Deserialize, Serialize};

/// The 12 pitch-class names, flat-spelled, index 0 = C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Estimated musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEstimate {
    /// Major key (0 = C, 1 = Db, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = Db, ..., 11 = B)
    Minor(u32),
}

impl KeyEstimate {
    /// Root pitch-class name (e.g. "C", "Eb")
    pub fn root_name(&self) -> &'static str {
        match self {
            KeyEstimate::Major(i) | KeyEstimate::Minor(i) => NOTE_NAMES[*i as usize % 12],
        }
    }

    /// Mode name as emitted in headers: "major" or "minor"
    pub fn mode_name(&self) -> &'static str {
        match self {
            KeyEstimate::Major(_) => "major",
            KeyEstimate::Minor(_) => "minor",
        }
    }
}

/// Estimate the key from a 12-bin chroma profile
///
/// Root = argmax bin (the first bin wins ties, so the all-zero degenerate
/// profile resolves to C; that behavior is load-bearing for reproducibility
/// and must not be "corrected"). Mode = minor iff the bin a minor third
/// above the root is strictly stronger than the bin a major third above;
/// ties resolve to major.
///
/// # Arguments
///
/// * `profile` - Averaged 12-bin chroma profile, index 0 = C
///
/// # Returns
///
/// The estimated key. Never fails: degenerate profiles fall back to C major.
pub fn estimate_key(profile: &[f32; 12]) -> KeyEstimate {
    let mut root = 0usize;
    for (i, &v) in profile.iter().enumerate() {
        if v > profile[root] {
            root = i;
        }
    }

    let major_third = profile[(root + 4) % 12];
    let minor_third = profile[(root + 3) % 12];

    let key = if minor_third > major_third {
        KeyEstimate::Minor(root as u32)
    } else {
        KeyEstimate::Major(root as u32)
    };

    log::debug!(
        "Estimated key: {} {} (root bin {:.4}, m3 {:.4}, M3 {:.4})",
        key.root_name(),
        key.mode_name(),
        profile[root],
        minor_third,
        major_third
    );

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_key_major() {
        // C root with a strong major third (E)
        let mut profile = [0.1f32; 12];
        profile[0] = 1.0;
        profile[4] = 0.8;
        profile[3] = 0.2;
        let key = estimate_key(&profile);
        assert_eq!(key, KeyEstimate::Major(0));
        assert_eq!(key.root_name(), "C");
        assert_eq!(key.mode_name(), "major");
    }

    #[test]
    fn test_estimate_key_minor() {
        // A root with a strong minor third (C)
        let mut profile = [0.1f32; 12];
        profile[9] = 1.0;
        profile[0] = 0.8; // (9 + 3) % 12 = 0
        profile[1] = 0.2; // (9 + 4) % 12 = 1
        let key = estimate_key(&profile);
        assert_eq!(key, KeyEstimate::Minor(9));
        assert_eq!(key.root_name(), "A");
        assert_eq!(key.mode_name(), "minor");
    }

    #[test]
    fn test_estimate_key_third_tie_is_major() {
        let mut profile = [0.0f32; 12];
        profile[7] = 1.0;
        // Both thirds equal
        profile[10] = 0.5;
        profile[11] = 0.5;
        assert_eq!(estimate_key(&profile), KeyEstimate::Major(7));
    }

    #[test]
    fn test_estimate_key_degenerate_profile_is_c() {
        let profile = [0.0f32; 12];
        let key = estimate_key(&profile);
        assert_eq!(key, KeyEstimate::Major(0), "All-zero profile must resolve to C major");
    }

    #[test]
    fn test_root_name_alphabet() {
        for i in 0..12u32 {
            let name = KeyEstimate::Major(i).root_name();
            assert!(NOTE_NAMES.contains(&name));
        }
    }
}
