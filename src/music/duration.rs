//! Duration codes and tempo math.
//!
//! A duration is authored either as a literal number of seconds or as a
//! code: one letter naming a fraction of a full note, with an optional
//! trailing dot that stretches it by half. The letter-to-seconds conversion
//! runs through the tempo, so the same track plays proportionally at any
//! BPM chosen at init.

use crate::music::{Resolved, ResolveWarning};

/// Playback tempo in beats (quarter notes) per minute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(pub f64);

impl Tempo {
    /// Seconds spanned by a full note: four beats.
    pub fn full_note_seconds(self) -> f64 {
        (60.0 / self.0) * 4.0
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo(108.0)
    }
}

/// How long a note lasts, as authored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationSpec {
    /// A code resolved against the tempo: `"q"`, `"e."`, `"f"`.
    Code(String),
    /// A literal length used as-is.
    Seconds(f64),
}

impl From<&str> for DurationSpec {
    fn from(code: &str) -> Self {
        DurationSpec::Code(code.to_string())
    }
}

impl From<String> for DurationSpec {
    fn from(code: String) -> Self {
        DurationSpec::Code(code)
    }
}

impl From<f64> for DurationSpec {
    fn from(seconds: f64) -> Self {
        DurationSpec::Seconds(seconds)
    }
}

/// Fraction of a full note named by each code letter.
fn code_fraction(letter: char) -> Option<f64> {
    match letter {
        't' => Some(1.0 / 32.0),
        's' => Some(1.0 / 16.0),
        'e' => Some(1.0 / 8.0),
        'q' => Some(1.0 / 4.0),
        'h' => Some(1.0 / 2.0),
        'f' => Some(1.0),
        _ => None,
    }
}

/// Substituted whenever a spec cannot be honored.
const FALLBACK_FRACTION: f64 = 1.0 / 4.0;

/// A trailing dot stretches the note by half again.
const DOT_FACTOR: f64 = 1.5;

impl DurationSpec {
    /// Resolve to seconds at the given tempo. Never fails; see the module
    /// docs for the recovery rules.
    pub fn resolve(&self, tempo: Tempo) -> Resolved<f64> {
        match self {
            DurationSpec::Seconds(seconds) => resolve_seconds(*seconds, tempo),
            DurationSpec::Code(code) => resolve_code(code, tempo),
        }
    }
}

fn resolve_seconds(seconds: f64, tempo: Tempo) -> Resolved<f64> {
    if seconds.is_finite() && seconds >= 0.0 {
        Resolved::clean(seconds)
    } else {
        Resolved::with_warning(
            FALLBACK_FRACTION * tempo.full_note_seconds(),
            ResolveWarning::UnplayableSeconds(seconds),
        )
    }
}

fn resolve_code(code: &str, tempo: Tempo) -> Resolved<f64> {
    let mut warnings = Vec::new();
    let mut chars = code.chars();

    let fraction = match chars.next().and_then(code_fraction) {
        Some(fraction) => fraction,
        None => {
            warnings.push(ResolveWarning::UnknownDurationCode(code.to_string()));
            FALLBACK_FRACTION
        }
    };

    let mut seconds = fraction * tempo.full_note_seconds();

    // Modifiers still apply after a fallback, so "x." plays a dotted quarter.
    let mut dotted = false;
    for c in chars {
        if c == '.' && !dotted {
            seconds *= DOT_FACTOR;
            dotted = true;
        } else {
            warnings.push(ResolveWarning::IgnoredDurationModifier(c));
        }
    }

    Resolved { value: seconds, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn seconds_of(spec: &str, bpm: f64) -> f64 {
        DurationSpec::from(spec).resolve(Tempo(bpm)).value
    }

    #[test]
    fn test_code_letters_are_fractions_of_a_full_note() {
        // At 60 BPM a beat is one second, so a full note is four.
        assert!((seconds_of("f", 60.0) - 4.0).abs() < EPSILON);
        assert!((seconds_of("h", 60.0) - 2.0).abs() < EPSILON);
        assert!((seconds_of("q", 60.0) - 1.0).abs() < EPSILON);
        assert!((seconds_of("e", 60.0) - 0.5).abs() < EPSILON);
        assert!((seconds_of("s", 60.0) - 0.25).abs() < EPSILON);
        assert!((seconds_of("t", 60.0) - 0.125).abs() < EPSILON);
    }

    #[test]
    fn test_dot_stretches_by_half() {
        assert!((seconds_of("q.", 60.0) - 1.5).abs() < EPSILON);
        assert!((seconds_of("h.", 60.0) - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_letter_falls_back_to_quarter() {
        let resolved = DurationSpec::from("x").resolve(Tempo(60.0));
        assert!((resolved.value - 1.0).abs() < EPSILON);
        assert_eq!(
            resolved.warnings,
            vec![ResolveWarning::UnknownDurationCode("x".to_string())]
        );
    }

    #[test]
    fn test_unknown_modifier_is_skipped_with_warning() {
        let resolved = DurationSpec::from("q!").resolve(Tempo(60.0));
        assert!((resolved.value - 1.0).abs() < EPSILON);
        assert_eq!(
            resolved.warnings,
            vec![ResolveWarning::IgnoredDurationModifier('!')]
        );
    }

    #[test]
    fn test_only_the_first_dot_counts() {
        let resolved = DurationSpec::from("q..").resolve(Tempo(60.0));
        assert!((resolved.value - 1.5).abs() < EPSILON);
        assert_eq!(
            resolved.warnings,
            vec![ResolveWarning::IgnoredDurationModifier('.')]
        );
    }

    #[test]
    fn test_empty_code_falls_back_to_quarter() {
        let resolved = DurationSpec::from("").resolve(Tempo(60.0));
        assert!((resolved.value - 1.0).abs() < EPSILON);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn test_literal_seconds_pass_through() {
        let resolved = DurationSpec::from(0.75).resolve(Tempo(200.0));
        assert_eq!(resolved.value, 0.75);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_unplayable_seconds_recover_to_quarter() {
        let resolved = DurationSpec::from(-1.0).resolve(Tempo(60.0));
        assert!((resolved.value - 1.0).abs() < EPSILON);
        assert_eq!(resolved.warnings, vec![ResolveWarning::UnplayableSeconds(-1.0)]);

        let resolved = DurationSpec::from(f64::NAN).resolve(Tempo(60.0));
        assert!((resolved.value - 1.0).abs() < EPSILON);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn test_reference_tempo_108() {
        // (60 / 108) * 4 = 2.2222 seconds per full note.
        assert!((Tempo(108.0).full_note_seconds() - 2.2222).abs() < 1e-4);
        assert!((seconds_of("q", 108.0) - 0.5556).abs() < 1e-4);
        assert!((seconds_of("h", 108.0) - 1.1111).abs() < 1e-4);
    }
}
