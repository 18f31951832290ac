//! The user-facing note vocabulary and its resolution rules.
//!
//! Authoring code describes music with short specs: note names and
//! pentatonic numbers for tones, code letters and literal seconds for
//! durations. A malformed spec never aborts authoring; it recovers to a
//! musical default (or is carried unresolved) and the problem is reported
//! as a [`ResolveWarning`] so beginner mistakes stay visible without
//! crashing a performance.

pub mod duration;
pub mod tone;

use std::fmt;

pub use duration::{DurationSpec, Tempo};
pub use tone::{OctaveShift, PitchClass, PitchKey, Tone, ToneSpec};

/// Outcome of resolving a spec: the best-effort value plus anything worth
/// telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub warnings: Vec<ResolveWarning>,
}

impl<T> Resolved<T> {
    pub(crate) fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warning(value: T, warning: ResolveWarning) -> Self {
        Self {
            value,
            warnings: vec![warning],
        }
    }
}

/// A recovered problem in a tone or duration spec.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveWarning {
    /// The code named no known note length; a quarter note was substituted.
    UnknownDurationCode(String),
    /// A character after the code letter meant nothing and was skipped.
    IgnoredDurationModifier(char),
    /// A literal length that was negative or not finite; a quarter note was
    /// substituted.
    UnplayableSeconds(f64),
    /// The spelling named no pitch; carried unresolved so scheduling can
    /// report exactly what was written.
    UnknownTone(String),
    /// A pentatonic number outside the pool's range; carried unresolved.
    PentatonicOutOfRange(i32),
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::UnknownDurationCode(code) => {
                write!(f, "unknown duration code {code:?}, playing a quarter note")
            }
            ResolveWarning::IgnoredDurationModifier(c) => {
                write!(f, "ignoring unknown duration modifier {c:?}")
            }
            ResolveWarning::UnplayableSeconds(seconds) => {
                write!(f, "cannot play a {seconds} second note, playing a quarter note")
            }
            ResolveWarning::UnknownTone(name) => {
                write!(f, "unknown tone {name:?}")
            }
            ResolveWarning::PentatonicOutOfRange(number) => {
                write!(f, "pentatonic number {number} is outside -10..=14")
            }
        }
    }
}

impl std::error::Error for ResolveWarning {}
