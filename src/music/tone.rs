//! Pitch names, the pentatonic number line, and the generator pool layout.

/* Pool layout
   ===========

   The generator pool is anchored at A 440 rather than C. Twelve semitones
   fill the reference octave:

     index:  0    1    2    3    4    5    6    7    8    9    10   11
     name:   A    A#   B    C    C#   D    D#   E    F    F#   G    G#
     Hz:     440  466  494  523  554  587  622  659  698  740  784  831

   Five octave classes stack that table at 1/4, 1/2, 1, 2, and 4 times the
   reference frequency, selected by the suffix on a note name:

     "A--"  110 Hz      "A-"  220 Hz      "A"  440 Hz
     "A+"   880 Hz      "A++" 1760 Hz

   which makes sixty slots in total, addressed by `octave * 12 + semitone`.

   The pentatonic number line is a second way of naming the same slots.
   The five letters A C D E G tile the integers with five steps per octave
   class, zero landing on the reference A:

     -10 -9 -8 -7 -6 | -5 -4 -3 -2 -1 |  0  1  2  3  4 |  5 ... 14
      A-- C-- D--...  |  A-  C-  D-...  |  A  C  D  E  G |  A+... G++

   Flat spellings have no slots of their own; they normalize one semitone
   down onto the sharp-spelled table before lookup, wrapping the seven
   letter names (Eb -> D#, and at the wrap points Cb -> B, Fb -> E).
*/

use std::fmt;

use crate::music::{Resolved, ResolveWarning};

/// Semitones per octave class.
pub const SEMITONES: usize = 12;

/// Octave classes in the pool.
pub const OCTAVE_CLASSES: usize = 5;

/// Generator slots in one pool.
pub const POOL_SLOTS: usize = SEMITONES * OCTAVE_CLASSES;

/// Reference-octave frequencies in Hz, equal temperament up from A 440.
pub const BASE_FREQUENCIES: [f32; SEMITONES] = [
    440.00, 466.16, 493.88, 523.25, 554.37, 587.33, 622.25, 659.26, 698.46, 739.99, 783.99, 830.61,
];

/// The twelve semitones of the reference octave, in pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl PitchClass {
    pub const ALL: [PitchClass; SEMITONES] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    /// Index into the reference frequency table (A = 0 .. G# = 11).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> PitchClass {
        PitchClass::ALL[index % SEMITONES]
    }

    /// Frequency at the reference octave.
    pub fn base_frequency(self) -> f32 {
        BASE_FREQUENCIES[self.index()]
    }

    /// The natural class named by a letter, if it is one of A..G.
    fn from_letter(letter: char) -> Option<PitchClass> {
        match letter {
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            _ => None,
        }
    }

    /// One semitone up, wrapping past G#.
    fn sharpened(self) -> PitchClass {
        PitchClass::from_index(self.index() + 1)
    }

    /// One semitone down, wrapping below A. This is the flat normalization:
    /// Eb lands on D#, Cb lands on B.
    fn flattened(self) -> PitchClass {
        PitchClass::from_index(self.index() + SEMITONES - 1)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        };
        f.write_str(name)
    }
}

/// Octave class relative to the reference octave, named by the suffix on a
/// tone spec: `--`, `-`, nothing, `+`, `++`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OctaveShift {
    DownTwo,
    DownOne,
    Reference,
    UpOne,
    UpTwo,
}

impl OctaveShift {
    pub const ALL: [OctaveShift; OCTAVE_CLASSES] = [
        OctaveShift::DownTwo,
        OctaveShift::DownOne,
        OctaveShift::Reference,
        OctaveShift::UpOne,
        OctaveShift::UpTwo,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Multiplier applied to the reference-octave frequency.
    pub fn factor(self) -> f32 {
        match self {
            OctaveShift::DownTwo => 0.25,
            OctaveShift::DownOne => 0.5,
            OctaveShift::Reference => 1.0,
            OctaveShift::UpOne => 2.0,
            OctaveShift::UpTwo => 4.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            OctaveShift::DownTwo => "--",
            OctaveShift::DownOne => "-",
            OctaveShift::Reference => "",
            OctaveShift::UpOne => "+",
            OctaveShift::UpTwo => "++",
        }
    }

    fn from_suffix(suffix: &str) -> Option<OctaveShift> {
        match suffix {
            "--" => Some(OctaveShift::DownTwo),
            "-" => Some(OctaveShift::DownOne),
            "" => Some(OctaveShift::Reference),
            "+" => Some(OctaveShift::UpOne),
            "++" => Some(OctaveShift::UpTwo),
            _ => None,
        }
    }
}

/// One of the sixty generator slots: a pitch class in an octave class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchKey {
    pub class: PitchClass,
    pub shift: OctaveShift,
}

/// The pentatonic letters in number-line order.
const PENTATONIC: [PitchClass; 5] = [
    PitchClass::A,
    PitchClass::C,
    PitchClass::D,
    PitchClass::E,
    PitchClass::G,
];

/// Lowest pentatonic number in the pool (A two octaves down).
pub const PENTATONIC_MIN: i32 = -10;

/// Highest pentatonic number in the pool (G two octaves up).
pub const PENTATONIC_MAX: i32 = 14;

impl PitchKey {
    pub fn new(class: PitchClass, shift: OctaveShift) -> Self {
        Self { class, shift }
    }

    /// Stable pool slot: octave-major, twelve per octave class.
    pub fn slot(self) -> usize {
        self.shift.index() * SEMITONES + self.class.index()
    }

    pub fn from_slot(slot: usize) -> PitchKey {
        let slot = slot % POOL_SLOTS;
        PitchKey {
            class: PitchClass::from_index(slot % SEMITONES),
            shift: OctaveShift::ALL[slot / SEMITONES],
        }
    }

    /// Playback frequency in Hz.
    pub fn frequency(self) -> f32 {
        self.class.base_frequency() * self.shift.factor()
    }

    /// Map a pentatonic number onto the pool: five steps per octave class,
    /// zero on the reference A.
    pub fn from_pentatonic(number: i32) -> Option<PitchKey> {
        if !(PENTATONIC_MIN..=PENTATONIC_MAX).contains(&number) {
            return None;
        }
        let offset = (number - PENTATONIC_MIN) as usize;
        Some(PitchKey {
            class: PENTATONIC[offset % PENTATONIC.len()],
            shift: OctaveShift::ALL[offset / PENTATONIC.len()],
        })
    }
}

impl fmt::Display for PitchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.shift.suffix())
    }
}

/// A fully resolved tone: silence, a pool pitch, or a spelling that failed
/// to resolve, kept verbatim so scheduling can report it.
#[derive(Debug, Clone, PartialEq)]
pub enum Tone {
    Rest,
    Pitch(PitchKey),
    Unresolved(String),
}

impl Tone {
    pub fn is_rest(&self) -> bool {
        matches!(self, Tone::Rest)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Rest => f.write_str(REST_MARKER),
            Tone::Pitch(key) => key.fmt(f),
            Tone::Unresolved(spec) => spec.fmt(f),
        }
    }
}

/// The name that stands for silence.
pub const REST_MARKER: &str = "-";

/// A tone as authored: a name string or a pentatonic number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToneSpec {
    Name(String),
    Pentatonic(i32),
}

impl From<&str> for ToneSpec {
    fn from(name: &str) -> Self {
        ToneSpec::Name(name.to_string())
    }
}

impl From<String> for ToneSpec {
    fn from(name: String) -> Self {
        ToneSpec::Name(name)
    }
}

impl From<i32> for ToneSpec {
    fn from(number: i32) -> Self {
        ToneSpec::Pentatonic(number)
    }
}

impl ToneSpec {
    /// Resolve to a [`Tone`]. Never fails; a spelling that names nothing is
    /// carried through unresolved and warned about here.
    pub fn resolve(&self) -> Resolved<Tone> {
        match self {
            ToneSpec::Pentatonic(number) => match PitchKey::from_pentatonic(*number) {
                Some(key) => Resolved::clean(Tone::Pitch(key)),
                None => Resolved::with_warning(
                    Tone::Unresolved(number.to_string()),
                    ResolveWarning::PentatonicOutOfRange(*number),
                ),
            },
            ToneSpec::Name(name) => {
                if name == REST_MARKER {
                    return Resolved::clean(Tone::Rest);
                }
                match parse_name(name) {
                    Some(key) => Resolved::clean(Tone::Pitch(key)),
                    None => Resolved::with_warning(
                        Tone::Unresolved(name.clone()),
                        ResolveWarning::UnknownTone(name.clone()),
                    ),
                }
            }
        }
    }
}

/// Parse `letter [# | b] [octave suffix]`.
fn parse_name(name: &str) -> Option<PitchKey> {
    let mut chars = name.chars();
    let natural = PitchClass::from_letter(chars.next()?)?;
    let rest = chars.as_str();

    let (class, suffix) = if let Some(tail) = rest.strip_prefix('#') {
        (natural.sharpened(), tail)
    } else if let Some(tail) = rest.strip_prefix('b') {
        (natural.flattened(), tail)
    } else {
        (natural, rest)
    };

    Some(PitchKey::new(class, OctaveShift::from_suffix(suffix)?))
}
