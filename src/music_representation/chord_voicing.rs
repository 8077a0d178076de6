// chord_voicing.rs

use std::fmt;

use crate::music_representation::note_resolver::pitch_class;

const MINOR_THIRD: u8 = 3;
const MINOR_SEVENTH: u8 = 10;
const MAJOR_SEVENTH: u8 = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Minor7,
}

impl ChordQuality {
    /// Suffix used in chord symbols and voicing table keys.
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordQuality::Major => write!(f, "major"),
            ChordQuality::Minor => write!(f, "minor"),
            ChordQuality::Dominant7 => write!(f, "dominant seventh"),
            ChordQuality::Major7 => write!(f, "major seventh"),
            ChordQuality::Minor7 => write!(f, "minor seventh"),
        }
    }
}

/// Where a voicing came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoicingSource {
    /// A hand-curated shape, with its table key (e.g. `"Am7"`).
    Table(String),
    /// The positional octave rule for chords without a known shape.
    Fallback,
}

/// Octave-qualified note names in playing order, lowest string first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordVoicing {
    pub notes: Vec<String>,
    pub source: VoicingSource,
}

impl ChordVoicing {
    pub fn is_fallback(&self) -> bool {
        self.source == VoicingSource::Fallback
    }
}

/// Open and barre shapes for the natural roots, keyed by chord symbol.
const VOICING_TABLE: &[(&str, &[&str])] = &[
    ("C", &["C3", "E3", "G3", "C4", "E4"]),
    ("Cm", &["C3", "G3", "C4", "Eb4", "G4"]),
    ("C7", &["C3", "E3", "Bb3", "C4", "E4"]),
    ("Cmaj7", &["C3", "E3", "G3", "B3", "E4"]),
    ("Cm7", &["C3", "G3", "Bb3", "Eb4", "G4"]),
    ("D", &["D3", "A3", "D4", "F#4"]),
    ("Dm", &["D3", "A3", "D4", "F4"]),
    ("D7", &["D3", "A3", "C4", "F#4"]),
    ("Dmaj7", &["D3", "A3", "C#4", "F#4"]),
    ("Dm7", &["D3", "A3", "C4", "F4"]),
    ("E", &["E2", "B2", "E3", "G#3", "B3", "E4"]),
    ("Em", &["E2", "B2", "E3", "G3", "B3", "E4"]),
    ("E7", &["E2", "B2", "D3", "G#3", "B3", "E4"]),
    ("Emaj7", &["E2", "B2", "D#3", "G#3", "B3", "E4"]),
    ("Em7", &["E2", "B2", "D3", "G3", "B3", "E4"]),
    ("F", &["F2", "C3", "F3", "A3", "C4", "F4"]),
    ("Fm", &["F2", "C3", "F3", "Ab3", "C4", "F4"]),
    ("F7", &["F2", "C3", "Eb3", "A3", "C4", "F4"]),
    ("Fmaj7", &["F3", "A3", "C4", "E4"]),
    ("Fm7", &["F2", "C3", "Eb3", "Ab3", "C4", "F4"]),
    ("G", &["G2", "B2", "D3", "G3", "B3", "G4"]),
    ("Gm", &["G2", "D3", "G3", "Bb3", "D4", "G4"]),
    ("G7", &["G2", "B2", "D3", "G3", "B3", "F4"]),
    ("Gmaj7", &["G2", "B2", "D3", "G3", "B3", "F#4"]),
    ("Gm7", &["G2", "D3", "F3", "Bb3", "D4", "G4"]),
    ("A", &["A2", "E3", "A3", "C#4", "E4"]),
    ("Am", &["A2", "E3", "A3", "C4", "E4"]),
    ("A7", &["A2", "E3", "G3", "C#4", "E4"]),
    ("Amaj7", &["A2", "E3", "G#3", "C#4", "E4"]),
    ("Am7", &["A2", "E3", "G3", "C4", "E4"]),
    ("B", &["B2", "F#3", "B3", "D#4", "F#4"]),
    ("Bm", &["B2", "F#3", "B3", "D4", "F#4"]),
    ("B7", &["B2", "D#3", "A3", "B3", "F#4"]),
    ("Bmaj7", &["B2", "F#3", "A#3", "D#4", "F#4"]),
    ("Bm7", &["B2", "F#3", "A3", "D4", "F#4"]),
];

/// Looks up a hand-curated voicing by chord symbol.
pub fn table_voicing(key: &str) -> Option<&'static [&'static str]> {
    VOICING_TABLE
        .iter()
        .find(|(symbol, _)| *symbol == key)
        .map(|(_, notes)| *notes)
}

fn strip_octave(name: &str) -> String {
    name.trim().trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
}

fn interval_above(root: Option<u8>, tone: Option<&String>) -> Option<u8> {
    let root = root?;
    let tone = pitch_class(tone?)?;
    Some((tone + 12 - root) % 12)
}

/// Classifies a chord from its tones, first tone taken as the root.
///
/// A minor third above the root marks the chord minor. A fourth tone a major
/// seventh above the root makes it `maj7` (dropping any minor flag); a minor
/// seventh makes it a `7`, or `m7` when the third was minor.
pub fn detect_quality<S: AsRef<str>>(tones: &[S]) -> ChordQuality {
    let classes: Vec<String> = tones.iter().map(|t| strip_octave(t.as_ref())).collect();
    let root = classes.first().and_then(|name| pitch_class(name));

    let minor = interval_above(root, classes.get(1)) == Some(MINOR_THIRD);
    match interval_above(root, classes.get(3)) {
        Some(MAJOR_SEVENTH) => ChordQuality::Major7,
        Some(MINOR_SEVENTH) if minor => ChordQuality::Minor7,
        Some(MINOR_SEVENTH) => ChordQuality::Dominant7,
        _ if minor => ChordQuality::Minor,
        _ => ChordQuality::Major,
    }
}

/// Octave for the root in the positional rule: E through G# sit low enough
/// to take the bass string in octave 2.
fn fallback_root_octave(root: &str) -> i32 {
    match pitch_class(root) {
        Some(class) if (4..=8).contains(&class) => 2,
        _ => 3,
    }
}

fn fallback_voicing(classes: &[String]) -> Vec<String> {
    classes
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let octave = match index {
                0 => fallback_root_octave(name),
                1 | 2 => 3,
                _ => 4,
            };
            format!("{}{}", name, octave)
        })
        .collect()
}

/// Spreads abstract chord tones into a guitar voicing.
///
/// Known chords return their table shape verbatim, which may double or omit
/// tones. Anything else keeps the input tones in order and places them with
/// the positional octave rule.
pub fn voice<S: AsRef<str>>(chord_tones: &[S]) -> ChordVoicing {
    let classes: Vec<String> = chord_tones
        .iter()
        .map(|t| strip_octave(t.as_ref()))
        .collect();

    if let Some(root) = classes.first() {
        let key = format!("{}{}", root, detect_quality(&classes).suffix());
        if let Some(notes) = table_voicing(&key) {
            return ChordVoicing {
                notes: notes.iter().map(|n| n.to_string()).collect(),
                source: VoicingSource::Table(key),
            };
        }
        log::debug!("no voicing shape for {:?}, using positional octaves", key);
    }

    ChordVoicing {
        notes: fallback_voicing(&classes),
        source: VoicingSource::Fallback,
    }
}
