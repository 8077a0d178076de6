// note_resolver.rs

use regex::Regex;
use std::sync::OnceLock;

/// Reference pitch A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;
/// Octave assumed when a note name carries none.
pub const DEFAULT_OCTAVE: i32 = 4;
/// Highest octave a note name may carry.
pub const MAX_OCTAVE: i32 = 10;
/// Semitone distance of A above C within one octave.
const A_SEMITONE: i32 = 9;

/// A note name split into pitch class (0 = C .. 11 = B) and octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedNote {
    pub pitch_class: u8,
    pub octave: i32,
}

impl ParsedNote {
    /// Semitone distance from C4.
    pub fn semitones_from_c4(&self) -> i32 {
        (self.octave - DEFAULT_OCTAVE) * 12 + self.pitch_class as i32
    }

    pub fn frequency(&self) -> f32 {
        frequency_from_c4(self.semitones_from_c4())
    }
}

fn surface_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-G](#{1,2}|b{1,2})?[0-9]?$").expect("static pattern"))
}

fn non_note_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Gb#0-9]").expect("static pattern"))
}

/// True when `name` matches the accepted surface format, e.g. `C#4`, `Bbb`, `G2`.
pub fn is_valid_note_name(name: &str) -> bool {
    surface_pattern().is_match(name)
}

/// Equal-tempered frequency for a semitone distance from C4.
pub fn frequency_from_c4(semitones: i32) -> f32 {
    A4_FREQUENCY * 2f32.powf((semitones - A_SEMITONE) as f32 / 12.0)
}

fn natural_semitone(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

fn single_accidental_semitone(token: &str) -> Option<i32> {
    let semitone = match token {
        "C" => 0,
        "B#" => 12,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" | "Fb" => 4,
        "F" | "E#" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" => 11,
        "Cb" => -1,
        _ => return None,
    };
    Some(semitone)
}

/// Splits a note name into pitch class and octave.
///
/// Characters that cannot be part of a note name are dropped first, then a
/// trailing run of digits is taken as the octave (default 4). Returns `None`
/// when the remaining token is not a known spelling or the octave is above
/// [`MAX_OCTAVE`].
pub fn parse_note(name: &str) -> Option<ParsedNote> {
    let cleaned = non_note_chars().replace_all(name, "");
    let token_end = cleaned
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .len();
    let (token, digits) = cleaned.split_at(token_end);
    let octave = if digits.is_empty() {
        DEFAULT_OCTAVE
    } else {
        digits.parse::<i32>().ok().filter(|o| *o <= MAX_OCTAVE)?
    };

    let semitone = if token.len() == 3 && (token.ends_with("##") || token.ends_with("bb")) {
        let base = natural_semitone(token.chars().next()?)?;
        if token.ends_with("##") {
            base + 2
        } else {
            base - 2
        }
    } else {
        single_accidental_semitone(token)?
    };

    Some(ParsedNote {
        pitch_class: semitone.rem_euclid(12) as u8,
        octave,
    })
}

/// Pitch class of a note name, ignoring any octave digits.
pub fn pitch_class(name: &str) -> Option<u8> {
    parse_note(name).map(|note| note.pitch_class)
}

/// Resolves a note name to its frequency in Hz.
///
/// Never fails: an unrecognized name sounds as C4 and logs a warning.
pub fn resolve(note_name: &str) -> f32 {
    match parse_note(note_name) {
        Some(note) => note.frequency(),
        None => {
            log::warn!(
                "unrecognized note name {:?}, falling back to C{}",
                note_name,
                DEFAULT_OCTAVE
            );
            frequency_from_c4(0)
        }
    }
}
