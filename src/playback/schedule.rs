// schedule.rs

use rand::Rng;

use crate::music_representation::note_resolver::resolve;
use crate::playback::settings::PlaybackSettings;

/// Fraction of the beat a scale note sounds for.
pub const SCALE_NOTE_RATIO: f64 = 0.9;
/// Arpeggiated notes ring this many note lengths.
pub const ARPEGGIO_SUSTAIN: f32 = 1.8;
/// Maximum strum onset offset either side of `now`, in seconds.
pub const STRUM_ONSET_JITTER: f64 = 0.0025;
/// Maximum relative change of a strummed note's duration.
pub const STRUM_DURATION_JITTER: f32 = 0.05;

/// One note to synthesize: pitch, onset on the output clock, length.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub note: String,
    pub frequency: f32,
    pub start_time: f64,
    pub duration: f32,
}

impl ScheduledEvent {
    pub fn new(note: &str, start_time: f64, duration: f32) -> Self {
        Self {
            note: note.to_string(),
            frequency: resolve(note),
            start_time,
            duration,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration as f64
    }
}

/// Evenly spaced scale notes, one beat apart, reversed when descending.
pub fn scale_events<S: AsRef<str>>(
    notes: &[S],
    ascending: bool,
    now: f64,
    settings: &PlaybackSettings,
) -> Vec<ScheduledEvent> {
    let spacing = settings.beat_seconds();
    let duration = (spacing * SCALE_NOTE_RATIO) as f32;
    let ordered: Vec<&str> = if ascending {
        notes.iter().map(|n| n.as_ref()).collect()
    } else {
        notes.iter().rev().map(|n| n.as_ref()).collect()
    };

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, note)| ScheduledEvent::new(note, now + index as f64 * spacing, duration))
        .collect()
}

/// Chord notes one `chord_spread` apart, each ringing into the next.
pub fn arpeggio_events(voicing: &[String], now: f64, settings: &PlaybackSettings) -> Vec<ScheduledEvent> {
    let duration = settings.note_length * ARPEGGIO_SUSTAIN;
    voicing
        .iter()
        .enumerate()
        .map(|(index, note)| {
            ScheduledEvent::new(note, now + index as f64 * settings.chord_spread as f64, duration)
        })
        .collect()
}

/// Chord notes together, each nudged a little in onset and length the way a
/// hand strum lands.
pub fn strum_events<R: Rng>(
    voicing: &[String],
    now: f64,
    settings: &PlaybackSettings,
    rng: &mut R,
) -> Vec<ScheduledEvent> {
    voicing
        .iter()
        .map(|note| {
            let onset = now + rng.gen_range(-STRUM_ONSET_JITTER..=STRUM_ONSET_JITTER);
            let stretch = 1.0 + rng.gen_range(-STRUM_DURATION_JITTER..=STRUM_DURATION_JITTER);
            ScheduledEvent::new(note, onset, settings.note_length * stretch)
        })
        .collect()
}
