// settings.rs

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Slowest accepted tempo in BPM.
pub const MIN_TEMPO: f32 = 1.0;
/// Longest accepted note length in seconds.
pub const MAX_NOTE_LENGTH: f32 = 60.0;

/// Playback configuration, read on every play call.
///
/// Values are replaced whole: [`PlaybackSettings::merged`] returns a new value
/// rather than editing in place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSettings {
    /// Master gain, 0..=1.
    pub volume: f32,
    /// Beats per minute used to space scale notes.
    pub tempo: f32,
    /// Base note duration in seconds.
    pub note_length: f32,
    /// Gap between arpeggiated chord notes in seconds.
    pub chord_spread: f32,
    /// Reverb wet level, 0..=1.
    pub reverb_amount: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            tempo: 120.0,
            note_length: 1.5,
            chord_spread: 0.06,
            reverb_amount: 0.05,
        }
    }
}

/// A partial settings change. Absent fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_length: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord_spread: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverb_amount: Option<f32>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn tempo(mut self, tempo: f32) -> Self {
        self.tempo = Some(tempo);
        self
    }

    pub fn note_length(mut self, note_length: f32) -> Self {
        self.note_length = Some(note_length);
        self
    }

    pub fn chord_spread(mut self, chord_spread: f32) -> Self {
        self.chord_spread = Some(chord_spread);
        self
    }

    pub fn reverb_amount(mut self, reverb_amount: f32) -> Self {
        self.reverb_amount = Some(reverb_amount);
        self
    }
}

fn unit_interval(name: &str, value: f32, current: f32) -> f32 {
    if value.is_nan() {
        log::warn!("ignoring {} = NaN", name);
        return current;
    }
    value.clamp(0.0, 1.0)
}

fn bounded(name: &str, value: f32, current: f32, range: RangeInclusive<f32>) -> f32 {
    if value.is_finite() && range.contains(&value) {
        value
    } else {
        log::warn!("ignoring {} = {}, keeping {}", name, value, current);
        current
    }
}

impl PlaybackSettings {
    /// Returns these settings with `update` applied.
    ///
    /// Volume and reverb amount are clamped to 0..=1. Tempo must be at least
    /// [`MIN_TEMPO`], note length positive and at most [`MAX_NOTE_LENGTH`],
    /// chord spread non-negative. Other values are rejected and the current
    /// value kept.
    pub fn merged(&self, update: &SettingsUpdate) -> PlaybackSettings {
        let mut next = *self;
        if let Some(volume) = update.volume {
            next.volume = unit_interval("volume", volume, self.volume);
        }
        if let Some(tempo) = update.tempo {
            next.tempo = bounded("tempo", tempo, self.tempo, MIN_TEMPO..=f32::MAX);
        }
        if let Some(note_length) = update.note_length {
            next.note_length = bounded(
                "noteLength",
                note_length,
                self.note_length,
                f32::MIN_POSITIVE..=MAX_NOTE_LENGTH,
            );
        }
        if let Some(chord_spread) = update.chord_spread {
            next.chord_spread = bounded("chordSpread", chord_spread, self.chord_spread, 0.0..=f32::MAX);
        }
        if let Some(reverb_amount) = update.reverb_amount {
            next.reverb_amount = unit_interval("reverbAmount", reverb_amount, self.reverb_amount);
        }
        next
    }

    /// Seconds between consecutive scale notes.
    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.tempo as f64
    }
}
