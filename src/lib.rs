//! Plucked-string guitar synthesis for note, scale and chord playback.
//!
//! Notes are rendered with a Karplus-Strong string model, shaped per string
//! band, and mixed through a shared master gain and convolution reverb.
//! [`GuitarEngine`] owns the output and is the entry point for callers.

// Module files are named after their directory.
#![allow(clippy::module_inception)]

pub mod audio_player;
pub mod error;
pub mod guitar;
pub mod karplus_strong;
pub mod music_representation;
pub mod playback;
pub mod signal_chain;

pub use audio_player::audio_player::{AudioBackend, OutputStream};
#[cfg(feature = "cpal")]
pub use audio_player::audio_player::{CpalBackend, CpalOutput};
pub use audio_player::offline::{OfflineBackend, OfflineOutput};
pub use error::{InitializationError, PlaybackResult};
pub use music_representation::chord_voicing::{voice, ChordQuality, ChordVoicing};
pub use music_representation::note_resolver::{is_valid_note_name, parse_note, resolve};
pub use playback::engine::{EngineStatus, GuitarEngine};
pub use playback::schedule::ScheduledEvent;
pub use playback::settings::{PlaybackSettings, SettingsUpdate};
