// engine.rs

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio_player::audio_player::{AudioBackend, OutputStream};
use crate::error::PlaybackResult;
use crate::karplus_strong::karplus_strong::synthesize;
use crate::music_representation::chord_voicing::voice;
use crate::playback::schedule::{arpeggio_events, scale_events, strum_events, ScheduledEvent};
use crate::playback::settings::{PlaybackSettings, SettingsUpdate, MAX_NOTE_LENGTH};
use crate::signal_chain::mixer::lock_mixer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Initializing,
    Ready,
}

enum EngineState<O> {
    Uninitialized,
    Initializing,
    Ready(O),
}

/// Owns the output and plays notes on it.
///
/// Play calls made before the engine is Ready initialize it first. A failed
/// initialization leaves it Uninitialized so the next call tries again.
pub struct GuitarEngine<B: AudioBackend> {
    backend: B,
    state: EngineState<B::Output>,
    settings: Arc<PlaybackSettings>,
    rng: StdRng,
}

impl<B: AudioBackend> GuitarEngine<B> {
    /// Creates an engine whose randomness is seeded from system entropy.
    pub fn new(backend: B) -> Self {
        Self::with_rng(backend, StdRng::from_entropy())
    }

    /// Creates an engine with a fixed seed, for reproducible output.
    pub fn with_seed(backend: B, seed: u64) -> Self {
        Self::with_rng(backend, StdRng::seed_from_u64(seed))
    }

    fn with_rng(backend: B, rng: StdRng) -> Self {
        Self {
            backend,
            state: EngineState::Uninitialized,
            settings: Arc::new(PlaybackSettings::default()),
            rng,
        }
    }

    pub fn with_settings(mut self, settings: PlaybackSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn status(&self) -> EngineStatus {
        match self.state {
            EngineState::Uninitialized => EngineStatus::Uninitialized,
            EngineState::Initializing => EngineStatus::Initializing,
            EngineState::Ready(_) => EngineStatus::Ready,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn output(&self) -> Option<&B::Output> {
        match &self.state {
            EngineState::Ready(output) => Some(output),
            _ => None,
        }
    }

    pub fn output_mut(&mut self) -> Option<&mut B::Output> {
        match &mut self.state {
            EngineState::Ready(output) => Some(output),
            _ => None,
        }
    }

    /// Opens the output and builds the signal chain. No-op when Ready.
    pub async fn initialize(&mut self) -> PlaybackResult<()> {
        if let EngineState::Ready(_) = self.state {
            return Ok(());
        }

        self.state = EngineState::Initializing;
        let seed = self.rng.gen();
        match self.backend.open(&self.settings, seed) {
            Ok(output) => {
                self.state = EngineState::Ready(output);
                log::info!("audio engine ready");
                Ok(())
            }
            Err(err) => {
                self.state = EngineState::Uninitialized;
                log::warn!("audio engine failed to initialize: {}", err);
                Err(err)
            }
        }
    }

    async fn ensure_ready(&mut self) -> PlaybackResult<()> {
        if !matches!(self.state, EngineState::Ready(_)) {
            self.initialize().await?;
        }
        if let EngineState::Ready(output) = &mut self.state {
            if output.is_suspended() {
                output.resume().await?;
            }
        }
        Ok(())
    }

    /// Output clock in seconds, 0 before the engine is Ready.
    pub fn current_time(&self) -> f64 {
        match &self.state {
            EngineState::Ready(output) => lock_mixer(output.mixer()).current_time(),
            _ => 0.0,
        }
    }

    /// Synthesizes each event and queues it on the output clock.
    fn dispatch(&mut self, events: &[ScheduledEvent]) {
        let EngineState::Ready(output) = &self.state else {
            return;
        };
        let sample_rate = lock_mixer(output.mixer()).sample_rate();
        for event in events {
            let tone = synthesize(
                event.frequency,
                event.start_time,
                event.duration,
                sample_rate,
                &mut self.rng,
            )
            .into_scheduled();
            lock_mixer(output.mixer()).schedule(tone);
        }
    }

    /// Plays one note now. `duration` defaults to the configured note length.
    pub async fn play_note(
        &mut self,
        note_name: &str,
        duration: Option<f32>,
    ) -> PlaybackResult<ScheduledEvent> {
        self.ensure_ready().await?;

        let duration = match duration {
            Some(d) if d.is_finite() && d > 0.0 && d <= MAX_NOTE_LENGTH => d,
            Some(d) => {
                log::warn!("ignoring note duration {}, using note length", d);
                self.settings.note_length
            }
            None => self.settings.note_length,
        };
        let event = ScheduledEvent::new(note_name, self.current_time(), duration);
        self.dispatch(std::slice::from_ref(&event));
        Ok(event)
    }

    /// Plays a scale one beat per note, low to high unless `ascending` is false.
    pub async fn play_scale<S: AsRef<str>>(
        &mut self,
        notes: &[S],
        ascending: bool,
    ) -> PlaybackResult<Vec<ScheduledEvent>> {
        self.ensure_ready().await?;

        let now = self.current_time();
        let events = scale_events(notes, ascending, now, &self.settings);
        log::debug!(
            "scheduling {} scale notes from {:.3}s at {} BPM",
            events.len(),
            now,
            self.settings.tempo
        );
        self.dispatch(&events);
        Ok(events)
    }

    /// Voices a chord and plays it strummed, or arpeggiated when asked.
    pub async fn play_chord<S: AsRef<str>>(
        &mut self,
        tones: &[S],
        arpeggiated: bool,
    ) -> PlaybackResult<Vec<ScheduledEvent>> {
        self.ensure_ready().await?;

        let voicing = voice(tones);
        let now = self.current_time();
        let settings = Arc::clone(&self.settings);
        let events = if arpeggiated {
            arpeggio_events(&voicing.notes, now, &settings)
        } else {
            strum_events(&voicing.notes, now, &settings, &mut self.rng)
        };
        log::debug!("scheduling chord {:?} ({:?})", voicing.notes, voicing.source);
        self.dispatch(&events);
        Ok(events)
    }

    /// Merges `update` into the settings and applies volume and reverb to the
    /// live chain. Returns the new settings.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> PlaybackSettings {
        let next = self.settings.merged(update);
        if let EngineState::Ready(output) = &self.state {
            let mut mixer = lock_mixer(output.mixer());
            let chain = mixer.chain_mut();
            chain.set_volume(next.volume);
            chain.set_reverb_amount(next.reverb_amount);
        }
        self.settings = Arc::new(next);
        next
    }

    pub fn settings(&self) -> PlaybackSettings {
        *self.settings
    }

    /// Best effort: drops every queued or sounding note.
    pub fn stop_all(&mut self) {
        if let EngineState::Ready(output) = &self.state {
            lock_mixer(output.mixer()).stop_all();
        }
    }
}
