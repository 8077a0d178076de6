// offline.rs

use std::cell::Cell;

use futures::future::{self, FutureExt, LocalBoxFuture};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio_player::audio_player::{AudioBackend, OutputStream};
use crate::error::{InitializationError, PlaybackResult};
use crate::playback::settings::PlaybackSettings;
use crate::signal_chain::mixer::{lock_mixer, Mixer, SharedMixer};
use crate::signal_chain::signal_chain::SignalChain;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

#[derive(Debug)]
pub struct OfflineBackend {
    sample_rate: u32,
    failures_left: Cell<u32>,
    opened: Cell<u32>,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            failures_left: Cell::new(0),
            opened: Cell::new(0),
        }
    }

    /// A backend whose first `failures` opens fail, for exercising retries.
    pub fn failing(sample_rate: u32, failures: u32) -> Self {
        let backend = Self::new(sample_rate);
        backend.failures_left.set(failures);
        backend
    }

    /// Number of successful opens so far.
    pub fn open_count(&self) -> u32 {
        self.opened.get()
    }
}

impl Default for OfflineBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl AudioBackend for OfflineBackend {
    type Output = OfflineOutput;

    fn open(&self, settings: &PlaybackSettings, seed: u64) -> PlaybackResult<OfflineOutput> {
        let failures = self.failures_left.get();
        if failures > 0 {
            self.failures_left.set(failures - 1);
            return Err(InitializationError::backend("offline device unavailable"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let chain = SignalChain::new(
            self.sample_rate,
            settings.volume,
            settings.reverb_amount,
            &mut rng,
        );
        self.opened.set(self.opened.get() + 1);
        Ok(OfflineOutput {
            mixer: Mixer::new(self.sample_rate, chain).into_shared(),
            suspended: true,
        })
    }
}

/// The output clock only moves when [`OfflineOutput::render`] is called.
pub struct OfflineOutput {
    mixer: SharedMixer,
    suspended: bool,
}

impl OfflineOutput {
    /// Renders `frames` stereo frames, advancing the output clock.
    pub fn render(&self, frames: usize) -> Vec<[f32; 2]> {
        let mut mixer = lock_mixer(&self.mixer);
        (0..frames).map(|_| mixer.next_frame()).collect()
    }

    pub fn current_time(&self) -> f64 {
        lock_mixer(&self.mixer).current_time()
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }
}

impl OutputStream for OfflineOutput {
    fn mixer(&self) -> &SharedMixer {
        &self.mixer
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> LocalBoxFuture<'_, PlaybackResult<()>> {
        self.suspended = false;
        future::ready(Ok(())).boxed_local()
    }
}
