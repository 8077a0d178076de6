// mixer.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::karplus_strong::karplus_strong::ScheduledTone;
use crate::signal_chain::signal_chain::SignalChain;

/// Mixer shared between the control path and the output callback.
pub type SharedMixer = Arc<Mutex<Mixer>>;

/// Locks the mixer, recovering the state if a previous holder panicked.
pub fn lock_mixer(mixer: &SharedMixer) -> MutexGuard<'_, Mixer> {
    match mixer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

struct ActiveTone {
    samples: Vec<f32>,
    start_frame: u64,
    position: usize,
}

/// Sums scheduled tones on the output clock and runs them through the
/// shared signal chain.
///
/// The clock is the number of frames rendered so far.
pub struct Mixer {
    sample_rate: u32,
    frame: u64,
    tones: Vec<ActiveTone>,
    chain: SignalChain,
}

impl Mixer {
    pub fn new(sample_rate: u32, chain: SignalChain) -> Self {
        Self {
            sample_rate,
            frame: 0,
            tones: Vec::new(),
            chain,
        }
    }

    pub fn into_shared(self) -> SharedMixer {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn current_time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    pub fn chain(&self) -> &SignalChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut SignalChain {
        &mut self.chain
    }

    pub fn pending_tones(&self) -> usize {
        self.tones.len()
    }

    /// Queues a tone. Onsets already in the past start on the next frame.
    pub fn schedule(&mut self, tone: ScheduledTone) {
        if tone.samples.is_empty() {
            return;
        }
        let start_frame = (tone.start_time * self.sample_rate as f64).round().max(0.0) as u64;
        self.tones.push(ActiveTone {
            samples: tone.samples,
            start_frame: start_frame.max(self.frame),
            position: 0,
        });
    }

    /// Drops every queued and sounding tone. The reverb tail keeps ringing.
    pub fn stop_all(&mut self) {
        self.tones.clear();
    }

    /// Renders one stereo frame and advances the clock.
    pub fn next_frame(&mut self) -> [f32; 2] {
        let frame = self.frame;
        let mut value = 0.0;

        // Sum samples from all sounding tones
        self.tones.retain_mut(|tone| {
            if frame < tone.start_frame {
                return true;
            }
            value += tone.samples[tone.position];
            tone.position += 1;
            tone.position < tone.samples.len()
        });

        self.frame += 1;
        self.chain.process(value)
    }

    /// Fills an interleaved output buffer.
    ///
    /// Mono devices get the average of both sides; channels past the second
    /// repeat the left side.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in output.chunks_mut(channels) {
            let [left, right] = self.next_frame();
            for (channel, sample) in frame.iter_mut().enumerate() {
                let value = match (channels, channel) {
                    (1, _) => 0.5 * (left + right),
                    (_, 1) => right,
                    _ => left,
                };
                // Prevent clipping
                *sample = value.clamp(-1.0, 1.0);
            }
        }
    }
}
