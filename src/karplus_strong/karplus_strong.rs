// karplus_strong.rs

use rand::Rng;
use std::f32::consts::PI;

use crate::guitar::guitar::{parameters_for, StringTimbre};
use crate::signal_chain::filter::BiquadFilter;

/// String vibrato rate in Hz.
pub const VIBRATO_RATE: f32 = 1.5;
/// String vibrato depth as a fraction of amplitude.
pub const VIBRATO_DEPTH: f32 = 0.001;
/// Feedback amplitude above which the string loses extra energy.
pub const SOFT_CLIP_THRESHOLD: f32 = 0.15;
const SOFT_CLIP_SLOPE: f32 = 0.9;
pub const WARMTH_CUTOFF: f32 = 5000.0;
pub const WARMTH_Q: f32 = 0.5;
/// Longest tone ever rendered, in seconds.
pub const MAX_TONE_SECONDS: f64 = 120.0;

/// Number of samples covering `duration_seconds`, capped at [`MAX_TONE_SECONDS`].
pub fn tone_length(duration_seconds: f32, sample_rate: u32) -> usize {
    let limit = MAX_TONE_SECONDS * sample_rate as f64;
    (duration_seconds as f64 * sample_rate as f64)
        .round()
        .clamp(0.0, limit) as usize
}

/// Gentle compression of feedback values above the threshold.
#[inline]
pub fn soft_clip(value: f32) -> f32 {
    let magnitude = value.abs();
    if magnitude > SOFT_CLIP_THRESHOLD {
        value.signum() * (SOFT_CLIP_THRESHOLD + (magnitude - SOFT_CLIP_THRESHOLD) * SOFT_CLIP_SLOPE)
    } else {
        value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToneBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// A rendered tone with its onset on the output clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTone {
    pub samples: Vec<f32>,
    pub start_time: f64,
}

/// Plucked string generator over a circular delay line.
pub struct KarplusStrong {
    buffer: Vec<f32>,
    position: usize,
    elapsed_samples: usize,
    remaining_samples: usize,
    sample_rate: f32,
    timbre: StringTimbre,
}

impl KarplusStrong {
    pub fn new<R: Rng>(
        frequency: f32,
        duration_seconds: f32,
        sample_rate: u32,
        timbre: &StringTimbre,
        rng: &mut R,
    ) -> Self {
        let buffer_length = ((sample_rate as f32 / frequency).round() as usize)
            .clamp(2, sample_rate.max(2) as usize);

        // Low strings get a softer, slower pluck
        let (steepness, ripple_cycles) = if timbre.is_low_string {
            (3.0, 2.0)
        } else {
            (5.0, 3.0)
        };

        let buffer = (0..buffer_length)
            .map(|i| {
                let phase = i as f32 / buffer_length as f32;
                let white = rng.gen::<f32>() * 2.0 - 1.0;
                let envelope = (-steepness * phase).exp();
                let ripple = 1.0 + 0.3 * (2.0 * PI * ripple_cycles * phase).sin();
                white * envelope * ripple
            })
            .collect();

        KarplusStrong {
            buffer,
            position: 0,
            elapsed_samples: 0,
            remaining_samples: tone_length(duration_seconds, sample_rate),
            sample_rate: sample_rate as f32,
            timbre: *timbre,
        }
    }

    pub fn delay_length(&self) -> usize {
        self.buffer.len()
    }

    pub fn next_sample(&mut self) -> Option<f32> {
        if self.remaining_samples == 0 {
            return None;
        }

        let t = self.elapsed_samples as f32 / self.sample_rate;
        let current_value = self.buffer[self.position];
        let next_index = (self.position + 1) % self.buffer.len();
        let next_value = self.buffer[next_index];

        let decay = (-self.timbre.decay_rate * t).exp();
        let vibrato = 1.0 + VIBRATO_DEPTH * (2.0 * PI * VIBRATO_RATE * t).sin();
        let output = current_value * decay * vibrato;

        let blended =
            self.timbre.brightness * current_value + (1.0 - self.timbre.brightness) * next_value;
        self.buffer[self.position] = soft_clip(blended * self.timbre.damping);

        self.position = next_index;
        self.elapsed_samples += 1;
        self.remaining_samples -= 1;

        Some(output)
    }

    pub fn render(mut self) -> ToneBuffer {
        let mut samples = Vec::with_capacity(self.remaining_samples);
        while let Some(sample) = self.next_sample() {
            samples.push(sample);
        }
        ToneBuffer::new(samples, self.sample_rate as u32)
    }
}

/// Per-note stage between the string and the shared signal chain:
/// body resonance low-pass, warmth low-pass, then note gain.
#[derive(Clone, Debug)]
pub struct NoteChain {
    body: BiquadFilter,
    warmth: BiquadFilter,
    gain: f32,
}

impl NoteChain {
    pub fn for_timbre(timbre: &StringTimbre, sample_rate: u32) -> Self {
        let sample_rate = sample_rate as f32;
        Self {
            body: BiquadFilter::lowpass(timbre.body_resonance, timbre.resonance_q, sample_rate),
            warmth: BiquadFilter::lowpass(WARMTH_CUTOFF, WARMTH_Q, sample_rate),
            gain: timbre.volume,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            let body = self.body.process(*sample);
            *sample = self.warmth.process(body) * self.gain;
        }
    }
}

/// A raw string tone together with the chain it still has to pass through.
pub struct SynthesizedNote {
    pub buffer: ToneBuffer,
    pub chain: NoteChain,
    pub start_time: f64,
}

impl SynthesizedNote {
    /// Runs the note chain and hands the result over for scheduling.
    pub fn into_scheduled(self) -> ScheduledTone {
        let SynthesizedNote {
            buffer,
            mut chain,
            start_time,
        } = self;
        let mut samples = buffer.into_samples();
        chain.process(&mut samples);
        ScheduledTone {
            samples,
            start_time,
        }
    }
}

/// Synthesizes one plucked note at `frequency` lasting `duration` seconds.
pub fn synthesize<R: Rng>(
    frequency: f32,
    start_time: f64,
    duration: f32,
    sample_rate: u32,
    rng: &mut R,
) -> SynthesizedNote {
    let timbre = parameters_for(frequency);
    let buffer = KarplusStrong::new(frequency, duration, sample_rate, &timbre, rng).render();
    SynthesizedNote {
        buffer,
        chain: NoteChain::for_timbre(&timbre, sample_rate),
        start_time,
    }
}
