// signal_chain.rs

use rand::Rng;

use crate::signal_chain::reverb::ConvolutionReverb;

/// The shared output stage: master gain into a dry/wet reverb mix.
///
/// Built once per engine and fed by every note. Gains are changed in place.
pub struct SignalChain {
    master_gain: f32,
    dry_gain: f32,
    wet_gain: f32,
    reverb: ConvolutionReverb,
}

impl SignalChain {
    pub fn new<R: Rng>(sample_rate: u32, volume: f32, reverb_amount: f32, rng: &mut R) -> Self {
        Self::with_reverb(ConvolutionReverb::new(sample_rate, rng), volume, reverb_amount)
    }

    pub fn with_reverb(reverb: ConvolutionReverb, volume: f32, reverb_amount: f32) -> Self {
        let mut chain = Self {
            master_gain: 0.0,
            dry_gain: 0.0,
            wet_gain: 0.0,
            reverb,
        };
        chain.set_volume(volume);
        chain.set_reverb_amount(reverb_amount);
        chain
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.master_gain = volume.clamp(0.0, 1.0);
    }

    /// Wet gain is the amount itself, dry gain takes the remainder.
    pub fn set_reverb_amount(&mut self, amount: f32) {
        let amount = amount.clamp(0.0, 1.0);
        self.wet_gain = amount;
        self.dry_gain = 1.0 - amount;
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn dry_gain(&self) -> f32 {
        self.dry_gain
    }

    pub fn wet_gain(&self) -> f32 {
        self.wet_gain
    }

    pub fn reverb_latency(&self) -> usize {
        self.reverb.latency()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> [f32; 2] {
        let x = input * self.master_gain;
        let [wet_left, wet_right] = self.reverb.process(x);
        [
            self.dry_gain * x + self.wet_gain * wet_left,
            self.dry_gain * x + self.wet_gain * wet_right,
        ]
    }
}
