// reverb.rs

use std::sync::Arc;

use rand::Rng;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Impulse response length in seconds.
pub const IMPULSE_SECONDS: f32 = 2.0;
/// Peak level of the impulse response noise.
pub const IMPULSE_LEVEL: f32 = 0.03;
/// Convolution block size in samples.
pub const BLOCK_SIZE: usize = 512;

/// Synthesizes one channel of the impulse response.
///
/// Sample `i` is uniform noise scaled by `(1 - i/length)^2` and [`IMPULSE_LEVEL`].
pub fn impulse_response<R: Rng>(length: usize, rng: &mut R) -> Vec<f32> {
    (0..length)
        .map(|i| {
            let decay = (1.0 - i as f32 / length as f32).powi(2);
            (rng.gen::<f32>() * 2.0 - 1.0) * decay * IMPULSE_LEVEL
        })
        .collect()
}

/// Uniformly partitioned overlap-save convolution. Output lags input by one
/// block.
pub struct ConvolutionReverb {
    block_size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    /// Spectra of the impulse partitions, per channel.
    partitions: [Vec<Vec<Complex<f32>>>; 2],
    /// Ring of the most recent input block spectra.
    history: Vec<Vec<Complex<f32>>>,
    newest: usize,
    /// Previous block followed by the block being filled.
    window: Vec<f32>,
    fill: usize,
    output: [Vec<f32>; 2],
    accumulator: Vec<Complex<f32>>,
}

impl ConvolutionReverb {
    /// Builds a reverb with a fresh random impulse response.
    pub fn new<R: Rng>(sample_rate: u32, rng: &mut R) -> Self {
        let length = ((sample_rate as f32 * IMPULSE_SECONDS) as usize).max(1);
        let left = impulse_response(length, rng);
        let right = impulse_response(length, rng);
        Self::from_impulse(&left, &right, BLOCK_SIZE)
    }

    /// Builds a reverb from explicit per-channel impulse responses.
    pub fn from_impulse(left: &[f32], right: &[f32], block_size: usize) -> Self {
        let block_size = block_size.max(1);
        let fft_size = block_size * 2;
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let count = left.len().max(right.len()).div_ceil(block_size).max(1);
        let transform = |impulse: &[f32]| -> Vec<Vec<Complex<f32>>> {
            (0..count)
                .map(|p| {
                    let mut spectrum = vec![Complex::new(0.0, 0.0); fft_size];
                    let start = p * block_size;
                    for (k, slot) in spectrum.iter_mut().take(block_size).enumerate() {
                        if let Some(&h) = impulse.get(start + k) {
                            *slot = Complex::new(h, 0.0);
                        }
                    }
                    forward.process(&mut spectrum);
                    spectrum
                })
                .collect()
        };
        let partitions = [transform(left), transform(right)];

        Self {
            block_size,
            partitions,
            history: vec![vec![Complex::new(0.0, 0.0); fft_size]; count],
            newest: 0,
            window: vec![0.0; fft_size],
            fill: 0,
            output: [vec![0.0; block_size], vec![0.0; block_size]],
            accumulator: vec![Complex::new(0.0, 0.0); fft_size],
            forward,
            inverse,
        }
    }

    /// Latency of the wet signal in samples.
    pub fn latency(&self) -> usize {
        self.block_size
    }

    /// Feeds one mono sample and returns one stereo wet sample.
    pub fn process(&mut self, input: f32) -> [f32; 2] {
        let out = [self.output[0][self.fill], self.output[1][self.fill]];
        self.window[self.block_size + self.fill] = input;
        self.fill += 1;
        if self.fill == self.block_size {
            self.process_block();
            self.fill = 0;
        }
        out
    }

    fn process_block(&mut self) {
        let count = self.history.len();
        let fft_size = self.block_size * 2;

        self.newest = (self.newest + 1) % count;
        let spectrum = &mut self.history[self.newest];
        for (slot, &x) in spectrum.iter_mut().zip(self.window.iter()) {
            *slot = Complex::new(x, 0.0);
        }
        self.forward.process(spectrum);

        let scale = 1.0 / fft_size as f32;
        for channel in 0..2 {
            self.accumulator.fill(Complex::new(0.0, 0.0));
            for (age, partition) in self.partitions[channel].iter().enumerate() {
                let input = &self.history[(self.newest + count - age) % count];
                for ((acc, x), h) in self.accumulator.iter_mut().zip(input).zip(partition) {
                    *acc += x * h;
                }
            }
            self.inverse.process(&mut self.accumulator);
            for (out, y) in self.output[channel]
                .iter_mut()
                .zip(&self.accumulator[self.block_size..])
            {
                *out = y.re * scale;
            }
        }

        self.window.copy_within(self.block_size.., 0);
    }
}
