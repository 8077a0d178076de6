#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::karplus_strong::karplus_strong::ScheduledTone;
    use crate::signal_chain::mixer::Mixer;
    use crate::signal_chain::reverb::{impulse_response, ConvolutionReverb, IMPULSE_LEVEL};
    use crate::signal_chain::signal_chain::SignalChain;

    const SAMPLE_RATE: u32 = 8000;

    fn silent_reverb() -> ConvolutionReverb {
        ConvolutionReverb::from_impulse(&[0.0], &[0.0], 16)
    }

    fn dry_mixer(volume: f32) -> Mixer {
        Mixer::new(SAMPLE_RATE, SignalChain::with_reverb(silent_reverb(), volume, 0.0))
    }

    #[test]
    fn test_impulse_response_shape() {
        let mut rng = StdRng::seed_from_u64(5);
        let ir = impulse_response(1000, &mut rng);
        assert_eq!(ir.len(), 1000);
        assert!(ir.iter().all(|s| s.abs() <= IMPULSE_LEVEL));

        let head = ir[..100].iter().map(|s| s * s).sum::<f32>();
        let tail = ir[900..].iter().map(|s| s * s).sum::<f32>();
        assert!(tail < head, "response should decay");
    }

    #[test]
    fn test_convolution_reproduces_impulse_response() {
        let left: Vec<f32> = (0..200).map(|i| ((i as f32) * 0.37).sin() * 0.5).collect();
        let right: Vec<f32> = (0..200).map(|i| 1.0 - i as f32 / 200.0).collect();
        let block = 32;
        let mut reverb = ConvolutionReverb::from_impulse(&left, &right, block);
        assert_eq!(reverb.latency(), block);

        let output: Vec<[f32; 2]> = (0..300)
            .map(|n| reverb.process(if n == 0 { 1.0 } else { 0.0 }))
            .collect();

        for frame in &output[..block] {
            assert_eq!(*frame, [0.0, 0.0]);
        }
        for (n, frame) in output[block..block + 200].iter().enumerate() {
            assert!((frame[0] - left[n]).abs() < 1e-4, "left sample {}", n);
            assert!((frame[1] - right[n]).abs() < 1e-4, "right sample {}", n);
        }
    }

    #[test]
    fn test_convolution_is_linear_across_blocks() {
        let ir = [0.5, 0.25, 0.125];
        let mut reverb = ConvolutionReverb::from_impulse(&ir, &ir, 4);
        let input = [1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let output: Vec<f32> = input.iter().map(|&x| reverb.process(x)[0]).collect();

        // Expected y[n] = 0.5 x[n] + 0.25 x[n-1] + 0.125 x[n-2], delayed by 4.
        let expected = [0.5, 0.25, 0.125, 0.0, 0.0, 1.0, 0.5, 0.25, 0.0, 0.0];
        for (n, value) in expected.iter().enumerate() {
            assert!((output[n + 4] - value).abs() < 1e-5, "sample {}", n);
        }
    }

    #[test]
    fn test_wet_dry_gains_sum_to_one() {
        for amount in [0.0, 0.05, 0.3, 1.0] {
            let chain = SignalChain::with_reverb(silent_reverb(), 1.0, amount);
            assert!((chain.dry_gain() + chain.wet_gain() - 1.0).abs() < 1e-6);
        }
        let chain = SignalChain::with_reverb(silent_reverb(), 1.0, 0.05);
        assert!((chain.dry_gain() - 0.95).abs() < 1e-6);
        assert!((chain.wet_gain() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_gains_are_clamped_and_updated_in_place() {
        let mut chain = SignalChain::with_reverb(silent_reverb(), 2.0, -1.0);
        assert_eq!(chain.master_gain(), 1.0);
        assert_eq!(chain.wet_gain(), 0.0);

        chain.set_volume(0.4);
        assert_eq!(chain.master_gain(), 0.4);
        assert_eq!(chain.process(1.0), [0.4, 0.4]);
    }

    #[test]
    fn test_chain_builds_two_second_response() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut chain = SignalChain::new(SAMPLE_RATE, 1.0, 1.0, &mut rng);
        let latency = chain.reverb_latency();
        let two_seconds = SAMPLE_RATE as usize * 2;
        let (mut body, mut tail) = (0.0, 0.0);
        for n in 0..(SAMPLE_RATE as usize * 3) {
            let [left, _] = chain.process(if n == 0 { 1.0 } else { 0.0 });
            if n < two_seconds / 2 {
                body += left * left;
            } else if n >= two_seconds + 3 * latency {
                tail += left * left;
            }
        }
        assert!(body > 1e-3, "reverb should ring, energy {}", body);
        assert!(tail < 1e-12, "tail should end after two seconds, energy {}", tail);
    }

    #[test]
    fn test_mixer_starts_tones_on_time() {
        let mut mixer = dry_mixer(1.0);
        mixer.schedule(ScheduledTone {
            samples: vec![0.5, 0.5],
            start_time: 0.001,
        });

        // 0.001 s at 8 kHz is frame 8
        let left: Vec<f32> = (0..12).map(|_| mixer.next_frame()[0]).collect();
        assert!(left[..8].iter().all(|s| *s == 0.0));
        assert_eq!(&left[8..10], &[0.5, 0.5]);
        assert_eq!(left[10], 0.0);
        assert_eq!(mixer.pending_tones(), 0);
    }

    #[test]
    fn test_mixer_plays_late_tones_immediately() {
        let mut mixer = dry_mixer(1.0);
        for _ in 0..100 {
            mixer.next_frame();
        }
        mixer.schedule(ScheduledTone {
            samples: vec![0.25],
            start_time: 0.0,
        });
        assert_eq!(mixer.next_frame(), [0.25, 0.25]);
        assert!((mixer.current_time() - 101.0 / SAMPLE_RATE as f64).abs() < 1e-12);
    }

    #[test]
    fn test_mixer_sums_overlapping_tones() {
        let mut mixer = dry_mixer(0.5);
        for _ in 0..2 {
            mixer.schedule(ScheduledTone {
                samples: vec![0.4; 4],
                start_time: 0.0,
            });
        }
        assert_eq!(mixer.next_frame(), [0.4, 0.4]);
    }

    #[test]
    fn test_render_layouts() {
        let mut mixer = dry_mixer(1.0);
        mixer.schedule(ScheduledTone {
            samples: vec![0.5; 8],
            start_time: 0.0,
        });

        let mut mono = [0.0; 2];
        mixer.render(&mut mono, 1);
        assert_eq!(mono, [0.5, 0.5]);

        let mut quad = [0.0; 8];
        mixer.render(&mut quad, 4);
        assert!(quad.iter().all(|s| *s == 0.5));
    }

    #[test]
    fn test_render_clamps_output() {
        let mut mixer = dry_mixer(1.0);
        for _ in 0..3 {
            mixer.schedule(ScheduledTone {
                samples: vec![0.9],
                start_time: 0.0,
            });
        }
        let mut out = [0.0; 2];
        mixer.render(&mut out, 2);
        assert_eq!(out, [1.0, 1.0]);
    }

    #[test]
    fn test_stop_all_clears_tones() {
        let mut mixer = dry_mixer(1.0);
        mixer.schedule(ScheduledTone {
            samples: vec![0.5; 100],
            start_time: 1.0,
        });
        mixer.schedule(ScheduledTone {
            samples: Vec::new(),
            start_time: 0.0,
        });
        assert_eq!(mixer.pending_tones(), 1);
        mixer.stop_all();
        assert_eq!(mixer.pending_tones(), 0);
    }
}
