// audio_player.rs

use futures::future::LocalBoxFuture;

use crate::error::PlaybackResult;
use crate::playback::settings::PlaybackSettings;
use crate::signal_chain::mixer::SharedMixer;

/// A live output context: the shared mixer plus whatever drives it.
pub trait OutputStream {
    fn mixer(&self) -> &SharedMixer;

    /// True while the output clock is not advancing.
    fn is_suspended(&self) -> bool;

    /// Starts or resumes the output clock.
    fn resume(&mut self) -> LocalBoxFuture<'_, PlaybackResult<()>>;
}

/// Opens output contexts. Opening builds the signal chain for the device's
/// sample rate; the returned stream starts out suspended.
pub trait AudioBackend {
    type Output: OutputStream;

    fn open(&self, settings: &PlaybackSettings, seed: u64) -> PlaybackResult<Self::Output>;
}

#[cfg(feature = "cpal")]
pub use device::{CpalBackend, CpalOutput};

#[cfg(feature = "cpal")]
mod device {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, Stream, StreamConfig};
    use futures::future::{FutureExt, LocalBoxFuture};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    use super::{AudioBackend, OutputStream};
    use crate::error::{InitializationError, PlaybackResult};
    use crate::playback::settings::PlaybackSettings;
    use crate::signal_chain::mixer::{lock_mixer, Mixer, SharedMixer};
    use crate::signal_chain::signal_chain::SignalChain;

    /// Default output device of the default host.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct CpalBackend;

    pub struct CpalOutput {
        stream: Stream,
        mixer: SharedMixer,
        suspended: bool,
        channels: usize,
    }

    impl CpalOutput {
        pub fn channels(&self) -> usize {
            self.channels
        }
    }

    impl AudioBackend for CpalBackend {
        type Output = CpalOutput;

        fn open(&self, settings: &PlaybackSettings, seed: u64) -> PlaybackResult<CpalOutput> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or(InitializationError::NoOutputDevice)?;
            let config = device.default_output_config()?;
            let sample_rate = config.sample_rate().0;
            let channels = config.channels() as usize;
            let sample_format = config.sample_format();

            let mut rng = StdRng::seed_from_u64(seed);
            let chain = SignalChain::new(
                sample_rate,
                settings.volume,
                settings.reverb_amount,
                &mut rng,
            );
            let mixer = Mixer::new(sample_rate, chain).into_shared();
            let mixer_clone = Arc::clone(&mixer);

            let stream_config: StreamConfig = config.into();
            let stream = match sample_format {
                SampleFormat::F32 => device.build_output_stream(
                    &stream_config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        lock_mixer(&mixer_clone).render(data, channels);
                    },
                    |err| log::error!("output stream error: {}", err),
                    None,
                )?,
                other => {
                    return Err(InitializationError::UnsupportedSampleFormat {
                        format: format!("{:?}", other),
                    })
                }
            };
            // Some hosts start streams on creation
            stream.pause().ok();

            log::info!(
                "opened output device at {} Hz, {} channel(s)",
                sample_rate,
                channels
            );
            Ok(CpalOutput {
                stream,
                mixer,
                suspended: true,
                channels,
            })
        }
    }

    impl OutputStream for CpalOutput {
        fn mixer(&self) -> &SharedMixer {
            &self.mixer
        }

        fn is_suspended(&self) -> bool {
            self.suspended
        }

        fn resume(&mut self) -> LocalBoxFuture<'_, PlaybackResult<()>> {
            async move {
                self.stream.play()?;
                self.suspended = false;
                Ok::<(), InitializationError>(())
            }
            .boxed_local()
        }
    }
}
