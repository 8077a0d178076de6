// error.rs

use thiserror::Error;

pub type PlaybackResult<T> = Result<T, InitializationError>;

/// The output device or context could not be brought up.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("no output device available")]
    NoOutputDevice,

    #[cfg(feature = "cpal")]
    #[error("failed to query output configuration: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "cpal")]
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "cpal")]
    #[error("failed to resume output stream: {0}")]
    Resume(#[from] cpal::PlayStreamError),

    /// The device only offers a sample format we do not render.
    #[error("unsupported sample format: {format}")]
    UnsupportedSampleFormat {
        format: String,
    },

    /// Any other backend failure.
    #[error("audio backend error: {message}")]
    Backend {
        message: String,
    },
}

impl InitializationError {
    /// Creates a generic backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
