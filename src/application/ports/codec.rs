//! Codec port interfaces

use std::sync::Arc;

use thiserror::Error;

use crate::domain::encoding::Encoding;
use crate::domain::recording::{Accumulator, StreamFormat};

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("No audio was recorded")]
    EmptyInput,

    #[error("Recording has {actual} channels but the stream format declares {expected}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Recording is too large for the container format")]
    TooLarge,

    #[error("Unsupported stream format: {0}")]
    Unsupported(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Progress callback used while encoding.
/// Receives the completed share of the work in percent (0-100).
pub type EncodeProgress<'a> = &'a mut dyn FnMut(f64);

/// Port for turning accumulated float samples into a container byte stream
pub trait AudioCodec: Send + Sync {
    /// The encoding this codec produces
    fn encoding(&self) -> Encoding;

    /// Encode everything held by the accumulator.
    ///
    /// # Arguments
    /// * `recording` - Per-channel chunks captured so far
    /// * `format` - Sample rate and channel count written to the container
    /// * `progress` - Called with the completed percentage as work proceeds
    fn encode(
        &self,
        recording: &Accumulator,
        format: StreamFormat,
        progress: EncodeProgress<'_>,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Port for looking up the codec of an encoding
pub trait CodecProvider {
    fn codec(&self, encoding: Encoding) -> Arc<dyn AudioCodec>;
}
