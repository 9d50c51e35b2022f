//! Audio frame and stream format value objects

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when a frame does not hold one equal-length chunk per channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Audio frame has no channels")]
    NoChannels,

    #[error("Audio frame channels differ in length: channel 0 has {expected} samples, channel {channel} has {actual}")]
    RaggedChannels {
        channel: usize,
        expected: usize,
        actual: usize,
    },
}

/// Sample rate and channel layout of a capture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub num_channels: u16,
}

impl StreamFormat {
    pub const fn new(sample_rate: u32, num_channels: u16) -> Self {
        Self {
            sample_rate,
            num_channels,
        }
    }
}

/// One arrival of captured audio: a chunk of 32-bit float samples per channel.
///
/// All chunks have the same length, checked on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct AudioFrame {
    channels: Vec<Vec<f32>>,
}

impl AudioFrame {
    /// Build a frame from per-channel chunks
    pub fn new(channels: Vec<Vec<f32>>) -> Result<Self, FrameError> {
        let expected = channels.first().ok_or(FrameError::NoChannels)?.len();
        if let Some((channel, chunk)) = channels
            .iter()
            .enumerate()
            .find(|(_, chunk)| chunk.len() != expected)
        {
            return Err(FrameError::RaggedChannels {
                channel,
                expected,
                actual: chunk.len(),
            });
        }
        Ok(Self { channels })
    }

    /// Number of channels in the frame
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the chunk of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Consume the frame, yielding its per-channel chunks
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

impl TryFrom<Vec<Vec<f32>>> for AudioFrame {
    type Error = FrameError;

    fn try_from(channels: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::new(channels)
    }
}

impl From<AudioFrame> for Vec<Vec<f32>> {
    fn from(frame: AudioFrame) -> Self {
        frame.channels
    }
}
