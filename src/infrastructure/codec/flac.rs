//! FLAC codec
//!
//! Lossless output at the capture rate and channel count, 16-bit samples.
//! flacenc works on whole in-memory sources, so progress is reported once
//! the samples are quantized and again when the stream is written.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;

use crate::application::ports::{AudioCodec, CodecError, EncodeProgress};
use crate::domain::encoding::Encoding;
use crate::domain::recording::{Accumulator, StreamFormat};

use super::pcm::{self, BITS_PER_SAMPLE};

/// Channel limit of the FLAC format
pub const MAX_CHANNELS: u16 = 8;

/// Share of the work done once samples are quantized
const QUANTIZED_PERCENT: f64 = 20.0;

/// 16-bit FLAC codec backed by flacenc
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacCodec;

impl FlacCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for FlacCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Flac
    }

    fn encode(
        &self,
        recording: &Accumulator,
        format: StreamFormat,
        progress: EncodeProgress<'_>,
    ) -> Result<Vec<u8>, CodecError> {
        if format.num_channels == 0 || format.num_channels > MAX_CHANNELS {
            return Err(CodecError::Unsupported(format!(
                "FLAC supports 1 to {} channels, got {}",
                MAX_CHANNELS, format.num_channels
            )));
        }

        let channels = pcm::merge_checked(recording, format)?;
        if recording.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        // flacenc takes i32 samples
        let samples: Vec<i32> = pcm::interleave(&channels)
            .into_iter()
            .map(|s| i32::from(pcm::quantize_sample(s)))
            .collect();
        drop(channels);
        progress(QUANTIZED_PERCENT);

        let config = config::Encoder::default()
            .into_verified()
            .map_err(|(_, e)| CodecError::Encode(format!("FLAC config error: {:?}", e)))?;

        let source = MemSource::from_samples(
            &samples,
            usize::from(format.num_channels),
            usize::from(BITS_PER_SAMPLE),
            format.sample_rate as usize,
        );

        let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;

        let mut sink = ByteSink::new();
        stream
            .write(&mut sink)
            .map_err(|e| CodecError::Encode(format!("FLAC write failed: {}", e)))?;

        progress(100.0);
        Ok(sink.into_inner())
    }
}
