//! RIFF/WAVE codec
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | `RIFF` |
//! | 4 | 4 | 36 + data bytes |
//! | 8 | 4 | `WAVE` |
//! | 12 | 4 | `fmt ` |
//! | 16 | 4 | 16 |
//! | 20 | 2 | 1 (PCM) |
//! | 22 | 2 | channels |
//! | 24 | 4 | sample rate |
//! | 28 | 4 | byte rate |
//! | 32 | 2 | block align |
//! | 34 | 2 | bits per sample |
//! | 36 | 4 | `data` |
//! | 40 | 4 | data bytes |
//! | 44 | .. | interleaved i16 samples |

use crate::application::ports::{AudioCodec, CodecError, EncodeProgress};
use crate::domain::encoding::Encoding;
use crate::domain::recording::{Accumulator, StreamFormat};

use super::pcm::{self, BITS_PER_SAMPLE, BYTES_PER_SAMPLE};

/// Size of the canonical header
pub const HEADER_LEN: usize = 44;

/// Samples written between progress reports
const PROGRESS_BLOCK: usize = 64 * 1024;

/// 16-bit PCM WAV codec
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for WavCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Wav
    }

    fn encode(
        &self,
        recording: &Accumulator,
        format: StreamFormat,
        progress: EncodeProgress<'_>,
    ) -> Result<Vec<u8>, CodecError> {
        let channels = pcm::merge_checked(recording, format)?;
        let samples = pcm::interleave(&channels);
        drop(channels);

        let data_len = samples
            .len()
            .checked_mul(BYTES_PER_SAMPLE)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| n.checked_add(36).is_some())
            .ok_or(CodecError::TooLarge)?;

        let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
        write_header(&mut out, format, data_len)?;

        let total = samples.len();
        let mut written = 0;
        for block in samples.chunks(PROGRESS_BLOCK) {
            for &sample in block {
                out.extend_from_slice(&pcm::quantize_sample(sample).to_le_bytes());
            }
            written += block.len();
            progress(written as f64 * 100.0 / total as f64);
        }
        if total == 0 {
            progress(100.0);
        }

        Ok(out)
    }
}

/// Write the 44-byte header for `data_len` bytes of samples
fn write_header(out: &mut Vec<u8>, format: StreamFormat, data_len: u32) -> Result<(), CodecError> {
    let block_align = format
        .num_channels
        .checked_mul(BYTES_PER_SAMPLE as u16)
        .ok_or_else(|| unsupported(format))?;
    let byte_rate = format
        .sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| unsupported(format))?;

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&format.num_channels.to_le_bytes());
    out.extend_from_slice(&format.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    Ok(())
}

fn unsupported(format: StreamFormat) -> CodecError {
    CodecError::Unsupported(format!(
        "{} channels at {} Hz",
        format.num_channels, format.sample_rate
    ))
}
