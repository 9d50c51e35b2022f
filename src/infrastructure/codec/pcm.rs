//! Float to 16-bit PCM conversion shared by the codecs

use crate::application::ports::CodecError;
use crate::domain::recording::{Accumulator, StreamFormat};

/// Bits per output sample
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per output sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Merge the recording into contiguous channels, checking it against the
/// declared stream format
pub fn merge_checked(
    recording: &Accumulator,
    format: StreamFormat,
) -> Result<Vec<Vec<f32>>, CodecError> {
    let expected = usize::from(format.num_channels);
    if recording.num_channels() != expected {
        return Err(CodecError::ChannelMismatch {
            expected,
            actual: recording.num_channels(),
        });
    }
    Ok(recording.merge())
}

/// Interleave equal-length channels: `[c0[0], c1[0], .., c0[1], c1[1], ..]`
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.first().map_or(0, Vec::len);
    let mut interleaved = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for channel in channels {
            interleaved.push(channel[i]);
        }
    }
    interleaved
}

/// Quantize one float sample to signed 16-bit.
///
/// Input is clamped to [-1, 1]. Negative values scale by 32768, the rest by
/// 32767, and the result truncates toward zero.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::AudioFrame;

    #[test]
    fn interleave_two_channels() {
        let channels = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(interleave(&channels), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn interleave_keeps_every_channel() {
        let channels = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        assert_eq!(interleave(&channels), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn interleave_mono_and_empty() {
        assert_eq!(interleave(&[vec![0.1, 0.2]]), vec![0.1, 0.2]);
        assert!(interleave(&[]).is_empty());
        assert!(interleave(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn quantize_extremes() {
        assert_eq!(quantize_sample(1.0), 32767);
        assert_eq!(quantize_sample(-1.0), -32768);
        assert_eq!(quantize_sample(0.0), 0);
    }

    #[test]
    fn quantize_clamps_and_truncates() {
        assert_eq!(quantize_sample(2.5), 32767);
        assert_eq!(quantize_sample(-7.0), -32768);
        assert_eq!(quantize_sample(0.5), 16383);
        assert_eq!(quantize_sample(-0.5), -16384);
        assert_eq!(quantize_sample(f32::NAN), 0);
    }

    #[test]
    fn merge_checked_rejects_other_layout() {
        let mut acc = Accumulator::new(2);
        acc.push(AudioFrame::new(vec![vec![0.1], vec![0.2]]).unwrap())
            .unwrap();

        let err = merge_checked(&acc, StreamFormat::new(8000, 1)).unwrap_err();
        assert_eq!(
            err,
            CodecError::ChannelMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(
            merge_checked(&acc, StreamFormat::new(8000, 2)).unwrap(),
            vec![vec![0.1], vec![0.2]]
        );
    }
}
