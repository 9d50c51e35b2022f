//! Streaming accumulator for captured audio
//!
//! Frames are kept as the chunks they arrived in. Concatenation only happens
//! when the recording is exported.

use thiserror::Error;

use super::frame::AudioFrame;

/// Error when a frame cannot be appended
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Frame has {actual} channels, accumulator expects {expected}")]
pub struct ChannelMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Per-channel chunk lists plus the running sample count.
///
/// Invariant: every channel's chunk lengths sum to `rec_length`.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    channels: Vec<Vec<Vec<f32>>>,
    rec_length: usize,
}

impl Accumulator {
    /// Create an empty accumulator for `num_channels` channels
    pub fn new(num_channels: u16) -> Self {
        Self {
            channels: vec![Vec::new(); num_channels as usize],
            rec_length: 0,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples recorded per channel
    pub fn rec_length(&self) -> usize {
        self.rec_length
    }

    pub fn is_empty(&self) -> bool {
        self.rec_length == 0
    }

    /// Number of chunks held for each channel
    pub fn chunk_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Recorded duration in seconds at the given sample rate
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.rec_length as f64 / f64::from(sample_rate)
    }

    /// Append one frame, moving its chunks in without copying
    pub fn push(&mut self, frame: AudioFrame) -> Result<(), ChannelMismatch> {
        if frame.num_channels() != self.channels.len() {
            return Err(ChannelMismatch {
                expected: self.channels.len(),
                actual: frame.num_channels(),
            });
        }

        self.rec_length += frame.len();
        for (channel, chunk) in self.channels.iter_mut().zip(frame.into_channels()) {
            channel.push(chunk);
        }
        Ok(())
    }

    /// Concatenate the chunks of one channel into a contiguous sequence
    pub fn merge_channel(&self, channel: usize) -> Vec<f32> {
        let mut merged = Vec::with_capacity(self.rec_length);
        if let Some(chunks) = self.channels.get(channel) {
            for chunk in chunks {
                merged.extend_from_slice(chunk);
            }
        }
        merged
    }

    /// Concatenate every channel
    pub fn merge(&self) -> Vec<Vec<f32>> {
        (0..self.channels.len())
            .map(|channel| self.merge_channel(channel))
            .collect()
    }

    /// Drop all buffered audio, keeping the channel layout
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
        self.rec_length = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(left: &[f32], right: &[f32]) -> AudioFrame {
        AudioFrame::new(vec![left.to_vec(), right.to_vec()]).unwrap()
    }

    #[test]
    fn new_accumulator_is_empty() {
        let acc = Accumulator::new(2);
        assert!(acc.is_empty());
        assert_eq!(acc.num_channels(), 2);
        assert_eq!(acc.merge(), vec![Vec::<f32>::new(), Vec::new()]);
    }

    #[test]
    fn rec_length_is_sum_of_chunk_lengths() {
        let mut acc = Accumulator::new(2);
        acc.push(frame(&[0.1, 0.2, 0.3], &[1.1, 1.2, 1.3])).unwrap();
        acc.push(frame(&[0.4], &[1.4])).unwrap();
        acc.push(frame(&[0.5, 0.6], &[1.5, 1.6])).unwrap();

        assert_eq!(acc.rec_length(), 6);
        assert_eq!(acc.chunk_count(), 3);
        for merged in acc.merge() {
            assert_eq!(merged.len(), acc.rec_length());
        }
    }

    #[test]
    fn merge_preserves_arrival_order() {
        let mut acc = Accumulator::new(2);
        acc.push(frame(&[1.0, 2.0], &[-1.0, -2.0])).unwrap();
        acc.push(frame(&[3.0], &[-3.0])).unwrap();

        assert_eq!(acc.merge_channel(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(acc.merge_channel(1), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn channel_mismatch_leaves_state_untouched() {
        let mut acc = Accumulator::new(2);
        acc.push(frame(&[1.0], &[2.0])).unwrap();

        let mono = AudioFrame::new(vec![vec![0.5, 0.5]]).unwrap();
        let err = acc.push(mono).unwrap_err();
        assert_eq!(err, ChannelMismatch { expected: 2, actual: 1 });
        assert_eq!(acc.rec_length(), 1);
    }

    #[test]
    fn clear_resets_length_and_chunks() {
        let mut acc = Accumulator::new(1);
        acc.push(AudioFrame::new(vec![vec![0.0; 128]]).unwrap()).unwrap();
        acc.clear();
        assert!(acc.is_empty());
        assert_eq!(acc.chunk_count(), 0);
        assert_eq!(acc.num_channels(), 1);
    }

    #[test]
    fn duration_from_sample_count() {
        let mut acc = Accumulator::new(1);
        acc.push(AudioFrame::new(vec![vec![0.0; 22050]]).unwrap()).unwrap();
        assert_eq!(acc.duration_secs(44100), 0.5);
        assert_eq!(acc.duration_secs(0), 0.0);
    }
}
