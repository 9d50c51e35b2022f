//! Frame assembly for interleaved device callbacks
//!
//! Device callbacks hand over interleaved blocks of whatever size the driver
//! picked. The assembler splits them into per-channel chunks of exactly
//! `buffer_size` samples, mapping device channels onto the requested layout.

use crate::domain::recording::AudioFrame;

/// Turns interleaved device blocks into fixed-size frames
#[derive(Debug)]
pub struct FrameAssembler {
    device_channels: usize,
    buffer_size: usize,
    pending: Vec<Vec<f32>>,
}

impl FrameAssembler {
    /// Create an assembler.
    ///
    /// Output channel `c` reads device channel `min(c, device_channels - 1)`,
    /// so a mono device fills every requested channel.
    pub fn new(num_channels: u16, device_channels: u16, buffer_size: usize) -> Self {
        Self {
            device_channels: usize::from(device_channels.max(1)),
            buffer_size: buffer_size.max(1),
            pending: (0..num_channels)
                .map(|_| Vec::with_capacity(buffer_size))
                .collect(),
        }
    }

    /// Feed one interleaved device block, calling `emit` for every frame
    /// that fills up
    pub fn push<F>(&mut self, data: &[f32], mut emit: F)
    where
        F: FnMut(AudioFrame),
    {
        if self.pending.is_empty() {
            return;
        }

        for device_frame in data.chunks_exact(self.device_channels) {
            for (c, channel) in self.pending.iter_mut().enumerate() {
                channel.push(device_frame[c.min(self.device_channels - 1)]);
            }

            if self.pending[0].len() == self.buffer_size {
                let channels = self
                    .pending
                    .iter_mut()
                    .map(|channel| std::mem::replace(channel, Vec::with_capacity(self.buffer_size)))
                    .collect();
                if let Ok(frame) = AudioFrame::new(channels) {
                    emit(frame);
                }
            }
        }
    }

    /// Feed one interleaved block of 16-bit samples
    pub fn push_i16<F>(&mut self, data: &[i16], emit: F)
    where
        F: FnMut(AudioFrame),
    {
        let converted: Vec<f32> = data.iter().map(|&s| f32::from(s) / 32768.0).collect();
        self.push(&converted, emit);
    }

    /// Samples per channel waiting for the next frame
    pub fn pending_len(&self) -> usize {
        self.pending.first().map_or(0, Vec::len)
    }
}
