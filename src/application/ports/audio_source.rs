//! Capture source port interfaces

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::application::protocol::WorkerCommand;
use crate::domain::recording::AudioFrame;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Failed to open capture stream: {0}")]
    OpenFailed(String),

    #[error("Capture stream failed: {0}")]
    StreamFailed(String),
}

/// Delivery end handed to a capture source.
///
/// Each delivered frame becomes a `record` command on the encoder worker's
/// queue, behind every command the controller sent before opening the source.
#[derive(Debug, Clone)]
pub struct FrameSink {
    commands: UnboundedSender<WorkerCommand>,
}

impl FrameSink {
    pub(crate) fn new(commands: UnboundedSender<WorkerCommand>) -> Self {
        Self { commands }
    }

    /// Queue one frame for the worker.
    ///
    /// Returns false once the worker is gone; the source may stop delivering.
    pub fn deliver(&self, frame: AudioFrame) -> bool {
        self.commands
            .send(WorkerCommand::Record { buffer: frame })
            .is_ok()
    }
}

/// Port for a live multi-channel audio source
pub trait AudioSource {
    /// Guard owning the running capture. Dropping it stops delivery and
    /// releases every resource the capture holds.
    type Capture;

    /// Sample rate of the frames this source delivers
    fn sample_rate(&self) -> u32;

    /// Start delivering frames of `buffer_size` samples per channel.
    ///
    /// # Arguments
    /// * `num_channels` - Channels per delivered frame
    /// * `buffer_size` - Samples per channel in each frame
    /// * `sink` - Where frames are delivered
    fn open(
        &mut self,
        num_channels: u16,
        buffer_size: usize,
        sink: FrameSink,
    ) -> Result<Self::Capture, CaptureError>;
}
