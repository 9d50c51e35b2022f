//! Recorder controller use case

use std::collections::VecDeque;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::config::{RecorderConfig, RecorderOptions};
use crate::domain::encoding::{EncodedArtifact, Encoding};
use crate::domain::error::ConfigError;
use crate::domain::recording::StreamFormat;
use crate::domain::session::{RecorderSession, SessionState};

use super::ports::{AudioSource, CaptureError, CodecProvider};
use super::protocol::{WorkerCommand, WorkerEvent};
use super::worker::WorkerHandle;

/// Errors from the recorder controller
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Events surfaced to the recorder's caller
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    /// A worker for this encoding is being set up
    EncoderLoading(Encoding),
    /// The worker finished initializing
    EncoderLoaded(Encoding),
    /// Recorded duration reached the time limit. The caller should finish
    /// or cancel the recording.
    Timeout,
    /// Encoding progress in percent
    EncodingProgress(f64),
    /// The encoded recording
    Complete(EncodedArtifact),
    /// The in-flight encode was discarded
    EncodingCanceled,
    /// The codec could not produce an artifact
    EncodingFailed(String),
}

/// Drives a capture source and one encoder worker through the
/// record/finish/encode lifecycle.
pub struct Recorder<S, C>
where
    S: AudioSource,
    C: CodecProvider,
{
    source: S,
    codecs: C,
    config: RecorderConfig,
    session: RecorderSession,
    worker: WorkerHandle,
    capture: Option<S::Capture>,
    pending: VecDeque<RecorderEvent>,
    started_at: Option<Instant>,
}

impl<S, C> Recorder<S, C>
where
    S: AudioSource,
    C: CodecProvider,
{
    /// Validate the configuration and spawn the first worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn configure(source: S, codecs: C, config: RecorderConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let worker = WorkerHandle::spawn(codecs.codec(config.encoding));
        let mut recorder = Self {
            source,
            codecs,
            config,
            session: RecorderSession::new(),
            worker,
            capture: None,
            pending: VecDeque::new(),
            started_at: None,
        };
        recorder.init_worker();
        Ok(recorder)
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    /// Encoding of the active worker
    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    /// Options currently in effect
    pub fn options(&self) -> &RecorderOptions {
        &self.config.options
    }

    /// Wall-clock time since the recording started, while recording
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|started| started.elapsed())
    }

    /// Switch to another encoding.
    ///
    /// Ignored while recording or when unchanged. Any encode in flight is
    /// discarded along with the old worker and reported as canceled.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        if self.session.is_recording() {
            debug!(%encoding, "Encoding change while recording, ignored");
            return;
        }
        if encoding == self.config.encoding {
            return;
        }

        info!(from = %self.config.encoding, to = %encoding, "Switching encoding");
        if self.session.is_finishing() {
            let _ = self.session.abandon_encoding();
            self.pending.push_back(RecorderEvent::EncodingCanceled);
        }
        self.config.encoding = encoding;
        self.replace_worker();
    }

    /// Merge an options update into the current options.
    ///
    /// Ignored while recording.
    pub fn set_options(&mut self, update: RecorderOptions) -> Result<(), ConfigError> {
        if self.session.is_recording() {
            debug!("Options change while recording, ignored");
            return Ok(());
        }

        let merged = self.config.options.clone().merge(update);
        merged.validate()?;
        self.config.options = merged.clone();
        self.worker.send(WorkerCommand::Options { options: merged });
        Ok(())
    }

    /// Open the capture source and start feeding the worker.
    ///
    /// Ignored unless idle. On capture failure the recorder stays idle.
    pub fn start_recording(&mut self) -> Result<(), RecorderError> {
        if let Err(e) = self.session.start_recording() {
            debug!("{}", e);
            return Ok(());
        }

        let buffer_size = self.config.options.buffer_size_or_default();
        // Start goes first so no frame arrives before the worker accepts them
        self.worker.send(WorkerCommand::Start { buffer_size });

        match self
            .source
            .open(self.config.num_channels, buffer_size, self.worker.frame_sink())
        {
            Ok(capture) => {
                self.capture = Some(capture);
                self.started_at = Some(Instant::now());
                info!(
                    channels = self.config.num_channels,
                    buffer_size, "Recording started"
                );
                Ok(())
            }
            Err(e) => {
                self.worker.send(WorkerCommand::Cancel);
                let _ = self.session.cancel_recording();
                Err(e.into())
            }
        }
    }

    /// Stop capturing and discard the recording
    pub fn cancel_recording(&mut self) {
        if let Err(e) = self.session.cancel_recording() {
            debug!("{}", e);
            return;
        }

        self.release_capture();
        self.worker.send(WorkerCommand::Cancel);
        info!("Recording canceled");
    }

    /// Stop capturing and hand the recording to the encoder
    pub fn finish_recording(&mut self) {
        if let Err(e) = self.session.finish_recording() {
            debug!("{}", e);
            return;
        }

        self.release_capture();
        self.worker.send(WorkerCommand::Finish);

        if self.config.options.encode_after_record_or_default() {
            info!("Recording finished, encoding");
        } else {
            // No artifact will follow
            let _ = self.session.abandon_encoding();
            info!("Recording finished without encoding");
        }
    }

    /// Drop the current encode by replacing the worker
    pub fn cancel_encoding(&mut self) {
        if !self.config.options.encode_after_record_or_default() {
            debug!("Encoding after record disabled, nothing to cancel");
            return;
        }
        if self.session.is_recording() {
            debug!("Cancel encoding while recording, ignored");
            return;
        }

        let _ = self.session.abandon_encoding();
        self.pending.push_back(RecorderEvent::EncodingCanceled);
        info!("Encoding canceled");
        self.replace_worker();
    }

    /// Wait for the next event.
    ///
    /// Returns `None` only if the worker stopped unexpectedly.
    pub async fn next_event(&mut self) -> Option<RecorderEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.worker.next_event().await?;
        Some(self.translate(event))
    }

    fn translate(&mut self, event: WorkerEvent) -> RecorderEvent {
        match event {
            WorkerEvent::Loaded => RecorderEvent::EncoderLoaded(self.worker.encoding()),
            WorkerEvent::Timeout => RecorderEvent::Timeout,
            WorkerEvent::Progress { progress } => RecorderEvent::EncodingProgress(progress),
            WorkerEvent::Complete { blob } => {
                if let Err(e) = self.session.complete_encoding() {
                    debug!("{}", e);
                }
                RecorderEvent::Complete(blob)
            }
            WorkerEvent::Failed { message } => {
                if let Err(e) = self.session.abandon_encoding() {
                    debug!("{}", e);
                }
                RecorderEvent::EncodingFailed(message)
            }
        }
    }

    fn release_capture(&mut self) {
        // Dropping the guard stops delivery
        self.capture = None;
        self.started_at = None;
    }

    fn replace_worker(&mut self) {
        self.worker = WorkerHandle::spawn(self.codecs.codec(self.config.encoding));
        self.init_worker();
    }

    fn init_worker(&mut self) {
        let format = StreamFormat::new(self.source.sample_rate(), self.config.num_channels);
        self.pending
            .push_back(RecorderEvent::EncoderLoading(self.worker.encoding()));
        self.worker.send(WorkerCommand::Init {
            config: format,
            options: self.config.options.clone(),
        });
    }
}
