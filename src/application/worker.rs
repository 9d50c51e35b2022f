//! Encoder worker
//!
//! An isolated tokio task that owns the accumulator and codec of one
//! recording session. It is reached only through its ordered command queue
//! and reports back through its event queue.

use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::config::RecorderOptions;
use crate::domain::encoding::{EncodedArtifact, Encoding};
use crate::domain::recording::{Accumulator, AudioFrame, StreamFormat};

use super::ports::{AudioCodec, CodecError, FrameSink};
use super::protocol::{WorkerCommand, WorkerEvent};

/// Owning handle of a running encoder worker.
///
/// Dropping the handle terminates the worker: its task is aborted and its
/// events are discarded. An encode already running on the blocking pool
/// finishes, but its result is never delivered.
pub struct WorkerHandle {
    encoding: Encoding,
    commands: UnboundedSender<WorkerCommand>,
    events: UnboundedReceiver<WorkerEvent>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn a worker on the current tokio runtime
    pub fn spawn(codec: Arc<dyn AudioCodec>) -> Self {
        let encoding = codec.encoding();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let worker = EncoderWorker::new(codec, event_tx);
        let task = tokio::spawn(worker.run(command_rx));

        debug!(%encoding, "Encoder worker spawned");
        Self {
            encoding,
            commands,
            events,
            task,
        }
    }

    /// Encoding produced by this worker
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Queue a command. Returns false if the worker has stopped.
    pub fn send(&self, command: WorkerCommand) -> bool {
        let tag = command.tag();
        let sent = self.commands.send(command).is_ok();
        if !sent {
            warn!(command = tag, "Encoder worker is gone, command dropped");
        }
        sent
    }

    /// Delivery end for a capture source
    pub fn frame_sink(&self) -> FrameSink {
        FrameSink::new(self.commands.clone())
    }

    /// Stop accepting commands. Once outstanding frame sinks are gone the
    /// worker drains its queue and the event stream ends.
    pub fn close(&mut self) {
        let (closed, _) = mpsc::unbounded_channel();
        self.commands = closed;
    }

    /// Wait for the next event
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        self.events.recv().await
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// State owned by one worker task
struct EncoderWorker {
    codec: Arc<dyn AudioCodec>,
    events: UnboundedSender<WorkerEvent>,
    format: Option<StreamFormat>,
    options: RecorderOptions,
    accumulator: Accumulator,
    recording: bool,
    timed_out: bool,
}

impl EncoderWorker {
    fn new(codec: Arc<dyn AudioCodec>, events: UnboundedSender<WorkerEvent>) -> Self {
        Self {
            codec,
            events,
            format: None,
            options: RecorderOptions::defaults(),
            accumulator: Accumulator::default(),
            recording: false,
            timed_out: false,
        }
    }

    async fn run(mut self, mut commands: UnboundedReceiver<WorkerCommand>) {
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        debug!("Encoder worker command queue closed");
    }

    async fn handle(&mut self, command: WorkerCommand) {
        match command {
            WorkerCommand::Init { config, options } => self.init(config, options),
            WorkerCommand::Options { options } => self.set_options(options),
            WorkerCommand::Start { buffer_size } => self.start(buffer_size),
            WorkerCommand::Record { buffer } => self.record(buffer),
            WorkerCommand::Cancel => self.cancel(),
            WorkerCommand::Finish => self.finish().await,
        }
    }

    fn emit(&self, event: WorkerEvent) {
        // The receiver disappears when the recorder replaced this worker
        let _ = self.events.send(event);
    }

    fn init(&mut self, format: StreamFormat, options: RecorderOptions) {
        self.format = Some(format);
        self.options = RecorderOptions::defaults().merge(options);
        self.accumulator = Accumulator::new(format.num_channels);
        self.recording = false;
        self.timed_out = false;

        info!(
            encoding = %self.codec.encoding(),
            sample_rate = format.sample_rate,
            channels = format.num_channels,
            "Encoder loaded"
        );
        self.emit(WorkerEvent::Loaded);
    }

    fn set_options(&mut self, options: RecorderOptions) {
        if self.recording {
            warn!("Options changed while recording, ignored");
            return;
        }
        self.options = RecorderOptions::defaults().merge(options);
    }

    fn start(&mut self, buffer_size: usize) {
        if self.format.is_none() {
            warn!("Start before init, ignored");
            return;
        }
        if self.recording {
            debug!("Already recording, start ignored");
            return;
        }

        self.accumulator.clear();
        self.recording = true;
        self.timed_out = false;
        debug!(buffer_size, "Recording started");
    }

    fn record(&mut self, frame: AudioFrame) {
        let Some(format) = self.format else {
            debug!("Frame before init, dropped");
            return;
        };
        if !self.recording {
            debug!("Frame outside a recording, dropped");
            return;
        }
        if self.timed_out {
            debug!("Frame after time limit, dropped");
            return;
        }

        if let Err(e) = self.accumulator.push(frame) {
            warn!("Frame rejected: {}", e);
            return;
        }

        let limit = self.options.time_limit_or_default();
        if time_limit_reached(self.accumulator.rec_length(), format.sample_rate, limit.as_millis()) {
            self.timed_out = true;
            info!(limit = %limit, "Recording time limit reached");
            self.emit(WorkerEvent::Timeout);
        }
    }

    fn cancel(&mut self) {
        self.recording = false;
        self.timed_out = false;
        self.accumulator.clear();
        debug!("Recording discarded");
    }

    async fn finish(&mut self) {
        let Some(format) = self.format else {
            warn!("Finish before init, ignored");
            return;
        };
        if !self.recording {
            debug!("Finish outside a recording, ignored");
            return;
        }
        self.recording = false;
        self.timed_out = false;

        let recording = std::mem::replace(&mut self.accumulator, Accumulator::new(format.num_channels));
        if !self.options.encode_after_record_or_default() {
            info!("Encoding after record disabled, recording discarded");
            return;
        }

        let codec = Arc::clone(&self.codec);
        let mime_type = self.options.mime_type_for(codec.encoding()).to_string();
        let mut throttle = ProgressThrottle::new(self.options.progress_interval_or_default());
        let events = self.events.clone();

        info!(
            samples = recording.rec_length(),
            encoding = %codec.encoding(),
            "Encoding recording"
        );

        // Encoding is CPU-bound, keep it off the async workers
        let result = tokio::task::spawn_blocking(move || {
            let mut report = |percent: f64| {
                if let Some(progress) = throttle.offer(percent) {
                    let _ = events.send(WorkerEvent::Progress { progress });
                }
            };
            codec.encode(&recording, format, &mut report)
        })
        .await
        .unwrap_or_else(|e| Err(CodecError::Encode(format!("Encode task error: {}", e))));

        match result {
            Ok(bytes) => {
                let artifact = EncodedArtifact::new(bytes, mime_type);
                info!(size = %artifact.human_readable_size(), "Encoding complete");
                self.emit(WorkerEvent::Complete { blob: artifact });
            }
            Err(e) => {
                error!("Encoding failed: {}", e);
                self.emit(WorkerEvent::Failed {
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Whether `rec_length` samples at `sample_rate` last at least `limit_ms`
fn time_limit_reached(rec_length: usize, sample_rate: u32, limit_ms: u64) -> bool {
    if sample_rate == 0 {
        return false;
    }
    rec_length as u128 * 1000 >= u128::from(limit_ms) * u128::from(sample_rate)
}

/// Rate limiter for progress reports.
///
/// Passes at most one report per interval and never lets the reported
/// percentage go down.
struct ProgressThrottle {
    interval: StdDuration,
    last_emit: Instant,
    last_percent: f64,
}

impl ProgressThrottle {
    fn new(interval: StdDuration) -> Self {
        Self {
            interval,
            last_emit: Instant::now(),
            last_percent: 0.0,
        }
    }

    fn offer(&mut self, percent: f64) -> Option<f64> {
        let percent = percent.clamp(0.0, 100.0);
        if percent < self.last_percent || self.last_emit.elapsed() < self.interval {
            return None;
        }
        self.last_emit = Instant::now();
        self.last_percent = percent;
        Some(percent)
    }
}
