//! Default input device capture using cpal
//!
//! cpal streams are not `Send`, so each capture owns a dedicated thread that
//! builds the stream, keeps it alive and drops it when the capture guard is
//! released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tracing::{debug, error, info, warn};

use super::frames::FrameAssembler;
use crate::application::ports::{AudioSource, CaptureError, FrameSink};

/// How often the capture thread checks for the stop signal
const STOP_POLL_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// Capture source reading the host's default input device
#[derive(Debug)]
pub struct CpalSource {
    device_name: String,
    sample_rate: u32,
}

impl CpalSource {
    /// Probe the default input device
    pub fn new() -> Result<Self, CaptureError> {
        let device = get_input_device()?;
        let config = device
            .default_input_config()
            .map_err(|e| CaptureError::OpenFailed(format!("Failed to get config: {}", e)))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        debug!(
            device = %device_name,
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "Default input device"
        );
        Ok(Self {
            device_name,
            sample_rate: config.sample_rate().0,
        })
    }

    /// Name of the probed device
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl AudioSource for CpalSource {
    type Capture = CpalCapture;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn open(
        &mut self,
        num_channels: u16,
        buffer_size: usize,
        sink: FrameSink,
    ) -> Result<CpalCapture, CaptureError> {
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        let stop_flag = Arc::clone(&stop);
        let sample_rate = self.sample_rate;

        let thread = std::thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                let stream = match build_stream(sample_rate, num_channels, buffer_size, sink) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                while !stop_flag.load(Ordering::SeqCst) {
                    std::thread::park_timeout(STOP_POLL_INTERVAL);
                }
                drop(stream);
                debug!("Capture stream closed");
            })
            .map_err(|e| CaptureError::OpenFailed(format!("Failed to spawn capture thread: {}", e)))?;

        let ready = ready_rx
            .recv()
            .map_err(|_| CaptureError::OpenFailed("Capture thread exited".to_string()))
            .and_then(|result| result);

        let capture = CpalCapture {
            stop,
            thread: Some(thread),
        };
        // Dropping the guard joins the thread on failure too
        ready.map(|()| capture)
    }
}

/// Running capture. Dropping it stops the stream and joins its thread.
pub struct CpalCapture {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            if thread.join().is_err() {
                warn!("Capture thread panicked");
            }
        }
    }
}

/// Get the default input device
fn get_input_device() -> Result<cpal::Device, CaptureError> {
    let host = cpal::default_host();
    host.default_input_device().ok_or(CaptureError::NoAudioDevice)
}

/// Build and start an input stream feeding `sink`
fn build_stream(
    sample_rate: u32,
    num_channels: u16,
    buffer_size: usize,
    sink: FrameSink,
) -> Result<cpal::Stream, CaptureError> {
    let device = get_input_device()?;
    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::OpenFailed(format!("Failed to get config: {}", e)))?;

    if supported.sample_rate().0 != sample_rate {
        return Err(CaptureError::OpenFailed(format!(
            "Device sample rate changed from {} to {} Hz",
            sample_rate,
            supported.sample_rate().0
        )));
    }

    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();
    let mut assembler = FrameAssembler::new(num_channels, config.channels, buffer_size);
    let on_error = |err: cpal::StreamError| error!("Audio stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                assembler.push(data, |frame| {
                    sink.deliver(frame);
                });
            },
            on_error,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                assembler.push_i16(data, |frame| {
                    sink.deliver(frame);
                });
            },
            on_error,
            None,
        ),
        other => {
            return Err(CaptureError::OpenFailed(format!(
                "Unsupported sample format {:?}",
                other
            )))
        }
    }
    .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

    stream
        .play()
        .map_err(|e| CaptureError::StreamFailed(e.to_string()))?;

    info!(
        sample_rate,
        device_channels = config.channels,
        channels = num_channels,
        "Capture stream started"
    );
    Ok(stream)
}
