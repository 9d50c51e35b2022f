//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder controller, the encoder worker it drives, the
//! message protocol between them, and the traits for capture and codecs.

pub mod ports;
pub mod protocol;
pub mod recorder;
pub mod worker;

// Re-export use cases
pub use protocol::{ProtocolError, WorkerCommand, WorkerEvent};
pub use recorder::{Recorder, RecorderError, RecorderEvent};
pub use worker::WorkerHandle;
