//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_source;
pub mod codec;
pub mod config;

// Re-export common types
pub use audio_source::{AudioSource, CaptureError, FrameSink};
pub use codec::{AudioCodec, CodecError, CodecProvider, EncodeProgress};
pub use config::ConfigStore;
