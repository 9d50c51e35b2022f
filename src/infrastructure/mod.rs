//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: cpal capture, the
//! built-in WAV and FLAC codecs, and the TOML config file.

pub mod capture;
pub mod codec;
pub mod config;

// Re-export adapters
pub use capture::{CpalCapture, CpalSource};
pub use codec::{BuiltinCodecs, FlacCodec, WavCodec};
pub use config::XdgConfigStore;
