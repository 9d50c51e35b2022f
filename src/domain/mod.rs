//! Domain layer - Core recording logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod encoding;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::{AppConfig, RecorderConfig, RecorderOptions};
pub use encoding::{EncodedArtifact, Encoding};
pub use error::*;
pub use recording::{Accumulator, AudioFrame, Duration, StreamFormat};
pub use session::{RecorderSession, SessionState};
