//! Encoding domain module

mod artifact;
mod format;

pub use artifact::EncodedArtifact;
pub use format::Encoding;
