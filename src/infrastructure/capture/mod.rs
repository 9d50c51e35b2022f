//! Capture infrastructure module
//!
//! Live input through cpal, assembled into fixed-size multi-channel frames.

mod cpal_source;
mod frames;

pub use cpal_source::{CpalCapture, CpalSource};
pub use frames::FrameAssembler;
