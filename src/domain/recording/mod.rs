//! Recording domain: captured frames, their accumulation, and time limits

pub mod accumulator;
pub mod duration;
pub mod frame;

pub use accumulator::{Accumulator, ChannelMismatch};
pub use duration::Duration;
pub use frame::{AudioFrame, FrameError, StreamFormat};
