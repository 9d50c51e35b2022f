//! audio-capture - live multi-channel audio capture and encoding
//!
//! Captures frames from an input device, accumulates them in an isolated
//! encoder worker and encodes the recording to a bit-exact 16-bit PCM WAV
//! file (or FLAC) while reporting progress.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (frames, durations, options), the streaming
//!   accumulator and the recorder session state machine
//! - **Application**: The recorder controller, the encoder worker, their
//!   message protocol, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, WAV/FLAC codecs, TOML config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
