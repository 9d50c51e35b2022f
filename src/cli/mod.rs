//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging and signal setup,
//! and the record and replay runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;
pub mod replay;
pub mod signals;

// Re-export commonly used types
pub use app::{run_record, RecordOptions, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, EncodingArg};
pub use presenter::Presenter;
pub use replay::{run_replay, ReplayOptions};
