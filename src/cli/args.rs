//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::encoding::Encoding;

/// audio-capture - record the default input device to WAV or FLAC
#[derive(Parser, Debug)]
#[command(name = "audio-capture")]
#[command(version)]
#[command(about = "Record live multi-channel audio and encode it to WAV or FLAC")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording time limit (e.g., 30s, 5m, 1h30m)
    #[arg(short = 't', long, value_name = "TIME", global = true)]
    pub time_limit: Option<String>,

    /// Number of channels to record
    #[arg(short = 'c', long, value_name = "N", global = true)]
    pub channels: Option<u16>,

    /// Output encoding
    #[arg(short = 'e', long, value_name = "ENCODING", global = true)]
    pub encoding: Option<EncodingArg>,

    /// Output file (defaults to <output_dir>/recording-<timestamp>.<ext>)
    #[arg(short = 'o', long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Lift the 20 minute cap (time limit becomes up to 3 hours)
    #[arg(long, global = true)]
    pub no_limit: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the default input device (default)
    Record,
    /// Run JSON-lines worker commands through an encoder worker
    Replay {
        /// File with one command per line ("-" for stdin)
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Encoding argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    Wav,
    Flac,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Wav => Encoding::Wav,
            EncodingArg::Flac => Encoding::Flac,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "time_limit",
    "limit_removed",
    "encoding",
    "channels",
    "encode_after_record",
    "progress_interval_ms",
    "buffer_size",
    "output_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
