//! Configuration value objects

mod app_config;
mod recorder_config;

pub use app_config::AppConfig;
pub use recorder_config::{
    FlacOptions, RecorderConfig, RecorderOptions, WavOptions, DEFAULT_BUFFER_SIZE,
    DEFAULT_NUM_CHANNELS, DEFAULT_PROGRESS_INTERVAL_MS,
};
