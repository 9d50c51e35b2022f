//! Recorder configuration and runtime options

use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::domain::encoding::Encoding;
use crate::domain::error::ConfigError;
use crate::domain::recording::duration::DEFAULT_TIME_LIMIT_SECS;
use crate::domain::recording::Duration;

/// Default encoding progress report interval
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1000;

/// Samples per channel in each delivered frame when no buffer size is set
pub const DEFAULT_BUFFER_SIZE: u32 = 4096;

/// Default number of recorded channels
pub const DEFAULT_NUM_CHANNELS: u16 = 2;

/// WAV-specific options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WavOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// FLAC-specific options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlacOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Runtime options of a recorder.
/// All fields are optional so partial updates can be merged over the
/// current options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderOptions {
    /// Recording time limit in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
    /// Encode the buffered audio when recording finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode_after_record: Option<bool>,
    /// Minimum delay between two encoding progress reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_interval_ms: Option<u64>,
    /// Samples per channel in each delivered frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wav: Option<WavOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flac: Option<FlacOptions>,
}

impl RecorderOptions {
    /// Create options with default values
    pub fn defaults() -> Self {
        Self {
            time_limit: Some(DEFAULT_TIME_LIMIT_SECS),
            encode_after_record: Some(true),
            progress_interval_ms: Some(DEFAULT_PROGRESS_INTERVAL_MS),
            buffer_size: None,
            wav: Some(WavOptions {
                mime_type: Some(Encoding::Wav.default_mime_type().to_string()),
            }),
            flac: Some(FlacOptions {
                mime_type: Some(Encoding::Flac.default_mime_type().to_string()),
            }),
        }
    }

    /// Create empty options (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge these options with another set, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            time_limit: other.time_limit.or(self.time_limit),
            encode_after_record: other.encode_after_record.or(self.encode_after_record),
            progress_interval_ms: other.progress_interval_ms.or(self.progress_interval_ms),
            buffer_size: other.buffer_size.or(self.buffer_size),
            wav: merge_section(self.wav, other.wav, |b, o| WavOptions {
                mime_type: o.mime_type.or(b.mime_type),
            }),
            flac: merge_section(self.flac, other.flac, |b, o| FlacOptions {
                mime_type: o.mime_type.or(b.mime_type),
            }),
        }
    }

    /// Reject values no recorder can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit == Some(0) {
            return Err(ConfigError::invalid_option(
                "timeLimit",
                "must be at least one second",
            ));
        }
        if self.buffer_size == Some(0) {
            return Err(ConfigError::invalid_option(
                "bufferSize",
                "must be at least one sample",
            ));
        }
        let empty_mime = |mime: Option<&String>| mime.is_some_and(|m| m.trim().is_empty());
        if empty_mime(self.wav.as_ref().and_then(|w| w.mime_type.as_ref())) {
            return Err(ConfigError::invalid_option("wav.mimeType", "must not be empty"));
        }
        if empty_mime(self.flac.as_ref().and_then(|f| f.mime_type.as_ref())) {
            return Err(ConfigError::invalid_option("flac.mimeType", "must not be empty"));
        }
        Ok(())
    }

    /// Get the time limit, or the 20 minute default if not set
    pub fn time_limit_or_default(&self) -> Duration {
        Duration::from_secs(self.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECS))
    }

    /// Get encode-after-record, or true if not set
    pub fn encode_after_record_or_default(&self) -> bool {
        self.encode_after_record.unwrap_or(true)
    }

    /// Get the progress interval, or one second if not set
    pub fn progress_interval_or_default(&self) -> StdDuration {
        StdDuration::from_millis(
            self.progress_interval_ms
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS),
        )
    }

    /// Get the frame buffer size, or 4096 samples if not set
    pub fn buffer_size_or_default(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE) as usize
    }

    /// Get the MIME type configured for an encoding
    pub fn mime_type_for(&self, encoding: Encoding) -> &str {
        let configured = match encoding {
            Encoding::Wav => self.wav.as_ref().and_then(|w| w.mime_type.as_deref()),
            Encoding::Flac => self.flac.as_ref().and_then(|f| f.mime_type.as_deref()),
        };
        configured.unwrap_or(encoding.default_mime_type())
    }
}

/// Merge an optional nested section field by field
fn merge_section<T>(base: Option<T>, other: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (base, other) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(b), Some(o)) => Some(merge(b, o)),
    }
}

/// Recorder configuration, fixed for the lifetime of a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub num_channels: u16,
    pub encoding: Encoding,
    pub options: RecorderOptions,
}

impl RecorderConfig {
    /// Create a config with default options
    pub fn new(num_channels: u16, encoding: Encoding) -> Self {
        Self {
            num_channels,
            encoding,
            options: RecorderOptions::defaults(),
        }
    }

    /// Merge option overrides over the defaults
    pub fn with_options(mut self, options: RecorderOptions) -> Self {
        self.options = self.options.merge(options);
        self
    }

    /// Validate channel count and options
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_channels == 0 {
            return Err(ConfigError::InvalidChannelCount(self.num_channels));
        }
        self.options.validate()
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_CHANNELS, Encoding::Wav)
    }
}
