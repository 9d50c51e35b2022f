//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::encoding::Encoding;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::recorder_config::{RecorderConfig, RecorderOptions, DEFAULT_NUM_CHANNELS};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub time_limit: Option<String>,
    pub limit_removed: Option<bool>,
    pub encoding: Option<String>,
    pub channels: Option<u16>,
    pub encode_after_record: Option<bool>,
    pub progress_interval_ms: Option<u64>,
    pub buffer_size: Option<u32>,
    pub output_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            time_limit: Some(Duration::default_time_limit().to_string()),
            limit_removed: Some(false),
            encoding: Some(Encoding::Wav.to_string()),
            channels: Some(DEFAULT_NUM_CHANNELS),
            encode_after_record: Some(true),
            progress_interval_ms: Some(1000),
            buffer_size: None,
            output_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            time_limit: other.time_limit.or(self.time_limit),
            limit_removed: other.limit_removed.or(self.limit_removed),
            encoding: other.encoding.or(self.encoding),
            channels: other.channels.or(self.channels),
            encode_after_record: other.encode_after_record.or(self.encode_after_record),
            progress_interval_ms: other.progress_interval_ms.or(self.progress_interval_ms),
            buffer_size: other.buffer_size.or(self.buffer_size),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }

    /// Get the effective time limit.
    ///
    /// Missing values fall back to the default. Requests above 20 minutes
    /// are capped unless `limit_removed` is set.
    pub fn time_limit(&self) -> Result<Duration, ConfigError> {
        let requested = match self.time_limit.as_deref() {
            Some(value) => value
                .parse::<Duration>()
                .map_err(|e| ConfigError::invalid_option("time_limit", e.to_string()))?,
            None => Duration::default_time_limit(),
        };
        Ok(Duration::effective_time_limit(
            requested,
            self.limit_removed_or_default(),
        ))
    }

    /// Get limit_removed setting, or false if not set
    pub fn limit_removed_or_default(&self) -> bool {
        self.limit_removed.unwrap_or(false)
    }

    /// Get encoding, or WAV if not set
    pub fn encoding(&self) -> Result<Encoding, ConfigError> {
        match self.encoding.as_deref() {
            Some(value) => value.parse(),
            None => Ok(Encoding::default()),
        }
    }

    /// Get channel count, or stereo if not set
    pub fn channels_or_default(&self) -> u16 {
        self.channels.unwrap_or(DEFAULT_NUM_CHANNELS)
    }

    /// Get the output directory, or the current directory if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build the recorder configuration described by this config
    pub fn to_recorder_config(&self) -> Result<RecorderConfig, ConfigError> {
        let options = RecorderOptions {
            time_limit: Some(self.time_limit()?.as_secs()),
            encode_after_record: self.encode_after_record,
            progress_interval_ms: self.progress_interval_ms,
            buffer_size: self.buffer_size,
            ..Default::default()
        };
        let config = RecorderConfig::new(self.channels_or_default(), self.encoding()?)
            .with_options(options);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.time_limit, Some("20m".to_string()));
        assert_eq!(config.limit_removed, Some(false));
        assert_eq!(config.encoding, Some("wav".to_string()));
        assert_eq!(config.channels, Some(2));
        assert_eq!(config.encode_after_record, Some(true));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.time_limit.is_none());
        assert!(config.encoding.is_none());
        assert!(config.channels.is_none());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            encoding: Some("wav".to_string()),
            channels: Some(2),
            time_limit: Some("5m".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            encoding: Some("flac".to_string()),
            time_limit: None,
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.encoding, Some("flac".to_string()));
        assert_eq!(merged.channels, Some(2));
        assert_eq!(merged.time_limit, Some("5m".to_string()));
    }

    #[test]
    fn time_limit_is_capped() {
        let config = AppConfig {
            time_limit: Some("2h".to_string()),
            ..Default::default()
        };
        assert_eq!(config.time_limit().unwrap().as_secs(), 1200);
    }

    #[test]
    fn time_limit_when_limit_removed() {
        let config = AppConfig {
            time_limit: Some("30s".to_string()),
            limit_removed: Some(true),
            ..Default::default()
        };
        assert_eq!(config.time_limit().unwrap().as_secs(), 10800);
    }

    #[test]
    fn invalid_time_limit_is_an_error() {
        let config = AppConfig {
            time_limit: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.time_limit(),
            Err(ConfigError::InvalidOption { ref key, .. }) if key == "time_limit"
        ));
        assert!(config.to_recorder_config().is_err());

        assert_eq!(AppConfig::empty().time_limit().unwrap().as_secs(), 1200);
    }

    #[test]
    fn unknown_encoding_is_an_error() {
        let config = AppConfig {
            encoding: Some("ogg".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.encoding(), Err(ConfigError::UnknownEncoding(_))));
        assert!(config.to_recorder_config().is_err());
    }

    #[test]
    fn to_recorder_config_carries_values() {
        let config = AppConfig {
            time_limit: Some("45s".to_string()),
            encoding: Some("flac".to_string()),
            channels: Some(1),
            buffer_size: Some(1024),
            ..Default::default()
        };

        let recorder = config.to_recorder_config().unwrap();
        assert_eq!(recorder.num_channels, 1);
        assert_eq!(recorder.encoding, Encoding::Flac);
        assert_eq!(recorder.options.time_limit, Some(45));
        assert_eq!(recorder.options.buffer_size, Some(1024));
        assert_eq!(recorder.options.encode_after_record, Some(true));
    }

    #[test]
    fn to_recorder_config_rejects_zero_channels() {
        let config = AppConfig {
            channels: Some(0),
            ..Default::default()
        };
        assert_eq!(
            config.to_recorder_config().unwrap_err(),
            ConfigError::InvalidChannelCount(0)
        );
    }
}
