//! Output encodings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Container/codec an encoder worker produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Wav,
    Flac,
}

impl Encoding {
    /// All supported encodings
    pub const ALL: [Encoding; 2] = [Encoding::Wav, Encoding::Flac];

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }

    /// MIME type used when the options do not override it
    pub const fn default_mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
        }
    }

    /// File extension for artifacts of this encoding
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_encodings() {
        assert_eq!("wav".parse::<Encoding>().unwrap(), Encoding::Wav);
        assert_eq!(" FLAC ".parse::<Encoding>().unwrap(), Encoding::Flac);
    }

    #[test]
    fn parse_unknown_encoding() {
        let err = "mp3".parse::<Encoding>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownEncoding("mp3".to_string()));
        assert!(err.to_string().contains("wav, flac"));
    }

    #[test]
    fn default_is_wav() {
        assert_eq!(Encoding::default(), Encoding::Wav);
        assert_eq!(Encoding::Wav.default_mime_type(), "audio/wav");
        assert_eq!(Encoding::Flac.extension(), "flac");
    }
}
