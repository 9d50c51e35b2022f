//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording time limit (20 minutes)
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 1200;

/// Upper bound for a user-requested time limit (20 minutes)
pub const MAX_TIME_LIMIT_SECS: u64 = 1200;

/// Time limit used when the limit has been lifted (3 hours)
pub const UNLIMITED_TIME_LIMIT_SECS: u64 = 10800;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default recording time limit
    pub const fn default_time_limit() -> Self {
        Self::from_secs(DEFAULT_TIME_LIMIT_SECS)
    }

    /// Time limit applied when the user removed the regular cap
    pub const fn unlimited_time_limit() -> Self {
        Self::from_secs(UNLIMITED_TIME_LIMIT_SECS)
    }

    /// Resolve the effective time limit.
    ///
    /// A requested limit is capped at [`MAX_TIME_LIMIT_SECS`]; with
    /// `limit_removed` the request is ignored and the 3 hour ceiling applies.
    pub fn effective_time_limit(requested: Self, limit_removed: bool) -> Self {
        if limit_removed {
            Self::unlimited_time_limit()
        } else {
            requested.min(Self::from_secs(MAX_TIME_LIMIT_SECS))
        }
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "30s", "20m", "1h", "2m30s", "1h30m"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        let mut total_secs: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }

            let unit_secs = match ch {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return Err(err()),
            };
            if current_num.is_empty() {
                return Err(err());
            }

            let value: u64 = current_num.parse().map_err(|_| err())?;
            total_secs = value
                .checked_mul(unit_secs)
                .and_then(|v| total_secs.checked_add(v))
                .ok_or_else(err)?;
            current_num.clear();
            found_any = true;
        }

        // Leftover digits without a unit are invalid
        if !current_num.is_empty() || !found_any || total_secs == 0 {
            return Err(err());
        }

        let milliseconds = total_secs.checked_mul(1000).ok_or_else(err)?;
        Ok(Self { milliseconds })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("{}h", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}m", minutes));
        }
        if seconds > 0 || out.is_empty() {
            out.push_str(&format!("{}s", seconds));
        }
        f.write_str(&out)
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_time_limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_hours() {
        let d: Duration = "1h30m".parse().unwrap();
        assert_eq!(d.as_secs(), 5400);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        let d: Duration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("m".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Duration::from_secs(30).to_string(), "30s");
        assert_eq!(Duration::from_secs(1200).to_string(), "20m");
        assert_eq!(Duration::from_secs(5430).to_string(), "1h30m30s");
    }

    #[test]
    fn effective_time_limit_caps_request() {
        let requested = Duration::from_secs(3600);
        let limit = Duration::effective_time_limit(requested, false);
        assert_eq!(limit.as_secs(), MAX_TIME_LIMIT_SECS);

        let short = Duration::from_secs(45);
        assert_eq!(Duration::effective_time_limit(short, false), short);
    }

    #[test]
    fn effective_time_limit_when_removed() {
        let limit = Duration::effective_time_limit(Duration::from_secs(30), true);
        assert_eq!(limit.as_secs(), UNLIMITED_TIME_LIMIT_SECS);
    }
}
