//! Duration value object for delays, expirations and waits

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default time the CLI listens for events after showing a notification
pub const DEFAULT_WAIT_SECS: u64 = 10;

/// Default bound on waiting for a cold-start launch action
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 5;

/// Value object representing a positive time span.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default event wait (10 seconds)
    pub const fn default_wait() -> Self {
        Self::from_secs(DEFAULT_WAIT_SECS)
    }

    /// Default launch-action timeout (5 seconds)
    pub const fn default_launch_timeout() -> Self {
        Self::from_secs(DEFAULT_LAUNCH_TIMEOUT_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Convert for timestamp arithmetic
    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.milliseconds).unwrap_or(i64::MAX))
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse strings like "30s", "1m", "2m30s", "1h15m".
    /// Units must appear at most once and in h, m, s order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        let mut total_secs: u64 = 0;
        let mut current_num = String::new();
        // Rank of the last unit seen: h=3, m=2, s=1
        let mut last_rank = u8::MAX;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }

            let (rank, multiplier) = match ch {
                'h' => (3, 3600),
                'm' => (2, 60),
                's' => (1, 1),
                _ => return Err(invalid()),
            };
            if current_num.is_empty() || rank >= last_rank {
                return Err(invalid());
            }

            let value: u64 = current_num.parse().map_err(|_| invalid())?;
            total_secs = value
                .checked_mul(multiplier)
                .and_then(|secs| total_secs.checked_add(secs))
                .ok_or_else(invalid)?;
            current_num.clear();
            last_rank = rank;
        }

        if !current_num.is_empty() || last_rank == u8::MAX || total_secs == 0 {
            return Err(invalid());
        }

        total_secs
            .checked_mul(1000)
            .map(Self::from_millis)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 || total_secs == 0 {
            write!(f, "{}s", seconds)?;
        }
        Ok(())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_wait()
    }
}
