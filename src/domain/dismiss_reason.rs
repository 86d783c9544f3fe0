//! Normalized dismissal reasons

use std::fmt;

use serde::Serialize;

/// Why a notification left the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationDismissReason {
    /// The user closed the notification
    User,
    /// The notification expired
    Expired,
    /// The notification was removed by application code
    Application,
    Unknown,
}

impl NotificationDismissReason {
    /// Map a `NotificationClosed` reason code from the freedesktop service
    pub const fn from_freedesktop_code(code: u32) -> Self {
        match code {
            1 => Self::Expired,
            2 => Self::User,
            3 => Self::Application,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Expired => "expired",
            Self::Application => "application",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NotificationDismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
