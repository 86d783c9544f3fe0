//! Platform detection for backend selection

use std::fmt;

/// Desktop platform families with distinct notification facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux and BSD desktops speaking the freedesktop notification protocol
    Linux,
    Windows,
    MacOS,
    Unsupported,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub const fn current() -> Self {
        if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Self::Linux
        } else if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOS
        } else {
            Self::Unsupported
        }
    }

    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Linux,
            "windows" => Self::Windows,
            "macos" => Self::MacOS,
            _ => Self::Unsupported,
        }
    }

    /// Get the display name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::MacOS => "macOS",
            Self::Unsupported => "an unsupported platform",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
