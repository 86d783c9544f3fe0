//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::duration::Duration;

/// Linux-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinuxConfig {
    pub app_icon: Option<String>,
}

/// Windows-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowsConfig {
    pub app_user_model_id: Option<String>,
    pub launch_timeout: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_name: Option<String>,
    pub expire_in: Option<String>,
    pub wait: Option<String>,
    pub json: Option<bool>,
    pub linux: Option<LinuxConfig>,
    pub windows: Option<WindowsConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            app_name: None,
            expire_in: None,
            wait: Some(Duration::default_wait().to_string()),
            json: Some(false),
            linux: Some(LinuxConfig { app_icon: None }),
            windows: Some(WindowsConfig {
                app_user_model_id: None,
                launch_timeout: Some(Duration::default_launch_timeout().to_string()),
            }),
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
            app_name: other.app_name.or(self.app_name),
            expire_in: other.expire_in.or(self.expire_in),
            wait: other.wait.or(self.wait),
            json: other.json.or(self.json),
            linux: match (self.linux, other.linux) {
                (Some(b), Some(o)) => Some(LinuxConfig {
                    app_icon: o.app_icon.or(b.app_icon),
                }),
                (b, o) => o.or(b),
            },
            windows: match (self.windows, other.windows) {
                (Some(b), Some(o)) => Some(WindowsConfig {
                    app_user_model_id: o.app_user_model_id.or(b.app_user_model_id),
                    launch_timeout: o.launch_timeout.or(b.launch_timeout),
                }),
                (b, o) => o.or(b),
            },
        }
    }

    /// Get expire_in as parsed Duration, or None if not set/invalid
    pub fn expire_in_or_default(&self) -> Option<Duration> {
        self.expire_in.as_ref().and_then(|s| s.parse().ok())
    }

    /// Get wait as parsed Duration, or default if not set/invalid
    pub fn wait_or_default(&self) -> Duration {
        self.wait
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_wait)
    }

    /// Get json setting, or false if not set
    pub fn json_or_default(&self) -> bool {
        self.json.unwrap_or(false)
    }

    pub fn app_icon(&self) -> Option<&str> {
        self.linux.as_ref().and_then(|l| l.app_icon.as_deref())
    }

    pub fn app_user_model_id(&self) -> Option<&str> {
        self.windows
            .as_ref()
            .and_then(|w| w.app_user_model_id.as_deref())
    }

    /// Get launch timeout as parsed Duration, or 5s if not set/invalid
    pub fn launch_timeout_or_default(&self) -> Duration {
        self.windows
            .as_ref()
            .and_then(|w| w.launch_timeout.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_launch_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.wait, Some("10s".to_string()));
        assert_eq!(config.json, Some(false));
        assert_eq!(
            config.windows.and_then(|w| w.launch_timeout),
            Some("5s".to_string())
        );
    }

    #[test]
    fn empty_has_no_values() {
        let config = AppConfig::empty();
        assert!(config.app_name.is_none());
        assert!(config.wait.is_none());
        assert!(config.linux.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            app_name: Some("Base".to_string()),
            wait: Some("10s".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            app_name: Some("Other".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.app_name, Some("Other".to_string()));
        assert_eq!(merged.wait, Some("10s".to_string()));
    }

    #[test]
    fn merge_platform_sections_field_by_field() {
        let base = AppConfig {
            windows: Some(WindowsConfig {
                app_user_model_id: Some("Company.App".to_string()),
                launch_timeout: Some("5s".to_string()),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            windows: Some(WindowsConfig {
                app_user_model_id: None,
                launch_timeout: Some("2s".to_string()),
            }),
            linux: Some(LinuxConfig {
                app_icon: Some("mail-unread".to_string()),
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.app_user_model_id(), Some("Company.App"));
        assert_eq!(merged.launch_timeout_or_default().as_secs(), 2);
        assert_eq!(merged.app_icon(), Some("mail-unread"));
    }

    #[test]
    fn accessors_fall_back_on_invalid_values() {
        let config = AppConfig {
            wait: Some("forever".to_string()),
            expire_in: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.wait_or_default(), Duration::default_wait());
        assert_eq!(config.expire_in_or_default(), None);
        assert_eq!(
            config.launch_timeout_or_default(),
            Duration::default_launch_timeout()
        );
        assert!(!config.json_or_default());
    }
}
