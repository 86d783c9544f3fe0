//! Infrastructure layer - Adapter implementations
//!
//! Contains the native notification backends (D-Bus, WinRT), the config
//! file store, and backend selection for the running platform.

pub mod config;
pub mod freedesktop;
pub mod unsupported;
pub mod windows;

use std::time::Duration;

use crate::application::ports::NotificationManager;
use crate::domain::duration::DEFAULT_LAUNCH_TIMEOUT_SECS;
use crate::domain::{ApplicationContext, Platform};

pub use self::config::XdgConfigStore;
pub use self::freedesktop::{FreeDesktopNotificationManager, ZbusNotificationServer};
pub use self::unsupported::UnsupportedNotificationManager;
#[cfg(windows)]
pub use self::windows::WinRtToastService;
pub use self::windows::WindowsNotificationManager;

/// Notification manager for the platform this process runs on
pub fn create_manager(context: ApplicationContext) -> Box<dyn NotificationManager> {
    create_manager_for(
        Platform::current(),
        context,
        Duration::from_secs(DEFAULT_LAUNCH_TIMEOUT_SECS),
    )
}

/// Notification manager for `platform`.
///
/// Backends not compiled into this binary fall back to
/// [`UnsupportedNotificationManager`]. `launch_timeout` bounds the Windows
/// wait for a launch activation.
pub fn create_manager_for(
    platform: Platform,
    context: ApplicationContext,
    launch_timeout: Duration,
) -> Box<dyn NotificationManager> {
    match platform {
        Platform::Linux => Box::new(FreeDesktopNotificationManager::new(
            context,
            ZbusNotificationServer::new(),
        )),
        #[cfg(windows)]
        Platform::Windows => Box::new(
            WindowsNotificationManager::new(context, WinRtToastService::new())
                .with_launch_timeout(launch_timeout),
        ),
        other => {
            let _ = launch_timeout;
            Box::new(UnsupportedNotificationManager::new(other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capabilities, NotificationError};

    #[tokio::test]
    async fn macos_gets_the_unsupported_backend() {
        let manager = create_manager_for(
            Platform::MacOS,
            ApplicationContext::new("test"),
            Duration::from_secs(1),
        );
        assert_eq!(
            manager.initialize().await.unwrap_err(),
            NotificationError::PlatformNotSupported(Platform::MacOS)
        );
        assert_eq!(manager.capabilities(), Capabilities::empty());
    }

    #[cfg(not(windows))]
    #[tokio::test]
    async fn windows_backend_needs_a_windows_build() {
        let manager = create_manager_for(
            Platform::Windows,
            ApplicationContext::new("test"),
            Duration::from_secs(1),
        );
        assert_eq!(
            manager.initialize().await.unwrap_err(),
            NotificationError::PlatformNotSupported(Platform::Windows)
        );
    }

    #[tokio::test]
    async fn linux_backend_starts_disconnected() {
        let manager = create_manager_for(
            Platform::Linux,
            ApplicationContext::new("test"),
            Duration::from_secs(1),
        );
        assert!(manager.capabilities().is_empty());
        assert!(manager.launch_action_id().is_none());
    }
}
