//! Manager for platforms without a notification backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::application::ports::NotificationManager;
use crate::domain::{Capabilities, Notification, NotificationError, NotificationEvent, Platform};

/// Fails every operation with [`NotificationError::PlatformNotSupported`]
pub struct UnsupportedNotificationManager {
    platform: Platform,
    events: broadcast::Sender<NotificationEvent>,
}

impl UnsupportedNotificationManager {
    pub fn new(platform: Platform) -> Self {
        let (events, _) = broadcast::channel(1);
        Self { platform, events }
    }

    fn unsupported(&self) -> NotificationError {
        NotificationError::PlatformNotSupported(self.platform)
    }
}

#[async_trait]
impl NotificationManager for UnsupportedNotificationManager {
    async fn initialize(&self) -> Result<(), NotificationError> {
        Err(self.unsupported())
    }

    async fn show_notification(
        &self,
        _notification: &Notification,
        _expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        Err(self.unsupported())
    }

    async fn schedule_notification(
        &self,
        _notification: &Notification,
        _delivery_time: DateTime<Utc>,
        _expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        Err(self.unsupported())
    }

    async fn hide_notification(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationError> {
        Err(self.unsupported())
    }

    async fn dispose(&self) {}

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn launch_action_id(&self) -> Option<String> {
        None
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }
}
