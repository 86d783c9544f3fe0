//! Notification manager port interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::domain::{Capabilities, Notification, NotificationError, NotificationEvent};

/// Port implemented by each platform's notification manager.
///
/// A manager must be initialized before any other operation; operations
/// before `initialize` fail with [`NotificationError::NotConnected`] and
/// operations after `dispose` fail with [`NotificationError::Disposed`].
#[async_trait]
pub trait NotificationManager: Send + Sync {
    /// Connect to the native notification service.
    async fn initialize(&self) -> Result<(), NotificationError>;

    /// Submit a notification for immediate display.
    ///
    /// # Arguments
    /// * `notification` - The notification to present
    /// * `expiration_time` - When the notification gets removed, if ever
    ///
    /// # Returns
    /// Ok(()) once the native service accepted the notification. It may
    /// become visible only after this returns.
    async fn show_notification(
        &self,
        notification: &Notification,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError>;

    /// Submit a notification for display at `delivery_time`.
    ///
    /// Backends without a native scheduler wait in-process; such schedules
    /// do not survive the process.
    async fn schedule_notification(
        &self,
        notification: &Notification,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError>;

    /// Remove an active or scheduled notification.
    /// Unknown notifications are ignored. No dismissal event is published.
    async fn hide_notification(&self, notification: &Notification)
        -> Result<(), NotificationError>;

    /// Release native subscriptions. Calling it again does nothing.
    async fn dispose(&self);

    /// Optional features of the connected service
    fn capabilities(&self) -> Capabilities;

    /// Action id that launched this process, if it was started by
    /// activating a notification
    fn launch_action_id(&self) -> Option<String>;

    /// Subscribe to activation and dismissal events.
    ///
    /// Events go through a bounded broadcast channel. A subscriber that falls
    /// more than [`EVENT_CHANNEL_CAPACITY`](crate::application::tracker::EVENT_CHANNEL_CAPACITY)
    /// events behind receives `RecvError::Lagged` and misses the oldest ones.
    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent>;
}

/// Blanket implementation for boxed manager types
#[async_trait]
impl NotificationManager for Box<dyn NotificationManager> {
    async fn initialize(&self) -> Result<(), NotificationError> {
        self.as_ref().initialize().await
    }

    async fn show_notification(
        &self,
        notification: &Notification,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        self.as_ref()
            .show_notification(notification, expiration_time)
            .await
    }

    async fn schedule_notification(
        &self,
        notification: &Notification,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError> {
        self.as_ref()
            .schedule_notification(notification, delivery_time, expiration_time)
            .await
    }

    async fn hide_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationError> {
        self.as_ref().hide_notification(notification).await
    }

    async fn dispose(&self) {
        self.as_ref().dispose().await
    }

    fn capabilities(&self) -> Capabilities {
        self.as_ref().capabilities()
    }

    fn launch_action_id(&self) -> Option<String> {
        self.as_ref().launch_action_id()
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.as_ref().subscribe()
    }
}
