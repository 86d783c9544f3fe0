//! Freedesktop notification server port
//!
//! Mirrors the `org.freedesktop.Notifications` interface closely enough that
//! the manager can be driven by a fake server in tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::NotificationError;

/// Urgency hint sent with every notification (0 low, 1 normal, 2 critical)
pub const NORMAL_URGENCY: u8 = 1;

/// Arguments of a `Notify` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyRequest {
    pub app_name: String,
    pub replaces_id: u32,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    /// Flat alternating `[action_id, label, ...]` sequence
    pub actions: Vec<String>,
    pub urgency: u8,
    /// Milliseconds until expiry, 0 for never
    pub expire_timeout: i32,
}

/// Signals emitted by the notification server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSignal {
    ActionInvoked { id: u32, action_key: String },
    NotificationClosed { id: u32, reason: u32 },
}

/// Receiving side of a server's signal subscription
pub type SignalReceiver = mpsc::UnboundedReceiver<ServerSignal>;

/// Port for the freedesktop notification service
#[async_trait]
pub trait NotificationServer: Send + Sync {
    /// Connect and subscribe to `ActionInvoked` and `NotificationClosed`.
    async fn connect(&self) -> Result<SignalReceiver, NotificationError>;

    /// `GetCapabilities`
    async fn get_capabilities(&self) -> Result<Vec<String>, NotificationError>;

    /// `Notify`, returning the server-assigned id
    async fn notify(&self, request: NotifyRequest) -> Result<u32, NotificationError>;

    /// `CloseNotification`
    async fn close_notification(&self, id: u32) -> Result<(), NotificationError>;

    /// Drop the subscriptions and the connection
    async fn disconnect(&self);
}
