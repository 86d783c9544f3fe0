//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod manager;
pub mod notification_server;
pub mod toast_service;

// Re-export common types
pub use config::ConfigStore;
pub use manager::NotificationManager;
pub use notification_server::{
    NotificationServer, NotifyRequest, ServerSignal, SignalReceiver, NORMAL_URGENCY,
};
pub use toast_service::{
    ToastCallback, ToastCallbackReceiver, ToastDismissal, ToastHandle, ToastService,
};
