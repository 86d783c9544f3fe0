//! Domain layer - Notification model and rules
//!
//! Contains value objects, events, validation rules and domain errors.
//! This layer has no dependencies on native notification services.

pub mod app_context;
pub mod capabilities;
pub mod config;
pub mod dismiss_reason;
pub mod duration;
pub mod error;
pub mod events;
pub mod notification;
pub mod platform;
pub mod schedule;

// Re-export common types
pub use app_context::ApplicationContext;
pub use capabilities::Capabilities;
pub use config::AppConfig;
pub use dismiss_reason::NotificationDismissReason;
pub use duration::Duration;
pub use error::*;
pub use events::{
    normalize_action_id, NotificationActivated, NotificationDismissed, NotificationEvent,
    NotificationFailed, DEFAULT_ACTION_ID,
};
pub use notification::{Notification, NotificationButton, NotificationId};
pub use platform::Platform;
