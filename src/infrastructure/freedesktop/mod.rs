//! Freedesktop (D-Bus) notification backend

mod manager;
mod zbus_server;

pub use manager::{generate_actions, generate_body, FreeDesktopNotificationManager};
pub use zbus_server::ZbusNotificationServer;
