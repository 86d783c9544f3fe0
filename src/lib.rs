//! desktop-notify - Cross-platform native desktop notifications
//!
//! Shows notifications through the platform's own notification service and
//! reports back when the user activates or dismisses them.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Notifications, events, capabilities, validation and errors
//! - **Application**: Identity tracking and port interfaces (traits)
//! - **Infrastructure**: Native backends (freedesktop D-Bus, Windows toasts) and config storage
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
