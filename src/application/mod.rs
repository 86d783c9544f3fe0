//! Application layer - Identity tracking and port interfaces
//!
//! Contains the handle <-> notification bookkeeping shared by all
//! backends and the trait definitions for native notification services.

pub mod ports;
pub mod tracker;

pub use tracker::NotificationTracker;
