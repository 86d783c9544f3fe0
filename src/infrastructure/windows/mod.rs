//! Windows toast notifications

mod manager;
pub mod toast_xml;
#[cfg(windows)]
mod winrt;

pub use manager::WindowsNotificationManager;
#[cfg(windows)]
pub use winrt::WinRtToastService;
