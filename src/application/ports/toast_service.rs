//! Windows toast notifier port

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use crate::domain::{NotificationDismissReason, NotificationError};

/// Native handle of a submitted toast: the tag it was shown under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastHandle(String);

impl ToastHandle {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `ToastDismissalReason` as reported by WinRT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastDismissal {
    UserCanceled,
    ApplicationHidden,
    TimedOut,
    Other(i32),
}

impl From<ToastDismissal> for NotificationDismissReason {
    fn from(dismissal: ToastDismissal) -> Self {
        match dismissal {
            ToastDismissal::UserCanceled => Self::User,
            ToastDismissal::TimedOut => Self::Expired,
            ToastDismissal::ApplicationHidden => Self::Application,
            ToastDismissal::Other(_) => Self::Unknown,
        }
    }
}

/// Per-toast callbacks forwarded from the native event handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastCallback {
    Activated { handle: ToastHandle, arguments: String },
    Dismissed { handle: ToastHandle, reason: ToastDismissal },
    Failed { handle: ToastHandle, error: String },
}

/// Receiving side of a toast service's callback subscription
pub type ToastCallbackReceiver = mpsc::UnboundedReceiver<ToastCallback>;

/// Port for the toast notifier of one AppUserModelId
pub trait ToastService: Send + Sync {
    /// Open the notifier and subscribe to toast callbacks
    fn open(&self, app_user_model_id: &str) -> Result<ToastCallbackReceiver, NotificationError>;

    /// If this process was launched by activating a toast, a receiver that
    /// resolves with the activation arguments.
    ///
    /// Implementations that read the arguments from the command line resolve
    /// it before returning. The manager's launch timeout only matters for
    /// activators that deliver the arguments later.
    fn launch_activation(&self) -> Option<oneshot::Receiver<String>>;

    /// Show a toast immediately
    fn show(
        &self,
        handle: &ToastHandle,
        xml: &str,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError>;

    /// Hand a toast to the OS scheduler
    fn schedule(
        &self,
        handle: &ToastHandle,
        xml: &str,
        delivery_time: DateTime<Utc>,
        expiration_time: Option<DateTime<Utc>>,
    ) -> Result<(), NotificationError>;

    /// Remove a shown or scheduled toast
    fn hide(&self, handle: &ToastHandle) -> Result<(), NotificationError>;

    /// Drop callbacks and the notifier
    fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissal_mapping() {
        assert_eq!(
            NotificationDismissReason::from(ToastDismissal::UserCanceled),
            NotificationDismissReason::User
        );
        assert_eq!(
            NotificationDismissReason::from(ToastDismissal::TimedOut),
            NotificationDismissReason::Expired
        );
        assert_eq!(
            NotificationDismissReason::from(ToastDismissal::ApplicationHidden),
            NotificationDismissReason::Application
        );
        assert_eq!(
            NotificationDismissReason::from(ToastDismissal::Other(7)),
            NotificationDismissReason::Unknown
        );
    }
}
