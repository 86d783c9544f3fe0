//! Normalized notification events

use serde::Serialize;

use super::dismiss_reason::NotificationDismissReason;
use super::notification::Notification;

/// Action id reported when the notification body itself was activated
pub const DEFAULT_ACTION_ID: &str = "default";

/// Normalize a native activation argument into an action id.
/// Empty arguments mean the body was clicked rather than a button.
pub fn normalize_action_id(argument: &str) -> String {
    if argument.is_empty() {
        DEFAULT_ACTION_ID.to_string()
    } else {
        argument.to_string()
    }
}

/// A tracked notification was activated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationActivated {
    pub notification: Notification,
    pub action_id: String,
}

/// A tracked notification left the active set through dismissal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDismissed {
    pub notification: Notification,
    pub reason: NotificationDismissReason,
}

/// The native layer failed to present a tracked notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationFailed {
    pub notification: Notification,
    pub error: String,
}

/// Event published on a manager's event channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    Activated(NotificationActivated),
    Dismissed(NotificationDismissed),
    Failed(NotificationFailed),
}

impl NotificationEvent {
    /// The notification the event refers to
    pub fn notification(&self) -> &Notification {
        match self {
            Self::Activated(e) => &e.notification,
            Self::Dismissed(e) => &e.notification,
            Self::Failed(e) => &e.notification,
        }
    }

    /// Whether the notification is no longer active after this event
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Activated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argument_is_default_action() {
        assert_eq!(normalize_action_id(""), "default");
    }

    #[test]
    fn argument_is_kept() {
        assert_eq!(normalize_action_id("answer_yes"), "answer_yes");
    }

    #[test]
    fn activation_is_not_terminal() {
        let notification = Notification::new("T", "B");
        let activated = NotificationEvent::Activated(NotificationActivated {
            notification: notification.clone(),
            action_id: "default".into(),
        });
        let dismissed = NotificationEvent::Dismissed(NotificationDismissed {
            notification,
            reason: NotificationDismissReason::User,
        });
        assert!(!activated.is_terminal());
        assert!(dismissed.is_terminal());
    }

    #[test]
    fn serializes_with_event_tag() {
        let event = NotificationEvent::Dismissed(NotificationDismissed {
            notification: Notification::new("T", "B").with_id("n1"),
            reason: NotificationDismissReason::Expired,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "dismissed");
        assert_eq!(json["reason"], "expired");
        assert_eq!(json["notification"]["id"], "n1");
    }
}
