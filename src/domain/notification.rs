//! Notification value objects

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::NotificationError;

/// Opaque application-level identity of a notification.
///
/// Managers key their reverse lookups on this id, so two `Notification`
/// values with the same id are treated as the same notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A button shown on a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationButton {
    /// Text shown to the user
    pub label: String,
    /// Id reported back on activation
    pub action_id: String,
}

impl NotificationButton {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action_id: action_id.into(),
        }
    }
}

/// A notification as described by the application.
///
/// Managers keep their own clone once submitted; changing the caller's
/// copy afterwards does not affect what is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    id: NotificationId,
    pub title: String,
    pub body: String,
    pub body_image_path: Option<String>,
    pub body_image_alt_text: String,
    pub buttons: Vec<NotificationButton>,
}

impl Notification {
    /// Create a notification with a generated id
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: NotificationId::generate(),
            title: title.into(),
            body: body.into(),
            body_image_path: None,
            body_image_alt_text: String::new(),
            buttons: Vec::new(),
        }
    }

    /// Replace the generated id with an application-assigned one
    pub fn with_id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach an image shown inside the body
    pub fn with_image(mut self, path: impl Into<String>, alt_text: impl Into<String>) -> Self {
        self.body_image_path = Some(path.into());
        self.body_image_alt_text = alt_text.into();
        self
    }

    /// Append a button
    pub fn with_button(mut self, label: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.buttons.push(NotificationButton::new(label, action_id));
        self
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Check the fields every backend requires
    pub fn validate(&self) -> Result<(), NotificationError> {
        if self.title.trim().is_empty() {
            return Err(NotificationError::invalid_argument(
                "title",
                "notification title must not be empty",
            ));
        }
        if let Some(button) = self.buttons.iter().find(|b| b.action_id.is_empty()) {
            return Err(NotificationError::invalid_argument(
                "buttons",
                format!("button '{}' has an empty action id", button.label),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = Notification::new("A", "a");
        let b = Notification::new("A", "a");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn with_id_overrides_generated_id() {
        let n = Notification::new("Title", "Body").with_id("build-42");
        assert_eq!(n.id().as_str(), "build-42");
    }

    #[test]
    fn clone_keeps_identity() {
        let n = Notification::new("Title", "Body");
        assert_eq!(n.clone().id(), n.id());
    }

    #[test]
    fn buttons_keep_insertion_order() {
        let n = Notification::new("Q", "?")
            .with_button("Yes", "yes")
            .with_button("No", "no");
        let ids: Vec<_> = n.buttons.iter().map(|b| b.action_id.as_str()).collect();
        assert_eq!(ids, ["yes", "no"]);
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = Notification::new("  ", "body").validate().unwrap_err();
        assert!(matches!(
            err,
            NotificationError::InvalidArgument { name: "title", .. }
        ));
    }

    #[test]
    fn empty_body_is_allowed() {
        assert!(Notification::new("Title", "").validate().is_ok());
    }

    #[test]
    fn button_without_action_id_is_rejected() {
        let n = Notification::new("Title", "Body").with_button("Broken", "");
        assert!(n.validate().is_err());
    }

    #[test]
    fn with_image_sets_path_and_alt() {
        let n = Notification::new("T", "B").with_image("/tmp/a.png", "A picture");
        assert_eq!(n.body_image_path.as_deref(), Some("/tmp/a.png"));
        assert_eq!(n.body_image_alt_text, "A picture");
    }
}
