//! Toast XML payloads

use quick_xml::escape::escape;

use crate::domain::Notification;

/// Render the `ToastGeneric` document for a notification.
///
/// Buttons become foreground actions whose `arguments` carry the action id,
/// so activation callbacks report it back verbatim.
pub fn render(notification: &Notification) -> String {
    let mut xml = String::from("<toast><visual><binding template=\"ToastGeneric\">");

    xml.push_str(&format!("<text>{}</text>", escape(notification.title.as_str())));
    xml.push_str(&format!("<text>{}</text>", escape(notification.body.as_str())));

    if let Some(path) = notification.body_image_path.as_deref() {
        xml.push_str(&format!(
            "<image src=\"{}\" alt=\"{}\"/>",
            escape(path),
            escape(notification.body_image_alt_text.as_str())
        ));
    }

    xml.push_str("</binding></visual>");

    if !notification.buttons.is_empty() {
        xml.push_str("<actions>");
        for button in &notification.buttons {
            xml.push_str(&format!(
                "<action content=\"{}\" activationType=\"foreground\" arguments=\"{}\"/>",
                escape(button.label.as_str()),
                escape(button.action_id.as_str())
            ));
        }
        xml.push_str("</actions>");
    }

    xml.push_str("</toast>");
    xml
}
