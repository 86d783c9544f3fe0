//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{Capabilities, NotificationEvent};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    json: bool,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            spinner: None,
            json: false,
        }
    }

    /// Print events and capabilities as JSON lines
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print a notification event to stdout
    pub fn event(&self, event: &NotificationEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => self.output(&line),
                Err(e) => self.error(&format!("Failed to encode event: {}", e)),
            }
        } else {
            self.output(&format_event(event));
        }
    }

    /// Print the capability labels to stdout
    pub fn capabilities(&self, capabilities: Capabilities) {
        let labels = capabilities.labels();
        if self.json {
            match serde_json::to_string(&labels) {
                Ok(line) => self.output(&line),
                Err(e) => self.error(&format!("Failed to encode capabilities: {}", e)),
            }
        } else if labels.is_empty() {
            self.info("No optional capabilities");
        } else {
            for label in labels {
                self.output(label);
            }
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line human description of an event
pub fn format_event(event: &NotificationEvent) -> String {
    match event {
        NotificationEvent::Activated(e) => format!(
            "{} activated \"{}\" with action {}",
            "●".cyan(),
            e.notification.title,
            e.action_id.bold()
        ),
        NotificationEvent::Dismissed(e) => format!(
            "{} dismissed \"{}\" ({})",
            "○".yellow(),
            e.notification.title,
            e.reason
        ),
        NotificationEvent::Failed(e) => format!(
            "{} failed \"{}\": {}",
            "✗".red(),
            e.notification.title,
            e.error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Notification, NotificationActivated, NotificationDismissReason, NotificationDismissed,
    };

    #[test]
    fn format_activation_names_action() {
        colored::control::set_override(false);
        let event = NotificationEvent::Activated(NotificationActivated {
            notification: Notification::new("Hello World!", ""),
            action_id: "answer_yes".to_string(),
        });
        let line = format_event(&event);
        assert!(line.contains("activated \"Hello World!\" with action answer_yes"));
    }

    #[test]
    fn format_dismissal_names_reason() {
        colored::control::set_override(false);
        let event = NotificationEvent::Dismissed(NotificationDismissed {
            notification: Notification::new("Hello World!", ""),
            reason: NotificationDismissReason::Expired,
        });
        assert!(format_event(&event).contains("dismissed \"Hello World!\" (expired)"));
    }
}
