//! Identity of the host application towards the OS notification service

use std::path::Path;

use super::error::NotificationError;

/// Host application as presented to the notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationContext {
    name: String,
    icon: Option<String>,
    app_user_model_id: Option<String>,
}

impl ApplicationContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            app_user_model_id: None,
        }
    }

    /// Derive the name from the running executable's file stem
    pub fn from_current_process() -> Result<Self, NotificationError> {
        let exe = std::env::current_exe().map_err(|e| NotificationError::ProcessName(e.to_string()))?;
        let name = name_from_executable(&exe).ok_or_else(|| {
            NotificationError::ProcessName(format!("no file name in {}", exe.display()))
        })?;
        Ok(Self::new(name))
    }

    /// Icon name or path (freedesktop `app_icon`)
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Explicit AppUserModelId for Windows toasts
    pub fn with_app_user_model_id(mut self, id: impl Into<String>) -> Self {
        self.app_user_model_id = Some(id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// AppUserModelId, falling back to the application name
    pub fn app_user_model_id(&self) -> &str {
        self.app_user_model_id.as_deref().unwrap_or(&self.name)
    }
}

fn name_from_executable(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_strips_extension() {
        assert_eq!(
            name_from_executable(Path::new("/opt/app/bin/notifier.exe")),
            Some("notifier".to_string())
        );
        assert_eq!(
            name_from_executable(Path::new("/usr/bin/notifier")),
            Some("notifier".to_string())
        );
    }

    #[test]
    fn from_current_process_has_a_name() {
        let context = ApplicationContext::from_current_process().unwrap();
        assert!(!context.name().is_empty());
    }

    #[test]
    fn app_user_model_id_defaults_to_name() {
        let context = ApplicationContext::new("Notifier");
        assert_eq!(context.app_user_model_id(), "Notifier");

        let context = context.with_app_user_model_id("Company.Notifier");
        assert_eq!(context.app_user_model_id(), "Company.Notifier");
    }

    #[test]
    fn icon_is_optional() {
        let context = ApplicationContext::new("Notifier");
        assert_eq!(context.icon(), None);
        assert_eq!(
            context.with_icon("dialog-information").icon(),
            Some("dialog-information")
        );
    }
}
