//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};

use crate::domain::{ApplicationContext, Duration, NotificationButton};

/// desktop-notify - native desktop notifications from the command line
#[derive(Parser, Debug)]
#[command(name = "desktop-notify")]
#[command(version)]
#[command(about = "Show native desktop notifications and report how users respond")]
#[command(long_about = None)]
pub struct Cli {
    /// Application name shown by the notification service
    #[arg(long, global = true, value_name = "NAME")]
    pub app_name: Option<String>,

    /// How long to listen for events (e.g., 10s, 1m)
    #[arg(short = 'w', long, global = true, value_name = "TIME")]
    pub wait: Option<String>,

    /// Print events as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a notification now
    Show(NotifyArgs),
    /// Show a notification after a delay
    Schedule {
        #[command(flatten)]
        notification: NotifyArgs,

        /// Delay before delivery (e.g., 30s, 2m)
        #[arg(short = 'd', long, value_name = "TIME")]
        delay: String,
    },
    /// List the optional features of the notification service
    Capabilities,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Content of the notification to send
#[derive(Args, Debug, Clone)]
pub struct NotifyArgs {
    /// Notification title
    pub title: String,

    /// Notification body
    #[arg(default_value = "")]
    pub body: String,

    /// Button as LABEL=ACTION (repeatable, shown in order)
    #[arg(short = 'b', long = "button", value_name = "LABEL=ACTION", value_parser = parse_button)]
    pub buttons: Vec<NotificationButton>,

    /// Image shown in the body
    #[arg(long, value_name = "PATH")]
    pub image: Option<String>,

    /// Alternative text for the image
    #[arg(long, value_name = "TEXT", requires = "image")]
    pub image_alt: Option<String>,

    /// Remove the notification after this long (e.g., 30s)
    #[arg(short = 'e', long, value_name = "TIME")]
    pub expire_in: Option<String>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Settings resolved from config, env and flags for one run
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub context: ApplicationContext,
    pub wait: Duration,
    pub launch_timeout: Duration,
    pub json: bool,
}

/// Parse `LABEL=ACTION` into a button
pub fn parse_button(value: &str) -> Result<NotificationButton, String> {
    let (label, action_id) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=ACTION, got '{}'", value))?;

    if label.trim().is_empty() {
        return Err("button label must not be empty".to_string());
    }
    if action_id.is_empty() {
        return Err("button action must not be empty".to_string());
    }

    Ok(NotificationButton::new(label, action_id))
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "app_name",
    "expire_in",
    "wait",
    "json",
    "linux.app_icon",
    "windows.app_user_model_id",
    "windows.launch_timeout",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["desktop-notify"]);
        assert!(cli.wait.is_none());
        assert!(!cli.json);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_show() {
        let cli = Cli::parse_from([
            "desktop-notify",
            "show",
            "Hello World!",
            "Isn't this awesome?",
            "--button",
            "Yes=answer_yes",
            "-b",
            "No=answer_no",
            "--expire-in",
            "30s",
        ]);

        let Some(Commands::Show(args)) = cli.command else {
            panic!("Expected Show command");
        };
        assert_eq!(args.title, "Hello World!");
        assert_eq!(args.body, "Isn't this awesome?");
        assert_eq!(
            args.buttons,
            vec![
                NotificationButton::new("Yes", "answer_yes"),
                NotificationButton::new("No", "answer_no"),
            ]
        );
        assert_eq!(args.expire_in, Some("30s".to_string()));
    }

    #[test]
    fn cli_parses_schedule() {
        let cli = Cli::parse_from(["desktop-notify", "schedule", "Later", "--delay", "2m"]);
        let Some(Commands::Schedule {
            notification,
            delay,
        }) = cli.command
        else {
            panic!("Expected Schedule command");
        };
        assert_eq!(notification.title, "Later");
        assert_eq!(notification.body, "");
        assert_eq!(delay, "2m");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["desktop-notify", "show", "T", "--json", "-w", "5s", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.wait, Some("5s".to_string()));
    }

    #[test]
    fn schedule_requires_delay() {
        assert!(Cli::try_parse_from(["desktop-notify", "schedule", "Later"]).is_err());
    }

    #[test]
    fn image_alt_requires_image() {
        assert!(Cli::try_parse_from(["desktop-notify", "show", "T", "--image-alt", "x"]).is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["desktop-notify", "config", "set", "wait", "30s"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "wait");
            assert_eq!(value, "30s");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn parse_button_splits_on_first_equals() {
        assert_eq!(
            parse_button("Open=url=x").unwrap(),
            NotificationButton::new("Open", "url=x")
        );
    }

    #[test]
    fn parse_button_rejects_malformed() {
        assert!(parse_button("Yes").is_err());
        assert!(parse_button("=yes").is_err());
        assert!(parse_button("Yes=").is_err());
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("app_name"));
        assert!(is_valid_config_key("windows.launch_timeout"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
