//! Application runners for the notification commands

use std::env;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::application::ports::{ConfigStore, NotificationManager};
use crate::domain::config::AppConfig;
use crate::domain::{
    ApplicationContext, Duration, Notification, NotificationError, NotificationEvent,
    NotificationId, Platform,
};
use crate::infrastructure::{create_manager_for, XdgConfigStore};

use super::args::{NotifyArgs, SessionOptions};
use super::presenter::Presenter;
use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured application name
pub const APP_NAME_ENV: &str = "DESKTOP_NOTIFY_APP_NAME";

/// How a listening session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOutcome {
    /// The notification was dismissed or failed
    Finished,
    /// The wait elapsed first
    TimedOut,
    /// Ctrl-C or SIGTERM arrived
    Interrupted,
    /// The manager stopped publishing events
    Closed,
}

/// The notification shown when no subcommand is given
pub fn demo_notification() -> Notification {
    Notification::new("Hello World!", "Isn't this awesome?")
        .with_button("Yes", "answer_yes")
        .with_button("No", "answer_no")
        .with_button("Maybe", "answer_maybe")
}

/// Build a notification from command-line arguments
pub fn build_notification(args: &NotifyArgs) -> Notification {
    let mut notification = Notification::new(args.title.clone(), args.body.clone());
    if let Some(image) = &args.image {
        let alt_text = args.image_alt.clone().unwrap_or_default();
        notification = notification.with_image(image.clone(), alt_text);
    }
    notification.buttons = args.buttons.clone();
    notification
}

/// Parse an optional duration flag, naming the setting on failure
pub fn parse_duration(setting: &str, value: Option<&str>) -> Result<Option<Duration>, String> {
    value
        .map(|v| {
            v.parse::<Duration>()
                .map_err(|e| format!("Invalid {}: {}", setting, e))
        })
        .transpose()
}

/// Application identity from the merged config
pub fn build_context(config: &AppConfig) -> Result<ApplicationContext, NotificationError> {
    let mut context = match config.app_name.as_deref() {
        Some(name) => ApplicationContext::new(name),
        None => ApplicationContext::from_current_process()?,
    };
    if let Some(icon) = config.app_icon() {
        context = context.with_icon(icon);
    }
    if let Some(id) = config.app_user_model_id() {
        context = context.with_app_user_model_id(id);
    }
    Ok(context)
}

/// Show the demo notification and print what the user does with it
pub async fn run_demo(options: SessionOptions) -> ExitCode {
    run_show_notification(demo_notification(), None, options).await
}

/// Show a notification from arguments
pub async fn run_show(args: NotifyArgs, options: SessionOptions) -> ExitCode {
    let presenter = Presenter::new();
    let expire_in = match parse_duration("expire-in", args.expire_in.as_deref()) {
        Ok(expire_in) => expire_in,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_show_notification(build_notification(&args), expire_in, options).await
}

async fn run_show_notification(
    notification: Notification,
    expire_in: Option<Duration>,
    options: SessionOptions,
) -> ExitCode {
    let presenter = Presenter::new().with_json(options.json);

    let manager = match connect(&options, &presenter).await {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    let mut events = manager.subscribe();
    let expiration_time = expire_in.map(|d| Utc::now() + d.as_chrono());

    if let Err(e) = manager
        .show_notification(&notification, expiration_time)
        .await
    {
        presenter.error(&e.to_string());
        manager.dispose().await;
        return ExitCode::from(exit_code_for(&e));
    }
    debug!(notification = %notification.id(), "notification shown");

    listen(&mut events, notification.id(), options.wait, &presenter).await;
    manager.dispose().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Show a notification after `delay`
pub async fn run_schedule(args: NotifyArgs, delay: &str, options: SessionOptions) -> ExitCode {
    let mut presenter = Presenter::new().with_json(options.json);

    let (delay, expire_in) = match (
        parse_duration("delay", Some(delay)),
        parse_duration("expire-in", args.expire_in.as_deref()),
    ) {
        (Ok(Some(delay)), Ok(expire_in)) => (delay, expire_in),
        (Err(e), _) | (_, Err(e)) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        (Ok(None), _) => return ExitCode::from(EXIT_USAGE_ERROR),
    };

    let manager = match connect(&options, &presenter).await {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    let notification = build_notification(&args);
    let mut events = manager.subscribe();
    let delivery_time = Utc::now() + delay.as_chrono();
    let expiration_time = expire_in.map(|d| delivery_time + d.as_chrono());

    presenter.start_spinner(&format!("Delivering in {}...", delay));
    let scheduled = tokio::select! {
        result = manager.schedule_notification(&notification, delivery_time, expiration_time) => Some(result),
        _ = shutdown_signal() => None,
    };

    match scheduled {
        Some(Ok(())) => presenter.spinner_success("Notification scheduled"),
        Some(Err(e)) => {
            presenter.spinner_fail(&e.to_string());
            manager.dispose().await;
            return ExitCode::from(exit_code_for(&e));
        }
        None => {
            presenter.spinner_fail("Interrupted before delivery");
            manager.dispose().await;
            return ExitCode::from(EXIT_SUCCESS);
        }
    }

    // Backends with a native scheduler return before delivery
    let wait = Duration::from_millis(options.wait.as_millis() + remaining_millis(delivery_time));
    listen(&mut events, notification.id(), wait, &presenter).await;
    manager.dispose().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Print the capabilities of the native notification service
pub async fn run_capabilities(options: SessionOptions) -> ExitCode {
    let presenter = Presenter::new().with_json(options.json);

    let manager = match connect(&options, &presenter).await {
        Ok(manager) => manager,
        Err(code) => return code,
    };

    presenter.capabilities(manager.capabilities());
    manager.dispose().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Create and initialize the manager for this platform
async fn connect(
    options: &SessionOptions,
    presenter: &Presenter,
) -> Result<Box<dyn NotificationManager>, ExitCode> {
    let manager = create_manager_for(
        Platform::current(),
        options.context.clone(),
        options.launch_timeout.as_std(),
    );

    if let Err(e) = manager.initialize().await {
        presenter.error(&e.to_string());
        manager.dispose().await;
        return Err(ExitCode::from(EXIT_ERROR));
    }

    if let Some(action_id) = manager.launch_action_id() {
        presenter.info(&format!("Launched by notification action: {}", action_id));
    }

    Ok(manager)
}

/// Print events for `id` until it is dismissed, `wait` elapses or a
/// shutdown signal arrives
pub async fn listen(
    events: &mut broadcast::Receiver<NotificationEvent>,
    id: &NotificationId,
    wait: Duration,
    presenter: &Presenter,
) -> ListenOutcome {
    let deadline = tokio::time::sleep(wait.as_std());
    tokio::pin!(deadline);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) if event.notification().id() == id => {
                    presenter.event(&event);
                    if event.is_terminal() {
                        return ListenOutcome::Finished;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event listener fell behind");
                }
                Err(RecvError::Closed) => return ListenOutcome::Closed,
            },
            _ = &mut deadline => {
                debug!(%wait, "stopped waiting for events");
                return ListenOutcome::TimedOut;
            }
            _ = &mut shutdown => {
                presenter.info("Interrupted");
                return ListenOutcome::Interrupted;
            }
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    load_merged_config_from(&XdgConfigStore::new(), cli_config).await
}

/// Merge: defaults < file < env < cli
pub async fn load_merged_config_from<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load_or_empty().await;

    let env_config = AppConfig {
        app_name: env::var(APP_NAME_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

fn exit_code_for(error: &NotificationError) -> u8 {
    match error {
        NotificationError::InvalidArgument { .. } => EXIT_USAGE_ERROR,
        _ => EXIT_ERROR,
    }
}

fn remaining_millis(until: DateTime<Utc>) -> u64 {
    u64::try_from((until - Utc::now()).num_milliseconds()).unwrap_or(0)
}
