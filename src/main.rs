//! desktop-notify CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use desktop_notify::cli::{
    app::{build_context, load_merged_config, parse_duration},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_capabilities, run_demo, run_schedule, run_show, SessionOptions, EXIT_ERROR,
    EXIT_USAGE_ERROR,
};
use desktop_notify::domain::config::AppConfig;
use desktop_notify::domain::Duration;
use desktop_notify::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    let command = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        other => other,
    };

    let cli_config = AppConfig {
        app_name: cli.app_name.clone(),
        wait: cli.wait.clone(),
        json: if cli.json { Some(true) } else { None },
        ..Default::default()
    };
    let config = load_merged_config(cli_config).await;

    let wait = match parse_duration("wait", config.wait.as_deref()) {
        Ok(wait) => wait.unwrap_or_else(Duration::default_wait),
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let context = match build_context(&config) {
        Ok(context) => context,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let options = SessionOptions {
        context,
        wait,
        launch_timeout: config.launch_timeout_or_default(),
        json: config.json_or_default(),
    };

    match command {
        Some(Commands::Show(mut args)) => {
            args.expire_in = args.expire_in.or(config.expire_in);
            run_show(args, options).await
        }
        Some(Commands::Schedule {
            mut notification,
            delay,
        }) => {
            notification.expire_in = notification.expire_in.or(config.expire_in);
            run_schedule(notification, &delay, options).await
        }
        Some(Commands::Capabilities) => run_capabilities(options).await,
        Some(Commands::Config { .. }) | None => run_demo(options).await,
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "desktop_notify=debug"
    } else {
        "desktop_notify=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
