use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Builder;
use tracing::info;

use release_notify::cli::{Cli, Commands};
use release_notify::config::Config;
use release_notify::error::NotifyError;
use release_notify::logging;
use release_notify::payload::Webhook;
use release_notify::sink::{http_client, post_webhook};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors share the configuration exit code; 2 means a failed delivery.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<NotifyError>() {
            Some(e @ NotifyError::Configuration(_)) => {
                eprintln!("{e}");
                ExitCode::from(e.exit_code())
            }
            _ => {
                eprintln!("Error sending message: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match cli.action() {
        Commands::Send { timeout } => {
            let mut config = Config::from_env()?;
            if let Some(secs) = timeout {
                config = config.with_timeout_secs(secs);
            }
            let hook = Webhook::from_config(&config);

            let rt = Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Starting async runtime")?;
            info!(channel = %config.channel, timeout = ?config.timeout, "sending notification");
            let status = rt.block_on(async {
                let client = http_client(config.timeout)?;
                let status = post_webhook(&client, &config.webhook_url, &hook).await?;
                Ok::<_, NotifyError>(status)
            })?;

            println!("{status}");
        }
        Commands::Payload => {
            let config = Config::from_env()?;
            let hook = Webhook::from_config(&config);
            println!("{}", hook.to_json_pretty()?);
        }
        Commands::Version { json } => {
            if json {
                let info = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "commit": option_env!("GIT_SHA").unwrap_or("unknown"),
                    "build_date": option_env!("BUILD_DATE").unwrap_or("unknown"),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "release-notify {} (commit: {}, built: {})",
                    env!("CARGO_PKG_VERSION"),
                    option_env!("GIT_SHA").unwrap_or("unknown"),
                    option_env!("BUILD_DATE").unwrap_or("unknown"),
                );
            }
        }
    }
    Ok(())
}
