use anyhow::Context;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use rollover_core::asana::AsanaClient;
use rollover_core::error::CoreError;
use rollover_core::scheduler::DueDateScheduler;
use std::env;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod timezone;
mod views;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = cli::Cli::parse();

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let mut config = config::Config::load(&cli.config)
        .with_context(|| format!("Failed to read configuration from {}", cli.config.display()))?;

    // CLI arguments take precedence.
    if let Some(timezone) = cli.timezone {
        config.timezone = Some(timezone);
    }
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }

    tracing::debug!(config = ?config, "Rollover configuration.");
    let settings = config.into_settings()?;

    let client = AsanaClient::new(settings.token.clone(), settings.api_base_url.clone())
        .with_page_size(settings.page_size);
    let scheduler = DueDateScheduler::new(settings.timezone);

    match cli.command {
        cli::Commands::Run(command) => {
            commands::run::run_pass(&client, &scheduler, &settings, command).await
        }
        cli::Commands::Preview(command) => {
            commands::preview::preview(&client, &scheduler, &settings, command).await
        }
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::Configuration(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
                eprintln!(
                    "Set ASANA_TOKEN and WORKSPACE_ID (plus TEST_PROJECT_ID with ENVIRONMENT=test) in the environment, a .env file, or rollover.toml."
                );
            }
            CoreError::InvalidTimezone(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::Service { status, body } => {
                eprintln!(
                    "{} Task service responded with {}",
                    "Error:".style(error_style),
                    status.yellow()
                );
                if !body.is_empty() {
                    eprintln!("  {}", body.dimmed());
                }
                if *status == 401 || *status == 403 {
                    eprintln!("Check that ASANA_TOKEN is valid and has access to the workspace.");
                }
            }
            CoreError::Http(_) | CoreError::Decode(_) => {
                eprintln!(
                    "{} Could not talk to the task service: {:#}",
                    "Error:".style(error_style),
                    err
                );
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
