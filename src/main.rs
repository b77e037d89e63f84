#![forbid(unsafe_code)]

mod bootstrap;
mod cli;
mod config;
mod constants;
mod error;
mod gui;
mod presence;
mod settings;
mod shell;
mod storage;

use anyhow::Result;
use clap::Parser;
use tracing::{Level as TraceLevel, error, info};
use tracing_subscriber::FmtSubscriber;

use bootstrap::Bootstrap;
use cli::Cli;
use constants::presence::CLIENT_ID;
use presence::DiscordIpcClient;
use shell::EguiShell;
use storage::StorageRootResolver;

fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn init_logging(flag: Option<&str>) -> Result<()> {
    let level = match flag {
        Some(level) => level.to_string(),
        None => std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_log_level(&level))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting {}", constants::app::NAME);

    let resolver = StorageRootResolver::from_env().force_portable(cli.portable);
    let bootstrap = Bootstrap::new(
        resolver,
        cli.launch_inputs(),
        DiscordIpcClient::new(CLIENT_ID),
        EguiShell::new,
    );

    let code = match bootstrap.run() {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "Startup failed");
            1
        }
    };

    info!(code, "Exiting");
    std::process::exit(code)
}
