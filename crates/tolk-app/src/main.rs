use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::signal;
use tolk_core::ProviderFactory;
use tracing_subscriber::EnvFilter;

pub mod context;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;
pub mod transport;

#[cfg(test)]
mod tests;

use self::controller::AppController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Native messaging host translating web pages and posts for the browser extension.
///
/// Requests arrive framed on stdin and replies leave framed on stdout; logs go to stderr.
#[derive(Parser)]
#[command(name = "tolk-host", version, about)]
struct Args {
    /// Load this config file instead of a profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Profile name under the tolk home directory
    #[arg(long, default_value = "main")]
    profile: String,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Browsers pass the extension origin as a positional argument
    #[arg(hide = true)]
    origin: Option<String>,
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the protocol
    match args.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_target(false)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(&args);

    if let Some(origin) = &args.origin {
        tracing::info!("Started by {}", origin);
    }

    let config = profile::load_config(args.config.as_deref(), &args.profile)?;
    tracing::info!(
        "Using {} ({}), {} chunks per pass",
        config.translator.provider,
        config.translator.effective_model(),
        config.pipeline.chunks_per_pass
    );

    let factory = Arc::new(ProviderFactory::new(config.pipeline.clone()));
    let controller = AppController::new(config, factory);
    let mut tasks = controller.spawn_tasks(tokio::io::stdin(), tokio::io::stdout());
    let cancel = controller.cancel_token();

    tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Ctrl+C received"),
                Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
            }
        }
        _ = cancel.cancelled() => {}
    }

    controller.shutdown();

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Task failed: {}", e),
            Err(e) => tracing::error!("Task panicked: {}", e),
        }
    }

    tracing::info!("Host stopped");

    // A blocked stdin read would otherwise keep the runtime alive
    std::process::exit(0)
}
