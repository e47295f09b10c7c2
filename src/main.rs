use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fluxsave::config::Config;
use fluxsave::lifecycle::{shutdown_signal, Lifecycle, RunMode};
use fluxsave::miniflux::MinifluxClient;
use fluxsave::server::{AppState, ServerError};

#[derive(Parser)]
#[command(
    name = "fluxsave",
    version,
    about = "Save and mark as read every unread Miniflux entry",
    long_about = None
)]
struct Cli {
    /// Keep serving until SIGINT/SIGTERM (overrides DAEMON)
    #[arg(long)]
    daemon: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json), overrides LOG_FORMAT
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = Config::from_env();

    // Logging settings come from the config when it loaded, defaults otherwise
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let format = cli.log_format.as_deref().unwrap_or(&logging.format);
    setup_tracing(format, &logging.level, cli.verbose);

    let mut config = match config {
        Ok(config) => config,
        Err(e) => fatal(e.into()),
    };
    if cli.daemon {
        config.daemon = true;
    }

    if let Err(e) = run(config).await.context("fluxsave stopped") {
        fatal(e);
    }
}

async fn run(config: Config) -> fluxsave::Result<()> {
    tracing::info!("Using Miniflux API URL: {}", config.api_url);
    tracing::info!("API token configured");

    let client = MinifluxClient::new(&config.api_url, &config.api_token)?;
    let state = AppState::new(Arc::new(client));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(format!("{addr}: {e}")))?;

    let lifecycle = Lifecycle::new(RunMode::from_daemon_flag(config.daemon));
    let outcome = lifecycle.run(state, listener, shutdown_signal()).await?;

    if let Some(pass) = outcome.pass {
        tracing::info!(
            processed = pass.processed,
            errors = pass.errors,
            total = pass.total,
            "Single pass finished"
        );
    }

    Ok(())
}

fn fatal(error: anyhow::Error) -> ! {
    tracing::error!("{:#}", error);
    std::process::exit(1);
}

fn setup_tracing(format: &str, level: &str, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fluxsave=debug,tower_http=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("fluxsave={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fluxsave=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
