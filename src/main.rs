use anyhow::{Context, Result};
use oraclenet::config::Config;
use oraclenet::feed::oracle_api::OracleApi;
use oraclenet::refresh::RefreshController;
use oraclenet::tui::{self, state::AppState, TuiCommand};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load saved settings from .env (real env vars take precedence)
    Config::load_env_file();
    let config = Config::load_or_default(Path::new(CONFIG_FILE))?;

    // The terminal belongs to the TUI, so logs go to a file.
    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    let base_url = config.api_base_url();
    tracing::info!(
        %base_url,
        refresh_s = config.refresh.interval_s,
        bookmaker = %config.value_bets.reference_bookmaker,
        "starting oraclenet dashboard"
    );

    let feed = OracleApi::new(&base_url, Duration::from_millis(config.api.request_timeout_ms))?;

    // Channels
    let (state_tx, state_rx) = watch::channel(AppState::new(config.value_bets.display_limit));
    let (cmd_tx, cmd_rx) = mpsc::channel::<TuiCommand>(16);

    let controller = RefreshController::new(feed, &config);
    let controller_handle = tokio::spawn(controller.run(state_tx, cmd_rx));

    // Blocks until quit; dropping cmd_tx on return stops the controller.
    let result = tui::run_tui(state_rx, cmd_tx).await;

    controller_handle
        .await
        .context("refresh controller panicked")?;

    tracing::info!("shutting down");
    result
}
