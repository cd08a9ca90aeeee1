pub mod calendar;
pub mod dial;
pub mod engine;
pub mod models;
pub mod settings;
pub mod source;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use tokio::sync::watch;

use dial::{angle::rotation_degrees, DialState};
use engine::DialController;
use settings::SettingsStore;

// Set to true to enable bootstrap and renderer logging
const ENABLE_LOGS: bool = true;

const DEFAULT_SETTINGS_FILE: &str = "chronodial.json";

fn settings_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CHRONODIAL_CONFIG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

/// Stand-in for a real renderer: follows the published snapshots and logs
/// every animated move.
async fn log_renderer(mut states: watch::Receiver<Arc<DialState>>) {
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        for directive in state.directives.iter().filter(|d| !d.is_instant()) {
            log_debug!(
                "#{} {} {:.3} -> {:.3} ({:.1}°) over {:.2}s{}",
                state.sequence,
                directive.dial.as_str(),
                directive.from,
                directive.to,
                rotation_degrees(directive.dial, directive.to),
                directive.duration_secs,
                if directive.wrapped { " [wrap]" } else { "" }
            );
        }
    }
}

pub fn run() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the info default)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("chronodial starting up...");

    let path = settings_path();
    let store = SettingsStore::new(path.clone())?;
    let settings = store.settings();
    log::info!("using settings from {}", path.display());

    let runtime = tokio::runtime::Runtime::new().context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        let mut controller = DialController::from_settings(&settings)?;
        let renderer = tokio::spawn(log_renderer(controller.subscribe()));

        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for ctrl-c")?;

        if let Err(err) = controller.stop().await {
            log_error!("failed to stop dial loop cleanly: {err:#}");
        }
        renderer.abort();

        log::info!(
            "final snapshot #{} after shutdown",
            controller.snapshot().sequence
        );
        Ok(())
    })
}
