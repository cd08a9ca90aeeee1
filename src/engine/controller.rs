use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    dial::DialState,
    settings::ClockSettings,
    source::{BatterySource, FixedBattery, TimeSource},
};

use super::processor::DialEngine;
use super::loop_worker::{dial_loop, LoopSettings};

// Set to true to enable lifecycle logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Owns the running dial loop and hands out its snapshots.
pub struct DialController {
    state_rx: watch::Receiver<Arc<DialState>>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl DialController {
    /// Spawns the loop on the current tokio runtime. The battery gauge is
    /// primed from the source before the first tick.
    pub fn start(
        mut engine: DialEngine,
        time_source: Box<dyn TimeSource>,
        mut battery: Box<dyn BatterySource>,
        tick_interval: Duration,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("dial controller needs a running tokio runtime")?;

        match battery.current() {
            Ok(info) => {
                engine.on_battery(info);
            }
            Err(err) => {
                log_warn!("battery unavailable, gauge starts unknown: {err:#}");
            }
        }

        let battery_rx = match battery.subscribe() {
            Ok(rx) => rx,
            Err(err) => {
                log_warn!("battery notifications unavailable: {err:#}");
                let (_tx, rx) = mpsc::unbounded_channel();
                rx
            }
        };

        let (state_tx, state_rx) = watch::channel(engine.snapshot());
        let cancel_token = CancellationToken::new();

        let settings = LoopSettings {
            tick_interval,
            heartbeat_every_ticks: if debug_mode() { 1 } else { 10 },
        };

        let handle = runtime.spawn(dial_loop(
            engine,
            time_source,
            battery_rx,
            state_tx,
            settings,
            cancel_token.clone(),
        ));

        log_info!("dial loop started, ticking every {}ms", tick_interval.as_millis());

        Ok(Self {
            state_rx,
            handle: Some(handle),
            cancel_token: Some(cancel_token),
        })
    }

    /// Builds the engine, clock and battery described by `settings`.
    pub fn from_settings(settings: &ClockSettings) -> Result<Self> {
        let battery: Box<dyn BatterySource> = match settings.battery.fixed {
            Some(info) => Box::new(FixedBattery::new(info)),
            None => Box::new(FixedBattery::default()),
        };

        Self::start(
            DialEngine::from_settings(settings),
            settings.sample_source.build(),
            battery,
            settings.sample_source.tick_interval(),
        )
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DialState>> {
        self.state_rx.clone()
    }

    pub fn snapshot(&self) -> Arc<DialState> {
        self.state_rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stops feeding samples and waits for the loop to exit.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(token) = self.cancel_token.take() else {
            bail!("dial loop already stopped");
        };
        token.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await.context("dial loop task failed to join")?;
        }

        log_info!("dial loop stopped");
        Ok(())
    }
}

impl Drop for DialController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

fn debug_mode() -> bool {
    std::env::var("CHRONODIAL_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
