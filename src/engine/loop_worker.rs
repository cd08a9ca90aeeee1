use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    dial::{DialKind, DialState},
    models::BatteryInfo,
    source::TimeSource,
};

use super::processor::DialEngine;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_debug, log_info, log_warn};

pub struct LoopSettings {
    pub tick_interval: Duration,
    pub heartbeat_every_ticks: u32,
}

/// Drives the engine until cancelled. Time ticks and battery notifications
/// are handled one at a time, in whatever order they become ready.
pub async fn dial_loop(
    mut engine: DialEngine,
    mut time_source: Box<dyn TimeSource>,
    mut battery_rx: mpsc::UnboundedReceiver<BatteryInfo>,
    publisher: watch::Sender<Arc<DialState>>,
    settings: LoopSettings,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let heartbeat_every = settings.heartbeat_every_ticks.max(1);
    let mut battery_open = true;
    let mut ticks: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = match time_source.sample() {
                    Ok(sample) => engine.on_time_sample(sample),
                    Err(err) => {
                        log_warn!("time source failed: {err:#}");
                        engine.empty_tick()
                    }
                };

                ticks = ticks.wrapping_add(1);
                if ticks % heartbeat_every == 0 {
                    log_heartbeat(&state);
                }

                publisher.send_replace(state);
            }
            update = battery_rx.recv(), if battery_open => {
                match update {
                    Some(info) => {
                        log_debug!("battery changed: {:.2} {}", info.level, info.state.as_str());
                        publisher.send_replace(engine.on_battery(info));
                    }
                    None => {
                        log_info!("battery feed closed; gauge keeps its last reading");
                        battery_open = false;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("dial loop shutting down");
                break;
            }
        }
    }
}

fn log_heartbeat(state: &DialState) {
    let battery = &state.battery;
    match state.fields {
        Some(fields) => log_info!(
            "dial heartbeat #{}: {:02}:{:02}:{:02} day {} wd {} | second hand {:.2} | battery {:.0}% {}",
            state.sequence,
            fields.hour,
            fields.minute,
            fields.second,
            fields.date_of_month,
            fields.weekday,
            state.dial(DialKind::Second).current_value,
            battery.level * 100.0,
            battery.state.as_str()
        ),
        None => log_info!(
            "dial heartbeat #{}: no time sample yet | battery {:.0}% {}",
            state.sequence,
            battery.level * 100.0,
            battery.state.as_str()
        ),
    }
}
