use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TimeSample;

/// Produces the timestamp for each tick of the dial loop.
pub trait TimeSource: Send {
    fn sample(&mut self) -> Result<TimeSample>;
}

pub fn unix_seconds(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1_000_000_000.0
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn sample(&mut self) -> Result<TimeSample> {
        Ok(TimeSample::new(unix_seconds(Utc::now())))
    }
}

/// Starts at a fixed instant and advances with the wall clock. With
/// `loop_ticks` set it jumps back to the start after that many ticks, which
/// is handy for watching a particular rollover over and over.
#[derive(Debug, Clone)]
pub struct ReplayClock {
    start_timestamp: f64,
    loop_ticks: Option<u32>,
    base: Option<f64>,
    counter: u32,
}

impl ReplayClock {
    pub fn new(start_timestamp: f64, loop_ticks: Option<u32>) -> Self {
        Self {
            start_timestamp,
            loop_ticks,
            base: None,
            counter: 0,
        }
    }

    pub fn sample_at(&mut self, now: f64) -> TimeSample {
        if self.counter == 0 {
            self.base = Some(now);
        }
        let base = *self.base.get_or_insert(now);

        self.counter = match self.loop_ticks {
            Some(limit) if self.counter >= limit => 0,
            _ => self.counter.saturating_add(1),
        };

        TimeSample::new(self.start_timestamp + (now - base))
    }
}

impl TimeSource for ReplayClock {
    fn sample(&mut self) -> Result<TimeSample> {
        Ok(self.sample_at(unix_seconds(Utc::now())))
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    timestamp: f64,
}

impl FixedClock {
    pub fn new(timestamp: f64) -> Self {
        Self { timestamp }
    }
}

impl TimeSource for FixedClock {
    fn sample(&mut self) -> Result<TimeSample> {
        Ok(TimeSample::new(self.timestamp))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SampleMode {
    Live,
    Replay {
        #[serde(rename = "startTimestamp")]
        start_timestamp: f64,
        #[serde(rename = "loopTicks", default)]
        loop_ticks: Option<u32>,
    },
    Fixed {
        timestamp: f64,
    },
}

impl Default for SampleMode {
    fn default() -> Self {
        SampleMode::Live
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleSourceConfig {
    pub tick_interval_ms: u64,
    pub mode: SampleMode,
}

impl Default for SampleSourceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            mode: SampleMode::Live,
        }
    }
}

impl SampleSourceConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn build(&self) -> Box<dyn TimeSource> {
        match self.mode {
            SampleMode::Live => Box::new(SystemClock),
            SampleMode::Replay {
                start_timestamp,
                loop_ticks,
            } => Box::new(ReplayClock::new(start_timestamp, loop_ticks)),
            SampleMode::Fixed { timestamp } => Box::new(FixedClock::new(timestamp)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_advances_with_wall_time() {
        let mut clock = ReplayClock::new(1662229850.0, None);
        assert_eq!(clock.sample_at(500.0).timestamp_seconds, 1662229850.0);
        assert_eq!(clock.sample_at(500.5).timestamp_seconds, 1662229850.5);
        assert_eq!(clock.sample_at(530.0).timestamp_seconds, 1662229880.0);
    }

    #[test]
    fn replay_loops_back_to_start() {
        let mut clock = ReplayClock::new(1000.0, Some(2));
        assert_eq!(clock.sample_at(10.0).timestamp_seconds, 1000.0);
        assert_eq!(clock.sample_at(11.0).timestamp_seconds, 1001.0);
        assert_eq!(clock.sample_at(12.0).timestamp_seconds, 1002.0);
        // Third tick after the base closes the loop.
        assert_eq!(clock.sample_at(13.0).timestamp_seconds, 1000.0);
        assert_eq!(clock.sample_at(14.0).timestamp_seconds, 1001.0);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let mut clock = FixedClock::new(4230.0);
        assert_eq!(clock.sample().unwrap(), TimeSample::new(4230.0));
        assert_eq!(clock.sample().unwrap(), TimeSample::new(4230.0));
    }

    #[test]
    fn system_clock_tracks_now() {
        let before = unix_seconds(Utc::now());
        let sample = SystemClock.sample().unwrap();
        assert!(sample.timestamp_seconds >= before);
        assert!(sample.timestamp_seconds - before < 5.0);
    }

    #[test]
    fn config_parses_replay_mode() {
        let config: SampleSourceConfig = serde_json::from_str(
            r#"{"tickIntervalMs":250,"mode":{"kind":"replay","startTimestamp":1662231590.0,"loopTicks":200}}"#,
        )
        .unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(
            config.mode,
            SampleMode::Replay {
                start_timestamp: 1662231590.0,
                loop_ticks: Some(200)
            }
        );
    }

    #[test]
    fn config_defaults_to_live_ten_hertz() {
        let config: SampleSourceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SampleSourceConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(100));

        let zero = SampleSourceConfig {
            tick_interval_ms: 0,
            mode: SampleMode::Live,
        };
        assert_eq!(zero.tick_interval(), Duration::from_millis(1));
    }
}
