use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BatteryState {
    Unknown,
    Unplugged,
    Charging,
    Full,
}

impl Default for BatteryState {
    fn default() -> Self {
        BatteryState::Unknown
    }
}

impl BatteryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryState::Unknown => "unknown",
            BatteryState::Unplugged => "unplugged",
            BatteryState::Charging => "charging",
            BatteryState::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub level: f64,
    pub state: BatteryState,
}

impl Default for BatteryInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

impl BatteryInfo {
    /// Builds a reading with the level clamped to [0, 1]. Platforms report
    /// -1 for an unknown level, which lands on 0.
    pub fn new(level: f64, state: BatteryState) -> Self {
        Self {
            level: clamp_level(level),
            state,
        }
    }

    pub fn unknown() -> Self {
        Self {
            level: 0.0,
            state: BatteryState::Unknown,
        }
    }

    /// Derives a reading from a power source's capacity counters.
    pub fn from_power_source(capacity: u32, max_capacity: u32, on_ac_power: bool) -> Self {
        if max_capacity == 0 {
            return Self::unknown();
        }

        let state = match (on_ac_power, capacity >= max_capacity) {
            (true, true) => BatteryState::Full,
            (true, false) => BatteryState::Charging,
            (false, _) => BatteryState::Unplugged,
        };

        Self::new(capacity as f64 / max_capacity as f64, state)
    }
}

fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BatteryZone {
    Danger,
    Warning,
    Good,
}

/// Gauge zone boundaries. Levels below `warning_from` are in danger, levels
/// from `good_from` up are good.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatteryZones {
    pub warning_from: f64,
    pub good_from: f64,
}

impl Default for BatteryZones {
    fn default() -> Self {
        Self {
            warning_from: 0.2,
            good_from: 0.7,
        }
    }
}

impl BatteryZones {
    pub fn classify(&self, level: f64) -> BatteryZone {
        if level < self.warning_from {
            BatteryZone::Danger
        } else if level < self.good_from {
            BatteryZone::Warning
        } else {
            BatteryZone::Good
        }
    }
}
