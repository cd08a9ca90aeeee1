use serde::{Deserialize, Serialize};

use crate::models::{BatteryInfo, BatteryState, BatteryZone, BatteryZones, CalendarFields, TimeSample};

use super::angle::{gauge_degrees, rotation_degrees, DialKind};
use super::directive::AnimationDirective;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DialValue {
    pub kind: DialKind,
    pub modulus: f64,
    pub current_value: f64,
}

impl DialValue {
    pub fn home(kind: DialKind) -> Self {
        Self {
            kind,
            modulus: kind.modulus(),
            current_value: 0.0,
        }
    }

    pub fn with_value(kind: DialKind, current_value: f64) -> Self {
        Self {
            kind,
            modulus: kind.modulus(),
            current_value,
        }
    }

    pub fn rotation_degrees(&self) -> f64 {
        rotation_degrees(self.kind, self.current_value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatteryReading {
    pub level: f64,
    pub state: BatteryState,
    pub zone: BatteryZone,
    pub gauge_degrees: f64,
}

impl BatteryReading {
    pub fn from_info(info: BatteryInfo, zones: &BatteryZones) -> Self {
        Self {
            level: info.level,
            state: info.state,
            zone: zones.classify(info.level),
            gauge_degrees: gauge_degrees(info.level),
        }
    }
}

/// Everything the renderer needs for one tick. Snapshots are replaced, never
/// edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DialState {
    pub sequence: u64,
    /// Time sample behind the dial values, if one has been decoded yet.
    pub sample: Option<TimeSample>,
    pub fields: Option<CalendarFields>,
    /// Indexed by `DialKind::index`.
    pub dials: [DialValue; 6],
    pub battery: BatteryReading,
    /// Directives produced by this tick only. Empty when the tick carried no
    /// usable sample.
    pub directives: Vec<AnimationDirective>,
}

impl Default for DialState {
    fn default() -> Self {
        Self {
            sequence: 0,
            sample: None,
            fields: None,
            dials: DialKind::ALL.map(DialValue::home),
            battery: BatteryReading::from_info(BatteryInfo::unknown(), &BatteryZones::default()),
            directives: Vec::new(),
        }
    }
}

impl DialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dial(&self, kind: DialKind) -> &DialValue {
        &self.dials[kind.index()]
    }

    pub fn directive(&self, kind: DialKind) -> Option<&AnimationDirective> {
        self.directives.iter().find(|directive| directive.dial == kind)
    }

    pub fn is_empty_tick(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_one_home_value_per_dial() {
        let state = DialState::new();
        for kind in DialKind::ALL {
            let dial = state.dial(kind);
            assert_eq!(dial.kind, kind);
            assert_eq!(dial.modulus, kind.modulus());
            assert_eq!(dial.current_value, 0.0);
        }
        assert!(state.is_empty_tick());
        assert_eq!(state.battery.state, BatteryState::Unknown);
        assert_eq!(state.battery.zone, BatteryZone::Danger);
    }

    #[test]
    fn overshoot_value_renders_as_a_full_turn() {
        let overshoot = DialValue::with_value(DialKind::Minute, 60.0);
        assert_eq!(overshoot.rotation_degrees(), 360.0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(DialState::new()).unwrap();
        assert!(json.get("directives").is_some());
        assert_eq!(json["dials"][0]["kind"], "hour");
        assert_eq!(json["dials"][3]["currentValue"], 0.0);
        assert_eq!(json["battery"]["gaugeDegrees"], -80.0);
    }
}
