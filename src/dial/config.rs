use serde::{Deserialize, Serialize};

use super::angle::{DialKind, SecondHandMode};
use super::directive::Easing;

/// Animation cadence for every dial. The defaults are tuned for a ~10Hz tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationTiming {
    /// Hour, minute and second hands
    pub hand_duration_secs: f64,
    /// Date and weekday wheels
    pub wheel_duration_secs: f64,
    pub battery_duration_secs: f64,
    /// A second hand at :00 only overshoots while the sub-second fraction is
    /// below this.
    pub second_wrap_threshold: f64,
    pub second_hand: SecondHandMode,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            hand_duration_secs: 0.35,
            wheel_duration_secs: 3.0,
            battery_duration_secs: 5.0,
            second_wrap_threshold: 0.5,
            second_hand: SecondHandMode::Tick,
        }
    }
}

impl AnimationTiming {
    pub fn motion_for(&self, kind: DialKind) -> (f64, Easing) {
        match kind {
            DialKind::DateOfMonth | DialKind::Weekday => (self.wheel_duration_secs, Easing::Linear),
            DialKind::Battery => (self.battery_duration_secs, Easing::Linear),
            DialKind::Hour | DialKind::Minute | DialKind::Second => {
                (self.hand_duration_secs, Easing::EaseInOut)
            }
        }
    }
}
