use crate::models::BatteryInfo;

use super::angle::DialKind;
use super::directive::{AnimationDirective, Easing};

/// Linear move of the gauge hand to the new level when anything changed, a
/// no-op directive otherwise. State changes are rendered as an icon swap, so
/// they only matter for deciding whether to animate.
pub fn animate(prev: &BatteryInfo, new: &BatteryInfo, duration_secs: f64) -> AnimationDirective {
    let changed = prev.level != new.level || prev.state != new.state;

    AnimationDirective {
        dial: DialKind::Battery,
        from: prev.level,
        to: new.level,
        duration_secs: if changed { duration_secs } else { 0.0 },
        easing: Easing::Linear,
        wrapped: false,
    }
}

#[derive(Debug, Clone)]
pub struct BatteryAnimator {
    duration_secs: f64,
    current: BatteryInfo,
}

impl BatteryAnimator {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            current: BatteryInfo::unknown(),
        }
    }

    pub fn current(&self) -> BatteryInfo {
        self.current
    }

    pub fn advance(&mut self, info: BatteryInfo) -> AnimationDirective {
        let info = BatteryInfo::new(info.level, info.state);
        let directive = animate(&self.current, &info, self.duration_secs);
        self.current = info;
        directive
    }
}
