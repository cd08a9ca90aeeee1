use serde::{Deserialize, Serialize};

use crate::models::CalendarFields;

/// Full sweep of the battery gauge arc, centred on twelve o'clock.
pub const GAUGE_SWEEP_DEGREES: f64 = 160.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum DialKind {
    Hour,
    Minute,
    Second,
    DateOfMonth,
    Weekday,
    Battery,
}

impl DialKind {
    pub const ALL: [DialKind; 6] = [
        DialKind::Hour,
        DialKind::Minute,
        DialKind::Second,
        DialKind::DateOfMonth,
        DialKind::Weekday,
        DialKind::Battery,
    ];

    /// Dials driven by the clock, in the order directives are emitted.
    pub const TIME_DIALS: [DialKind; 5] = [
        DialKind::Hour,
        DialKind::Minute,
        DialKind::Second,
        DialKind::DateOfMonth,
        DialKind::Weekday,
    ];

    pub fn index(self) -> usize {
        match self {
            DialKind::Hour => 0,
            DialKind::Minute => 1,
            DialKind::Second => 2,
            DialKind::DateOfMonth => 3,
            DialKind::Weekday => 4,
            DialKind::Battery => 5,
        }
    }

    /// Cycle length of the dial's value. The hour hand wraps at 24 so a fresh
    /// day is distinguishable from noon.
    pub fn modulus(self) -> f64 {
        match self {
            DialKind::Hour => 24.0,
            DialKind::Minute | DialKind::Second => 60.0,
            DialKind::DateOfMonth => 31.0,
            DialKind::Weekday => 7.0,
            DialKind::Battery => 1.0,
        }
    }

    /// Units per full turn on the face.
    pub fn face_modulus(self) -> f64 {
        match self {
            DialKind::Hour => 12.0,
            other => other.modulus(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DialKind::Hour => "hour",
            DialKind::Minute => "minute",
            DialKind::Second => "second",
            DialKind::DateOfMonth => "dateOfMonth",
            DialKind::Weekday => "weekday",
            DialKind::Battery => "battery",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SecondHandMode {
    /// Jumps once per second.
    Tick,
    /// Follows the sub-second fraction.
    Sweep,
}

impl Default for SecondHandMode {
    fn default() -> Self {
        SecondHandMode::Tick
    }
}

/// Fractional position of a time dial. Battery has no calendar position and
/// reads as 0 here.
pub fn continuous_value(kind: DialKind, fields: &CalendarFields, mode: SecondHandMode) -> f64 {
    let minute = fields.minute as f64;
    let second = fields.second as f64;

    match kind {
        DialKind::Hour => fields.hour as f64 + (minute + second / 60.0) / 60.0,
        DialKind::Minute => minute + second / 60.0,
        DialKind::Second => match mode {
            SecondHandMode::Tick => second,
            SecondHandMode::Sweep => second + fields.subsecond_fraction,
        },
        DialKind::DateOfMonth => fields.date_of_month.saturating_sub(1) as f64,
        DialKind::Weekday => fields.weekday as f64,
        DialKind::Battery => 0.0,
    }
}

/// The calendar field whose reset marks the dial's wrap.
pub fn leading_field(kind: DialKind, fields: &CalendarFields) -> u32 {
    match kind {
        DialKind::Hour => fields.hour,
        DialKind::Minute => fields.minute,
        DialKind::Second => fields.second,
        DialKind::DateOfMonth => fields.date_of_month.saturating_sub(1),
        DialKind::Weekday => fields.weekday,
        DialKind::Battery => 0,
    }
}

/// Rotation of a dial on the face, before any per-dial orientation the
/// renderer applies. Values at `modulus` come out as whole turns.
pub fn rotation_degrees(kind: DialKind, value: f64) -> f64 {
    match kind {
        DialKind::Battery => gauge_degrees(value),
        other => 360.0 * value / other.face_modulus(),
    }
}

pub fn gauge_degrees(level: f64) -> f64 {
    GAUGE_SWEEP_DEGREES * (level - 0.5)
}

/// Reduces an angle to [0, 360).
pub fn normalized_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(hour: u32, minute: u32, second: u32, fraction: f64) -> CalendarFields {
        CalendarFields::at(hour, minute, second, fraction).unwrap()
    }

    #[test]
    fn hour_value_includes_minutes_and_seconds() {
        let value = continuous_value(DialKind::Hour, &fields(6, 30, 0, 0.0), SecondHandMode::Tick);
        assert_eq!(value, 6.5);

        let value = continuous_value(DialKind::Hour, &fields(13, 0, 36, 0.0), SecondHandMode::Tick);
        assert!((value - 13.01).abs() < 1e-9);
    }

    #[test]
    fn minute_value_includes_seconds() {
        let value = continuous_value(DialKind::Minute, &fields(0, 15, 30, 0.0), SecondHandMode::Tick);
        assert_eq!(value, 15.5);
    }

    #[test]
    fn second_value_depends_on_mode() {
        let f = fields(0, 0, 42, 0.75);
        assert_eq!(continuous_value(DialKind::Second, &f, SecondHandMode::Tick), 42.0);
        assert_eq!(continuous_value(DialKind::Second, &f, SecondHandMode::Sweep), 42.75);
    }

    #[test]
    fn wheels_are_zero_based() {
        let f = CalendarFields::new(17, 3, 0, 0, 0, 0.0).unwrap();
        assert_eq!(continuous_value(DialKind::DateOfMonth, &f, SecondHandMode::Tick), 16.0);
        assert_eq!(continuous_value(DialKind::Weekday, &f, SecondHandMode::Tick), 3.0);
    }

    #[test]
    fn hour_hand_turns_twice_a_day() {
        assert_eq!(rotation_degrees(DialKind::Hour, 3.0), 90.0);
        assert_eq!(rotation_degrees(DialKind::Hour, 15.0), 450.0);
        assert_eq!(normalized_degrees(rotation_degrees(DialKind::Hour, 15.0)), 90.0);
    }

    #[test]
    fn zero_and_modulus_render_the_same() {
        for kind in DialKind::TIME_DIALS {
            let home = normalized_degrees(rotation_degrees(kind, 0.0));
            let full = normalized_degrees(rotation_degrees(kind, kind.modulus()));
            assert_ne!(0.0, kind.modulus());
            assert_eq!(home, full, "{}", kind.as_str());
        }
        assert_eq!(rotation_degrees(DialKind::Second, 60.0), 360.0);
    }

    #[test]
    fn gauge_spans_its_arc() {
        assert_eq!(gauge_degrees(0.0), -80.0);
        assert_eq!(gauge_degrees(0.5), 0.0);
        assert_eq!(gauge_degrees(1.0), 80.0);
        assert_eq!(rotation_degrees(DialKind::Battery, 1.0), 80.0);
    }

    #[test]
    fn normalization_wraps_negative_angles() {
        assert_eq!(normalized_degrees(-90.0), 270.0);
        assert_eq!(normalized_degrees(720.0), 0.0);
        assert!(normalized_degrees(-1e-20) < 360.0);
    }
}
