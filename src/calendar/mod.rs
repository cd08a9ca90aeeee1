use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CalendarFields, TimeSample};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Splits a timestamp into calendar sub-fields.
pub trait Calendar: Send {
    fn decompose(&self, sample: &TimeSample) -> Result<CalendarFields>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "zone")]
pub enum CalendarZone {
    Local,
    Utc,
    FixedOffset {
        #[serde(rename = "offsetSecs")]
        offset_secs: i32,
    },
}

impl Default for CalendarZone {
    fn default() -> Self {
        CalendarZone::Local
    }
}

/// chrono-backed calendar for a single zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZonedCalendar {
    zone: CalendarZone,
}

impl ZonedCalendar {
    pub fn new(zone: CalendarZone) -> Self {
        Self { zone }
    }
}

impl Calendar for ZonedCalendar {
    fn decompose(&self, sample: &TimeSample) -> Result<CalendarFields> {
        let utc = to_utc(sample)?;
        let fields = match self.zone {
            CalendarZone::Local => fields_of(&utc.with_timezone(&Local)),
            CalendarZone::Utc => fields_of(&utc),
            CalendarZone::FixedOffset { offset_secs } => {
                let offset = FixedOffset::east_opt(offset_secs)
                    .ok_or_else(|| anyhow!("invalid utc offset {offset_secs}s"))?;
                fields_of(&utc.with_timezone(&offset))
            }
        };
        Ok(fields)
    }
}

fn to_utc(sample: &TimeSample) -> Result<DateTime<Utc>> {
    let timestamp = sample.timestamp_seconds;
    if !timestamp.is_finite() {
        bail!("timestamp {timestamp} is not finite");
    }

    let mut secs = timestamp.floor();
    let mut nanos = ((timestamp - secs) * NANOS_PER_SECOND as f64).round() as u32;
    if nanos >= NANOS_PER_SECOND {
        secs += 1.0;
        nanos = 0;
    }

    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        bail!("timestamp {timestamp} out of range");
    }

    DateTime::from_timestamp(secs as i64, nanos)
        .ok_or_else(|| anyhow!("timestamp {timestamp} out of calendar range"))
}

fn fields_of<Tz: TimeZone>(dt: &DateTime<Tz>) -> CalendarFields {
    // Leap seconds show up as nanos past one second on second 59.
    let nanos = dt.nanosecond() % NANOS_PER_SECOND;

    CalendarFields {
        date_of_month: dt.day(),
        weekday: dt.weekday().num_days_from_sunday(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second().min(59),
        subsecond_fraction: nanos as f64 / NANOS_PER_SECOND as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> ZonedCalendar {
        ZonedCalendar::new(CalendarZone::Utc)
    }

    #[test]
    fn decomposes_unix_epoch() {
        let fields = utc().decompose(&TimeSample::new(0.0)).unwrap();
        // 1970-01-01 was a Thursday.
        assert_eq!(fields.date_of_month, 1);
        assert_eq!(fields.weekday, 4);
        assert_eq!((fields.hour, fields.minute, fields.second), (0, 0, 0));
        assert_eq!(fields.subsecond_fraction, 0.0);
    }

    #[test]
    fn decomposes_screenshot_instant() {
        // 4230s = 01:10:30 on the epoch day.
        let fields = utc().decompose(&TimeSample::new(4230.25)).unwrap();
        assert_eq!((fields.hour, fields.minute, fields.second), (1, 10, 30));
        assert!((fields.subsecond_fraction - 0.25).abs() < 1e-6);
    }

    #[test]
    fn decomposes_replay_start() {
        // 2022-09-03T18:30:50Z, a Saturday.
        let fields = utc().decompose(&TimeSample::new(1662229850.0)).unwrap();
        assert_eq!(fields.date_of_month, 3);
        assert_eq!(fields.weekday, 6);
        assert_eq!((fields.hour, fields.minute, fields.second), (18, 30, 50));
    }

    #[test]
    fn applies_fixed_offset() {
        let calendar = ZonedCalendar::new(CalendarZone::FixedOffset { offset_secs: 9 * 3600 });
        let fields = calendar.decompose(&TimeSample::new(1662229850.0)).unwrap();
        // 03:30:50 on Sunday the 4th in UTC+9.
        assert_eq!(fields.date_of_month, 4);
        assert_eq!(fields.weekday, 0);
        assert_eq!(fields.hour, 3);
    }

    #[test]
    fn fraction_rounding_never_reaches_one() {
        let fields = utc().decompose(&TimeSample::new(59.9999999999)).unwrap();
        assert_eq!(fields.minute, 1);
        assert_eq!(fields.second, 0);
        assert_eq!(fields.subsecond_fraction, 0.0);
    }

    #[test]
    fn rejects_unusable_samples() {
        assert!(utc().decompose(&TimeSample::new(f64::NAN)).is_err());
        assert!(utc().decompose(&TimeSample::new(f64::INFINITY)).is_err());
        assert!(utc().decompose(&TimeSample::new(1e300)).is_err());

        let bad_offset = ZonedCalendar::new(CalendarZone::FixedOffset { offset_secs: 90_000 });
        assert!(bad_offset.decompose(&TimeSample::new(0.0)).is_err());
    }

    #[test]
    fn zone_settings_round_trip_through_json() {
        let zone: CalendarZone =
            serde_json::from_str(r#"{"zone":"fixedOffset","offsetSecs":3600}"#).unwrap();
        assert_eq!(zone, CalendarZone::FixedOffset { offset_secs: 3600 });
        let local: CalendarZone = serde_json::from_str(r#"{"zone":"local"}"#).unwrap();
        assert_eq!(local, CalendarZone::Local);
    }
}
