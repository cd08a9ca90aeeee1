use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// One reading of the wall clock, in Unix seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSample {
    pub timestamp_seconds: f64,
}

impl TimeSample {
    pub fn new(timestamp_seconds: f64) -> Self {
        Self { timestamp_seconds }
    }
}

/// Calendar sub-fields of a sample, already resolved against a time zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFields {
    /// 1..=31
    pub date_of_month: u32,
    /// Zero-based from Sunday, 0..=6
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Fraction of the current second, in [0, 1)
    pub subsecond_fraction: f64,
}

impl Default for CalendarFields {
    fn default() -> Self {
        Self {
            date_of_month: 1,
            weekday: 0,
            hour: 0,
            minute: 0,
            second: 0,
            subsecond_fraction: 0.0,
        }
    }
}

impl CalendarFields {
    pub fn new(
        date_of_month: u32,
        weekday: u32,
        hour: u32,
        minute: u32,
        second: u32,
        subsecond_fraction: f64,
    ) -> Result<Self> {
        let fields = Self {
            date_of_month,
            weekday,
            hour,
            minute,
            second,
            subsecond_fraction,
        };
        fields.validate()?;
        Ok(fields)
    }

    /// Shorthand for the common test and replay case of a time of day on a
    /// fixed date.
    pub fn at(hour: u32, minute: u32, second: u32, subsecond_fraction: f64) -> Result<Self> {
        Self::new(1, 0, hour, minute, second, subsecond_fraction)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.date_of_month) {
            bail!("date of month {} out of range 1..=31", self.date_of_month);
        }
        if self.weekday > 6 {
            bail!("weekday {} out of range 0..=6", self.weekday);
        }
        if self.hour > 23 {
            bail!("hour {} out of range 0..=23", self.hour);
        }
        if self.minute > 59 {
            bail!("minute {} out of range 0..=59", self.minute);
        }
        if self.second > 59 {
            bail!("second {} out of range 0..=59", self.second);
        }
        if !(0.0..1.0).contains(&self.subsecond_fraction) {
            bail!(
                "subsecond fraction {} out of range [0, 1)",
                self.subsecond_fraction
            );
        }
        Ok(())
    }

    pub fn is_midnight_minute(&self) -> bool {
        self.hour == 0 && self.minute == 0
    }

    /// Seconds elapsed since midnight, including the sub-second fraction.
    pub fn seconds_into_day(&self) -> f64 {
        (self.hour * 3600 + self.minute * 60 + self.second) as f64 + self.subsecond_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(CalendarFields::new(0, 0, 0, 0, 0, 0.0).is_err());
        assert!(CalendarFields::new(32, 0, 0, 0, 0, 0.0).is_err());
        assert!(CalendarFields::new(1, 7, 0, 0, 0, 0.0).is_err());
        assert!(CalendarFields::new(1, 0, 24, 0, 0, 0.0).is_err());
        assert!(CalendarFields::new(1, 0, 0, 60, 0, 0.0).is_err());
        assert!(CalendarFields::new(1, 0, 0, 0, 60, 0.0).is_err());
        assert!(CalendarFields::new(1, 0, 0, 0, 0, 1.0).is_err());
        assert!(CalendarFields::new(1, 0, 0, 0, 0, f64::NAN).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(CalendarFields::new(31, 6, 23, 59, 59, 0.999).is_ok());
        assert!(CalendarFields::at(0, 0, 0, 0.0).is_ok());
    }

    #[test]
    fn seconds_into_day_counts_from_midnight() {
        assert_eq!(CalendarFields::at(0, 0, 0, 0.0).unwrap().seconds_into_day(), 0.0);
        assert_eq!(CalendarFields::at(1, 10, 30, 0.5).unwrap().seconds_into_day(), 4230.5);
        assert_eq!(CalendarFields::at(23, 59, 59, 0.0).unwrap().seconds_into_day(), 86_399.0);
    }
}
