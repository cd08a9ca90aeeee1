pub mod battery;
pub mod calendar;

pub use battery::{BatteryInfo, BatteryState, BatteryZone, BatteryZones};
pub use calendar::{CalendarFields, TimeSample};
