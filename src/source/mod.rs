pub mod battery;
pub mod clock;

pub use battery::{BatteryNotifier, BatterySource, ChannelBattery, FixedBattery};
pub use clock::{FixedClock, ReplayClock, SampleMode, SampleSourceConfig, SystemClock, TimeSource};
