pub mod angle;
pub mod battery;
pub mod config;
pub mod continuity;
pub mod directive;
pub mod state;

pub use angle::{DialKind, SecondHandMode};
pub use battery::BatteryAnimator;
pub use config::AnimationTiming;
pub use continuity::ContinuityAnimator;
pub use directive::{AnimationDirective, Easing};
pub use state::{BatteryReading, DialState, DialValue};
