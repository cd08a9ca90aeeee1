use serde::{Deserialize, Serialize};

use super::angle::DialKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInOut,
}

/// Instruction for the renderer: move `dial` from `from` to `to` over
/// `duration_secs`. A zero duration means snap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDirective {
    pub dial: DialKind,
    pub from: f64,
    pub to: f64,
    pub duration_secs: f64,
    pub easing: Easing,
    /// Set when `to` is the overshoot target at a wrap boundary.
    pub wrapped: bool,
}

impl AnimationDirective {
    pub fn is_instant(&self) -> bool {
        self.duration_secs <= 0.0
    }
}
