use crate::models::CalendarFields;

use super::angle::{continuous_value, leading_field, DialKind};
use super::config::AnimationTiming;
use super::directive::AnimationDirective;

// Set to true to log wrap detection at debug level
const ENABLE_LOGS: bool = true;

use crate::log_debug;

const VALUE_EPSILON: f64 = 1e-9;

/// What the animator remembers about one dial between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DialTrack {
    /// Last emitted target reduced into [0, modulus).
    prev: f64,
    /// The last emitted target was the overshoot value `modulus`.
    overshoot: bool,
}

impl Default for DialTrack {
    fn default() -> Self {
        Self {
            prev: 0.0,
            overshoot: false,
        }
    }
}

impl DialTrack {
    /// Where the renderer is currently heading.
    fn displayed(&self, modulus: f64) -> f64 {
        if self.overshoot {
            modulus
        } else {
            self.prev
        }
    }
}

/// Turns successive calendar readings into per-dial animation directives
/// that never move a hand backward across its wrap boundary.
#[derive(Debug, Clone)]
pub struct ContinuityAnimator {
    timing: AnimationTiming,
    tracks: [DialTrack; DialKind::TIME_DIALS.len()],
    last_fields: Option<CalendarFields>,
}

impl Default for ContinuityAnimator {
    fn default() -> Self {
        Self::new(AnimationTiming::default())
    }
}

impl ContinuityAnimator {
    pub fn new(timing: AnimationTiming) -> Self {
        Self {
            timing,
            tracks: [DialTrack::default(); DialKind::TIME_DIALS.len()],
            last_fields: None,
        }
    }

    /// One directive per time dial, in `DialKind::TIME_DIALS` order.
    pub fn advance(&mut self, fields: &CalendarFields) -> Vec<AnimationDirective> {
        let forward = self.moved_forward(fields);
        let directives = DialKind::TIME_DIALS
            .iter()
            .filter_map(|&kind| self.step(kind, fields, forward))
            .collect();
        self.last_fields = Some(*fields);
        directives
    }

    /// Whether `fields` is later than the previous reading. A change of date
    /// counts as forward.
    fn moved_forward(&self, fields: &CalendarFields) -> bool {
        match &self.last_fields {
            Some(last) if last.date_of_month == fields.date_of_month => {
                fields.seconds_into_day() >= last.seconds_into_day()
            }
            _ => true,
        }
    }

    /// Steps a single dial. Returns `None` for dials this animator does not
    /// drive.
    fn step(
        &mut self,
        kind: DialKind,
        fields: &CalendarFields,
        forward: bool,
    ) -> Option<AnimationDirective> {
        let index = kind.index();
        let track = *self.tracks.get(index)?;
        let modulus = kind.modulus();

        let raw = continuous_value(kind, fields, self.timing.second_hand);
        // A wrap needs the value to have actually come around (or to be held
        // from the previous tick); a start inside the boundary instant is not one.
        let crossed = track.overshoot || raw < track.prev - VALUE_EPSILON;
        let wrapped =
            crossed && (track.overshoot || forward) && self.is_wrap_instant(kind, fields);
        let target = if wrapped { modulus } else { raw };

        let settling = track.overshoot && leading_field(kind, fields) == 0;
        // Past the boundary the held overshoot restarts from home, which
        // renders the same as `modulus`.
        let rebasing = track.overshoot && !wrapped && !settling;
        let from = if rebasing {
            track.prev
        } else {
            track.displayed(modulus)
        };
        // Came around between samples without landing on the wrap instant.
        let skipped_wrap = crossed && !track.overshoot && !wrapped && forward;

        let (duration_secs, easing) = self.timing.motion_for(kind);
        let duration_secs =
            if settling || skipped_wrap || (target - from).abs() < VALUE_EPSILON {
                0.0
            } else {
                duration_secs
            };

        if wrapped && !track.overshoot {
            log_debug!(
                "{} dial wrapping: {:.3} -> {}",
                kind.as_str(),
                from,
                modulus
            );
        }

        self.tracks[index] = DialTrack {
            prev: target.rem_euclid(modulus),
            overshoot: wrapped,
        };

        Some(AnimationDirective {
            dial: kind,
            from,
            to: target,
            duration_secs,
            easing,
            wrapped,
        })
    }

    /// Stored comparison value, always in [0, modulus).
    pub fn prev(&self, kind: DialKind) -> Option<f64> {
        self.tracks.get(kind.index()).map(|track| track.prev)
    }

    /// Position the renderer is animating toward, which is `modulus` while a
    /// wrap is being held.
    pub fn current_value(&self, kind: DialKind) -> Option<f64> {
        self.tracks
            .get(kind.index())
            .map(|track| track.displayed(kind.modulus()))
    }

    pub fn is_overshooting(&self, kind: DialKind) -> bool {
        self.tracks
            .get(kind.index())
            .map(|track| track.overshoot)
            .unwrap_or(false)
    }

    /// Returns every hand to its home position.
    pub fn reset(&mut self) {
        self.tracks = [DialTrack::default(); DialKind::TIME_DIALS.len()];
        self.last_fields = None;
    }

    fn is_wrap_instant(&self, kind: DialKind, fields: &CalendarFields) -> bool {
        match kind {
            DialKind::Second => {
                fields.second == 0 && fields.subsecond_fraction < self.timing.second_wrap_threshold
            }
            DialKind::Minute => fields.minute == 0 && fields.second == 0,
            DialKind::Hour => fields.hour == 0 && fields.minute == 0 && fields.second == 0,
            // Wheels hold the overshoot for the whole first minute so the
            // slow sweep finishes before it is re-based.
            DialKind::DateOfMonth => fields.date_of_month == 1 && fields.is_midnight_minute(),
            DialKind::Weekday => fields.weekday == 0 && fields.is_midnight_minute(),
            DialKind::Battery => false,
        }
    }
}
