use std::sync::Arc;

use crate::{
    calendar::{Calendar, ZonedCalendar},
    dial::{
        AnimationDirective, AnimationTiming, BatteryAnimator, BatteryReading, ContinuityAnimator,
        DialKind, DialState, DialValue,
    },
    models::{BatteryInfo, BatteryZones, CalendarFields, TimeSample},
    settings::ClockSettings,
};

// Set to true to enable sample failure logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Single-threaded heart of the dial: turns time and battery samples into
/// successive `DialState` snapshots. Time and battery updates touch disjoint
/// dials, so they may arrive in any order.
pub struct DialEngine {
    calendar: Box<dyn Calendar>,
    continuity: ContinuityAnimator,
    battery: BatteryAnimator,
    zones: BatteryZones,
    state: Arc<DialState>,
}

impl DialEngine {
    pub fn new(calendar: Box<dyn Calendar>, timing: AnimationTiming, zones: BatteryZones) -> Self {
        let state = DialState {
            battery: BatteryReading::from_info(BatteryInfo::unknown(), &zones),
            ..DialState::default()
        };

        Self {
            calendar,
            continuity: ContinuityAnimator::new(timing),
            battery: BatteryAnimator::new(timing.battery_duration_secs),
            zones,
            state: Arc::new(state),
        }
    }

    pub fn from_settings(settings: &ClockSettings) -> Self {
        Self::new(
            Box::new(ZonedCalendar::new(settings.calendar)),
            settings.animation,
            settings.battery.zones,
        )
    }

    pub fn snapshot(&self) -> Arc<DialState> {
        self.state.clone()
    }

    pub fn on_time_sample(&mut self, sample: TimeSample) -> Arc<DialState> {
        match self.calendar.decompose(&sample) {
            Ok(fields) => self.apply_fields(Some(sample), fields),
            Err(err) => {
                log_warn!("calendar lookup failed for {}: {err:#}", sample.timestamp_seconds);
                self.empty_tick()
            }
        }
    }

    /// Entry point for callers that already resolved the calendar themselves.
    pub fn on_calendar_fields(&mut self, fields: CalendarFields) -> Arc<DialState> {
        match fields.validate() {
            Ok(()) => self.apply_fields(None, fields),
            Err(err) => {
                log_warn!("rejecting calendar fields: {err:#}");
                self.empty_tick()
            }
        }
    }

    pub fn on_battery(&mut self, info: BatteryInfo) -> Arc<DialState> {
        let directive = self.battery.advance(info);
        let current = self.battery.current();
        let zones = self.zones;

        self.publish(vec![directive], |state| {
            state.battery = BatteryReading::from_info(current, &zones);
            state.dials[DialKind::Battery.index()] =
                DialValue::with_value(DialKind::Battery, current.level);
        })
    }

    /// A tick whose sample could not be obtained. Nothing moves.
    pub fn empty_tick(&mut self) -> Arc<DialState> {
        self.publish(Vec::new(), |_| {})
    }

    fn apply_fields(&mut self, sample: Option<TimeSample>, fields: CalendarFields) -> Arc<DialState> {
        let directives = self.continuity.advance(&fields);
        let continuity = &self.continuity;
        let values: Vec<DialValue> = DialKind::TIME_DIALS
            .iter()
            .filter_map(|&kind| {
                continuity
                    .current_value(kind)
                    .map(|value| DialValue::with_value(kind, value))
            })
            .collect();

        self.publish(directives, |state| {
            state.sample = sample;
            state.fields = Some(fields);
            for value in values {
                state.dials[value.kind.index()] = value;
            }
        })
    }

    fn publish(
        &mut self,
        directives: Vec<AnimationDirective>,
        update: impl FnOnce(&mut DialState),
    ) -> Arc<DialState> {
        let mut next = DialState::clone(&self.state);
        next.sequence = next.sequence.wrapping_add(1);
        next.directives = directives;
        update(&mut next);

        self.state = Arc::new(next);
        self.state.clone()
    }
}
