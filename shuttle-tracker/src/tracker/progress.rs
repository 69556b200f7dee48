//! Trip progress estimation.
//!
//! A state machine that consumes position fixes against the expanded
//! service schedule. Progress along the current leg is the ratio of the
//! distance travelled from the previous stop to the full leg distance;
//! arriving within a fixed radius of the target stop overrides that with
//! "at stop".

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use crate::domain::distance_meters;
use crate::query::ServiceStop;

use super::position::PositionFix;

/// Radius around the target stop that counts as "at the stop", in
/// meters. A fixed policy constant, not configurable.
pub const AT_STOP_THRESHOLD_METERS: f64 = 6.0;

/// Where the tracked run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No position fix received yet.
    AwaitingFix,
    /// Moving along the leg towards the current target stop.
    EnRoute,
    /// Within the at-stop radius of the current target stop.
    AtStop,
    /// Past the last stop; further fixes are ignored. Terminal.
    Finished,
}

/// Signed offset from the schedule at the current target stop.
///
/// Computed as `scheduled_arrival - now`. A negative value means the
/// run is late and is displayed with a leading `+`; a non-negative
/// value means ahead of (or on) schedule and is displayed with a
/// leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDeviation(Duration);

impl ScheduleDeviation {
    pub fn new(offset: Duration) -> Self {
        Self(offset)
    }

    /// The raw `scheduled_arrival - now` offset.
    pub fn offset(&self) -> Duration {
        self.0
    }

    /// True when the run is behind schedule.
    pub fn is_running_late(&self) -> bool {
        self.0 < Duration::zero()
    }
}

impl fmt::Display for ScheduleDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_running_late() { '+' } else { '-' };
        let total_seconds = self.0.num_seconds().abs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        write!(f, "{sign}{minutes:02}:{seconds:02}")
    }
}

/// Per-run progress state, created when a driver starts a run and
/// discarded when the run ends.
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    schedule: Vec<ServiceStop>,
    state: TrackerState,
    current_index: usize,
    progress_percent: f64,
    distance_to_target: Option<f64>,
    deviation: Option<ScheduleDeviation>,
}

impl ProgressEstimator {
    /// Start tracking against an expanded service schedule.
    ///
    /// An empty schedule starts (and stays) `Finished`.
    pub fn new(schedule: Vec<ServiceStop>) -> Self {
        let state = if schedule.is_empty() {
            TrackerState::Finished
        } else {
            TrackerState::AwaitingFix
        };
        Self {
            schedule,
            state,
            current_index: 0,
            progress_percent: 0.0,
            distance_to_target: None,
            deviation: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Index of the current target stop in the schedule.
    pub fn current_stop_index(&self) -> usize {
        self.current_index
    }

    /// The current target stop; `None` once finished.
    pub fn current_stop(&self) -> Option<&ServiceStop> {
        if self.state == TrackerState::Finished {
            return None;
        }
        self.schedule.get(self.current_index)
    }

    /// The stop after the current target, if any.
    pub fn next_stop(&self) -> Option<&ServiceStop> {
        if self.state == TrackerState::Finished {
            return None;
        }
        self.schedule.get(self.current_index + 1)
    }

    /// Progress along the current leg, 0-100.
    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// Distance from the latest fix to the current target stop.
    pub fn distance_to_target_meters(&self) -> Option<f64> {
        self.distance_to_target
    }

    /// The latest schedule deviation, once a timer tick computed one.
    pub fn deviation(&self) -> Option<ScheduleDeviation> {
        self.deviation
    }

    /// Consume one position fix.
    ///
    /// Each fix overwrites the previous-derived state; fixes are never
    /// queued. Ignored once finished.
    pub fn on_fix(&mut self, fix: &PositionFix) {
        if self.state == TrackerState::Finished {
            return;
        }
        let Some(target) = self.schedule.get(self.current_index) else {
            return;
        };

        let distance = distance_meters(fix.coordinates(), target.coordinates);
        self.distance_to_target = Some(distance);

        if distance < AT_STOP_THRESHOLD_METERS {
            self.state = TrackerState::AtStop;
            self.progress_percent = 100.0;
            return;
        }

        self.state = TrackerState::EnRoute;

        if self.current_index == 0 {
            // No previous reference point: progress stays at zero until
            // the at-stop rule fires.
            self.progress_percent = 0.0;
            return;
        }

        let previous = &self.schedule[self.current_index - 1];
        let leg = distance_meters(previous.coordinates, target.coordinates);
        if leg > 0.0 {
            let travelled = distance_meters(previous.coordinates, fix.coordinates());
            self.progress_percent = (100.0 * travelled / leg).clamp(0.0, 100.0);
        } else {
            // Coincident stops: defined as zero progress, not an error.
            self.progress_percent = 0.0;
        }
    }

    /// Manually advance to the next stop.
    ///
    /// Progress and distance reset for recomputation against the new
    /// target. Advancing past the last stop finishes the run.
    pub fn advance_to_next_stop(&mut self) {
        if self.state == TrackerState::Finished {
            return;
        }
        if self.current_index + 1 >= self.schedule.len() {
            self.state = TrackerState::Finished;
            return;
        }

        self.current_index += 1;
        self.progress_percent = 0.0;
        self.distance_to_target = None;
        if self.state != TrackerState::AwaitingFix {
            self.state = TrackerState::EnRoute;
        }
    }

    /// Recompute the schedule deviation against the current target's
    /// scheduled arrival. Called on a fixed 1-second tick.
    pub fn update_deviation(&mut self, now: NaiveDateTime) {
        if self.state == TrackerState::Finished {
            return;
        }
        let Some(arrival) = self
            .schedule
            .get(self.current_index)
            .and_then(|stop| stop.arrival)
        else {
            return;
        };

        self.deviation = Some(ScheduleDeviation::new(arrival.signed_duration_since(now)));
    }
}
