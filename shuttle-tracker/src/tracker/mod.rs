//! Live, position-driven trip tracking.
//!
//! A driver on an active run feeds position fixes into a
//! `ProgressEstimator`, which turns them into a trip progress
//! percentage, a distance to the current target stop, and a
//! schedule-deviation signal. `TrackingSession` wires the estimator to a
//! `PositionSource` and a 1-second deviation timer, serializing all
//! state mutation through one task.

mod clock;
mod position;
mod progress;
mod session;

pub use clock::{Clock, SystemClock};
pub use position::{
    FixSubscription, PermissionStatus, PositionFix, PositionSource, SubscriptionOptions,
    SyntheticPositionSource,
};
pub use progress::{
    AT_STOP_THRESHOLD_METERS, ProgressEstimator, ScheduleDeviation, TrackerState,
};
pub use session::{ProgressSnapshot, TrackerError, TrackingSession};
