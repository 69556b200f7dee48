//! A running tracking session.
//!
//! `TrackingSession::start` requests permission, subscribes to position
//! fixes, and spawns a single task that owns the `ProgressEstimator`.
//! Fixes, the 1-second deviation tick, and driver commands are all
//! serialized through that task, so estimator state never races. The
//! latest state is published through a watch channel; consumers read it
//! at their own pace.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::query::ServiceStop;

use super::clock::Clock;
use super::position::{FixSubscription, PermissionStatus, PositionSource, SubscriptionOptions};
use super::progress::{ProgressEstimator, ScheduleDeviation, TrackerState};

/// How often the schedule deviation is recomputed.
const DEVIATION_TICK: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The position source refused location access. Not retried; the
    /// caller decides whether to ask again.
    #[error("location permission was denied")]
    PermissionDenied,
}

/// A point-in-time view of the tracked run, safe to read from any task.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub state: TrackerState,
    /// Name of the current target stop; `None` once finished.
    pub current_stop: Option<String>,
    /// Whether the current target stop is served on request only.
    pub current_stop_is_request_stop: bool,
    /// Name of the stop after the current target, if any.
    pub next_stop: Option<String>,
    pub progress_percent: f64,
    pub distance_to_target_meters: Option<f64>,
    pub deviation: Option<ScheduleDeviation>,
}

enum SessionCommand {
    AdvanceToNextStop,
    Stop,
}

/// Handle to a live tracking session.
///
/// Dropping the handle tears the session down.
pub struct TrackingSession {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<ProgressSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Start tracking a run against an expanded service schedule.
    ///
    /// Fails fast when location permission is denied; nothing is
    /// subscribed in that case.
    pub fn start(
        source: &dyn PositionSource,
        schedule: Vec<ServiceStop>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TrackerError> {
        if source.request_permission() == PermissionStatus::Denied {
            warn!("location permission denied, not starting tracking");
            return Err(TrackerError::PermissionDenied);
        }

        let fixes = source.subscribe(SubscriptionOptions::default());
        let estimator = ProgressEstimator::new(schedule);
        info!(
            stops = estimator.current_stop_index() + 1,
            "tracking session started"
        );

        let (command_tx, command_rx) = mpsc::channel(4);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&estimator));

        let task = tokio::spawn(run(estimator, fixes, clock, command_rx, snapshot_tx));

        Ok(Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            task: Some(task),
        })
    }

    /// The latest published state.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A watch receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.snapshots.clone()
    }

    /// Tell the session the vehicle has left the current target stop.
    pub async fn advance_to_next_stop(&self) {
        // A closed channel means the run already finished; nothing to do.
        let _ = self.commands.send(SessionCommand::AdvanceToNextStop).await;
    }

    /// Stop tracking and wait for the session task to wind down.
    pub async fn stop(mut self) {
        let _ = self.commands.send(SessionCommand::Stop).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn snapshot_of(estimator: &ProgressEstimator) -> ProgressSnapshot {
    ProgressSnapshot {
        state: estimator.state(),
        current_stop: estimator
            .current_stop()
            .map(|stop| stop.stop_name.clone()),
        current_stop_is_request_stop: estimator
            .current_stop()
            .is_some_and(|stop| stop.is_request_stop),
        next_stop: estimator.next_stop().map(|stop| stop.stop_name.clone()),
        progress_percent: estimator.progress_percent(),
        distance_to_target_meters: estimator.distance_to_target_meters(),
        deviation: estimator.deviation(),
    }
}

/// The single task that owns the estimator for the session's lifetime.
async fn run(
    mut estimator: ProgressEstimator,
    mut fixes: FixSubscription,
    clock: Arc<dyn Clock>,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<ProgressSnapshot>,
) {
    let mut tick = tokio::time::interval(DEVIATION_TICK);
    // The first tick fires immediately; skip it so deviation updates
    // start one full interval in.
    tick.tick().await;

    loop {
        tokio::select! {
            fix = fixes.next_fix() => {
                match fix {
                    Some(fix) => {
                        estimator.on_fix(&fix);
                        debug!(
                            state = ?estimator.state(),
                            progress = estimator.progress_percent(),
                            "position fix consumed"
                        );
                    }
                    None => {
                        info!("position source closed, ending session");
                        break;
                    }
                }
            }
            _ = tick.tick() => {
                estimator.update_deviation(clock.now());
            }
            command = commands.recv() => {
                match command {
                    Some(SessionCommand::AdvanceToNextStop) => {
                        estimator.advance_to_next_stop();
                        debug!(
                            stop = ?estimator.current_stop().map(|s| s.stop_name.as_str()),
                            "advanced to next stop"
                        );
                    }
                    Some(SessionCommand::Stop) | None => break,
                }
            }
        }

        let _ = snapshots.send(snapshot_of(&estimator));

        if estimator.state() == TrackerState::Finished {
            info!("run complete, ending session");
            break;
        }
    }
}
