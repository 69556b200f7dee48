//! The position-tracking collaborator boundary.
//!
//! The core never talks to a sensor directly: it asks a
//! `PositionSource` for permission and a subscription, then consumes the
//! resulting stream of fixes. There is no synchronous "current position"
//! call; consumers hold the latest fix in their own state.

use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::NaiveDateTime;
use futures::Stream;
use tokio::sync::mpsc;

use crate::domain::Coordinates;

/// How many fixes a subscription buffers. A consumer that falls behind
/// loses intermediate fixes; only recency matters to the tracker.
const FIX_BUFFER: usize = 8;

/// One instantaneous geolocation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: NaiveDateTime,
}

impl PositionFix {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Outcome of a location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Cadence hints for a position subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptionOptions {
    /// Minimum interval between fixes.
    pub min_interval: Duration,
    /// Minimum movement between fixes, in meters.
    pub min_distance_meters: f64,
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(200),
            min_distance_meters: 1.0,
        }
    }
}

/// A provider of position fixes.
///
/// This abstraction allows the tracker to be tested with synthetic
/// fixes instead of a live sensor.
pub trait PositionSource: Send + Sync {
    /// Ask for location permission. Called once per session.
    fn request_permission(&self) -> PermissionStatus;

    /// Open a stream of position fixes.
    fn subscribe(&self, options: SubscriptionOptions) -> FixSubscription;
}

/// A cancellable stream of position fixes.
///
/// Dropping the subscription unsubscribes: the source observes the
/// closed channel and stops delivering.
#[derive(Debug)]
pub struct FixSubscription {
    receiver: mpsc::Receiver<PositionFix>,
}

impl FixSubscription {
    pub fn new(receiver: mpsc::Receiver<PositionFix>) -> Self {
        Self { receiver }
    }

    /// Await the next fix; `None` once the source is gone.
    pub async fn next_fix(&mut self) -> Option<PositionFix> {
        self.receiver.recv().await
    }
}

impl Stream for FixSubscription {
    type Item = PositionFix;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// A `PositionSource` fed by hand, for tests and demos.
///
/// Each `subscribe` opens an independent channel; `push` delivers a fix
/// to every live subscription. Delivery drops the fix when a
/// subscriber's buffer is full, mirroring the no-backpressure contract
/// of a real sensor.
pub struct SyntheticPositionSource {
    permission: PermissionStatus,
    subscribers: Mutex<Vec<mpsc::Sender<PositionFix>>>,
}

impl SyntheticPositionSource {
    /// A source whose permission request succeeds.
    pub fn granted() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// A source whose permission request is refused.
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Deliver a fix to every live subscription.
    pub fn push(&self, fix: PositionFix) {
        let mut subscribers = self.subscribers.lock().expect("subscriber lock poisoned");
        subscribers.retain(|sender| match sender.try_send(fix) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true, // fix dropped, keep subscriber
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().expect("subscriber lock poisoned");
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }
}

impl PositionSource for SyntheticPositionSource {
    fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn subscribe(&self, _options: SubscriptionOptions) -> FixSubscription {
        let (sender, receiver) = mpsc::channel(FIX_BUFFER);
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push(sender);
        FixSubscription::new(receiver)
    }
}
