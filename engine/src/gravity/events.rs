//! Gravity change notifications.
//!
//! Two channels leave the gravity controller:
//!
//! - [`GravityObserver`]s subscribed at wiring time receive a
//!   [`GravityChanged`] event once per completed transition (the camera uses
//!   this to start its own reorientation animation).
//! - A [`GravityFeed`] is a read-only handle to the latest published
//!   [`GravitySample`]. The movement controller holds one and re-derives its
//!   basis whenever the sample revision moves on, including mid-transition.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;

use super::surface::SurfaceId;

/// Emitted once when a transition completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityChanged {
    /// New gravity vector (full magnitude)
    pub gravity: Vec3,
    /// Unit vector opposite to `gravity`
    pub up: Vec3,
    /// Surface that triggered the transition; `None` for scripted reorientation
    pub surface: Option<SurfaceId>,
}

/// Receiver of [`GravityChanged`] events.
///
/// Closures taking `&GravityChanged` implement this trait.
pub trait GravityObserver {
    fn on_gravity_changed(&mut self, event: &GravityChanged);
}

impl<F> GravityObserver for F
where
    F: FnMut(&GravityChanged),
{
    fn on_gravity_changed(&mut self, event: &GravityChanged) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of subscribed observers.
#[derive(Default)]
pub(crate) struct ObserverList {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn GravityObserver>)>,
}

impl ObserverList {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn GravityObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Deliver `event` to every observer in subscription order.
    pub(crate) fn notify(&mut self, event: &GravityChanged) {
        for (_, observer) in &mut self.observers {
            observer.on_gravity_changed(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("next_id", &self.next_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Latest gravity published by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySample {
    /// Current gravity vector
    pub vector: Vec3,
    /// Bumped on every change to `vector` or `transitioning`
    pub revision: u64,
    /// Whether a transition is in flight
    pub transitioning: bool,
}

static_assertions::assert_impl_all!(GravitySample: Copy, Send, Sync);

/// Shared read-only view of the published [`GravitySample`].
///
/// Cloning is cheap; every clone sees the same sample. Single-threaded by
/// construction, matching the frame-synchronous tick.
#[derive(Debug, Clone)]
pub struct GravityFeed {
    sample: Rc<Cell<GravitySample>>,
}

static_assertions::assert_not_impl_any!(GravityFeed: Send, Sync);

impl GravityFeed {
    pub(crate) fn new(vector: Vec3) -> Self {
        Self {
            sample: Rc::new(Cell::new(GravitySample {
                vector,
                revision: 0,
                transitioning: false,
            })),
        }
    }

    /// A feed nobody publishes to; gravity stays at `vector`.
    pub fn fixed(vector: Vec3) -> Self {
        Self::new(vector)
    }

    pub fn sample(&self) -> GravitySample {
        self.sample.get()
    }

    pub fn vector(&self) -> Vec3 {
        self.sample.get().vector
    }

    /// Publish a new sample if anything changed.
    pub(crate) fn publish(&self, vector: Vec3, transitioning: bool) {
        let previous = self.sample.get();
        if previous.vector == vector && previous.transitioning == transitioning {
            return;
        }
        self.sample.set(GravitySample {
            vector,
            revision: previous.revision + 1,
            transitioning,
        });
    }
}
