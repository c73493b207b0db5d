//! Gravity state and the in-flight transition.
//!
//! The gravity vector always has the configured magnitude. A transition
//! rotates it along the great-circle arc from the old direction to the new
//! one; progress advances by `transition_rate / magnitude` per second, so a
//! transition lasts `magnitude / transition_rate` seconds and never
//! overshoots its target.

use glam::{Quat, Vec3};
use tracing::warn;

use crate::error::GravityError;
use crate::physics::types::normalize_direction;

/// A gravity transition in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Unit direction gravity had when the transition started
    from: Vec3,
    /// Target gravity vector (full magnitude)
    target: Vec3,
    /// Rotation taking `from` onto the target direction
    rotation: Quat,
    /// Fraction completed, in [0, 1]
    progress: f32,
}

impl Transition {
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

/// Result of advancing the gravity state by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// No transition is active
    Idle,
    /// The transition moved but has not reached its target
    InFlight,
    /// The transition reached its target this tick
    Completed(Vec3),
}

/// Owned gravity state: current vector plus at most one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityState {
    current: Vec3,
    magnitude: f32,
    transition_rate: f32,
    transition: Option<Transition>,
}

static_assertions::assert_impl_all!(GravityState: Copy, Send, Sync);

impl GravityState {
    /// Create a resting state pointing along `direction`.
    ///
    /// A degenerate direction falls back to world down (-Y).
    pub fn new(direction: Vec3, magnitude: f32, transition_rate: f32) -> Self {
        let direction = normalize_direction(direction).unwrap_or(Vec3::NEG_Y);
        Self {
            current: direction * magnitude,
            magnitude,
            transition_rate,
            transition: None,
        }
    }

    pub fn current_vector(&self) -> Vec3 {
        self.current
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn transition_rate(&self) -> f32 {
        self.transition_rate
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn target_vector(&self) -> Option<Vec3> {
        self.transition.map(|t| t.target)
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Unit vector opposite to gravity.
    pub fn up_vector(&self) -> Vec3 {
        -self.current / self.magnitude
    }

    /// Start a transition toward `direction` (normalized here).
    pub(crate) fn begin(&mut self, direction: Vec3) -> Result<Vec3, GravityError> {
        if self.transition.is_some() {
            return Err(GravityError::TransitionInProgress);
        }
        let direction =
            normalize_direction(direction).ok_or(GravityError::DegenerateNormal { normal: -direction })?;
        let from = self.current / self.magnitude;
        let target = direction * self.magnitude;
        self.transition = Some(Transition {
            from,
            target,
            rotation: Quat::from_rotation_arc(from, direction),
            progress: 0.0,
        });
        Ok(target)
    }

    /// Move the current vector toward the target by `dt` seconds.
    pub(crate) fn advance(&mut self, dt: f32, snap_epsilon: f32) -> Advance {
        let Some(mut transition) = self.transition else {
            return Advance::Idle;
        };

        let step = dt.max(0.0) * self.transition_rate / self.magnitude;
        transition.progress = (transition.progress + step).min(1.0);

        let direction = Quat::IDENTITY.slerp(transition.rotation, transition.progress) * transition.from;
        match normalize_direction(direction) {
            Some(direction) => self.current = direction * self.magnitude,
            None => {
                warn!(
                    progress = transition.progress,
                    "gravity interpolation diverged; keeping previous vector"
                );
            }
        }

        if transition.progress >= 1.0 || self.current.distance(transition.target) < snap_epsilon {
            self.current = transition.target;
            self.transition = None;
            return Advance::Completed(self.current);
        }

        self.transition = Some(transition);
        Advance::InFlight
    }
}
