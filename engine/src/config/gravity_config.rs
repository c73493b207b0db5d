//! Gravity Configuration
//!
//! Tuning for the gravity vector and for edge-crossing detection.

use serde::{Deserialize, Serialize};

/// Standard gravity magnitude used by the game (m/s²).
pub const STANDARD_GRAVITY: f32 = 9.82;

/// Configuration for the [`GravityController`](crate::gravity::GravityController).
///
/// `Default` gives a half-second transition at standard gravity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Fixed length of the gravity vector (m/s²)
    pub magnitude: f32,
    /// Transition speed in vector units per second; a full transition
    /// takes `magnitude / transition_rate` seconds
    pub transition_rate: f32,
    /// Maximum distance from the avatar to a shared edge that can trigger
    /// a transition (meters)
    pub trigger_distance: f32,
    /// Minimum avatar speed toward the candidate surface (m/s)
    pub trigger_speed: f32,
    /// Remaining distance below which a transition snaps to its target
    pub snap_epsilon: f32,
    /// Tolerance on |dot(normal, up)| for treating two orientations as
    /// orthogonal (or as identical, against 1.0)
    pub orthogonal_tolerance: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            magnitude: STANDARD_GRAVITY,
            transition_rate: STANDARD_GRAVITY * 2.0,
            trigger_distance: 1.0,
            trigger_speed: 0.5,
            snap_epsilon: 1e-3,
            orthogonal_tolerance: 1e-3,
        }
    }
}

impl GravityConfig {
    /// Seconds a full transition takes with this configuration.
    pub fn transition_duration(&self) -> f32 {
        self.magnitude / self.transition_rate
    }
}
