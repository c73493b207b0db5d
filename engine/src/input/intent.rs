//! Per-frame movement intent.
//!
//! Raw device input (keys, gamepad sticks, touch) is translated by the host
//! before it reaches the core; this is the only input the movement
//! controller sees.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What the player wants to do this frame.
///
/// Axes are in [-1, 1]: `forward` along the camera's forward direction,
/// `right` to the camera's right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub forward: f32,
    pub right: f32,
    pub jump: bool,
}

impl MovementIntent {
    /// Create an intent, clamping axes to [-1, 1]. Non-finite axes become 0.
    pub fn new(forward: f32, right: f32, jump: bool) -> Self {
        Self {
            forward: sanitize_axis(forward),
            right: sanitize_axis(right),
            jump,
        }
    }

    /// No movement, no jump.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Walk forward at full input.
    pub fn forward() -> Self {
        Self::new(1.0, 0.0, false)
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    /// Planar input as (right, forward), length clamped to 1 so diagonals
    /// are not faster than straight lines.
    pub fn planar(&self) -> Vec2 {
        Vec2::new(sanitize_axis(self.right), sanitize_axis(self.forward)).clamp_length_max(1.0)
    }

    pub fn has_planar_input(&self) -> bool {
        self.planar().length_squared() > 1e-6
    }
}

fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
