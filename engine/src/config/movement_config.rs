//! Movement Configuration
//!
//! Surface-relative walking and jumping parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for the [`MovementController`](crate::player::MovementController).
///
/// # Example
///
/// ```ignore
/// use kula_engine::config::MovementConfig;
///
/// let floaty = MovementConfig {
///     jump_speed: 11.0,
///     ..MovementConfig::default()
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Planar acceleration from full input (m/s²)
    pub acceleration: f32,
    /// Planar braking while grounded with no input (m/s²)
    pub deceleration: f32,
    /// Maximum speed on the plane perpendicular to up (m/s)
    pub max_speed: f32,
    /// Velocity change applied along up by a jump (m/s)
    pub jump_speed: f32,
    /// Speed along the gravity axis below which the avatar counts as grounded (m/s)
    pub ground_threshold: f32,
    /// Camera-forward change below which the basis is left alone
    pub camera_epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceleration: 40.0,
            deceleration: 20.0,
            max_speed: 6.0,
            jump_speed: 8.0,
            ground_threshold: 0.1,
            camera_epsilon: 1e-4,
        }
    }
}

/// Avatar body parameters used when a simulation spawns its own avatar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Spawn position (meters)
    pub spawn: Vec3,
    /// Sphere radius (meters)
    pub radius: f32,
    /// Body mass (kilograms)
    pub mass: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.5,
            mass: 1.0,
        }
    }
}
