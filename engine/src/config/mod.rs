//! Config Module
//!
//! Centralized configuration for the gravity core. Every struct has a
//! `Default` matching the shipped tuning, and deserializes from partial JSON
//! (missing fields keep their defaults).
//!
//! ```ignore
//! use kula_engine::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_json_str(r#"{ "gravity": { "transition_rate": 9.82 } }"#)?;
//! assert_eq!(config.gravity.transition_duration(), 1.0);
//! ```

pub mod gravity_config;
pub mod movement_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use gravity_config::{GravityConfig, STANDARD_GRAVITY};
pub use movement_config::{AvatarConfig, MovementConfig};

/// Upper bound on a single physics step (seconds).
pub const MAX_TIMESTEP: f32 = 1.0 / 30.0;

/// Top-level configuration for a [`Simulation`](crate::simulation::Simulation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Frame time is clamped to this before stepping (seconds)
    pub max_timestep: f32,
    pub gravity: GravityConfig,
    pub movement: MovementConfig,
    pub avatar: AvatarConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_timestep: MAX_TIMESTEP,
            gravity: GravityConfig::default(),
            movement: MovementConfig::default(),
            avatar: AvatarConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// A zero transition rate would leave a transition in flight forever, so
    /// it is refused here rather than guarded at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_timestep", self.max_timestep)?;

        let g = &self.gravity;
        positive("gravity.magnitude", g.magnitude)?;
        positive("gravity.transition_rate", g.transition_rate)?;
        positive("gravity.snap_epsilon", g.snap_epsilon)?;
        non_negative("gravity.trigger_distance", g.trigger_distance)?;
        non_negative("gravity.trigger_speed", g.trigger_speed)?;
        non_negative("gravity.orthogonal_tolerance", g.orthogonal_tolerance)?;

        let m = &self.movement;
        positive("movement.max_speed", m.max_speed)?;
        non_negative("movement.acceleration", m.acceleration)?;
        non_negative("movement.deceleration", m.deceleration)?;
        non_negative("movement.jump_speed", m.jump_speed)?;
        positive("movement.ground_threshold", m.ground_threshold)?;
        non_negative("movement.camera_epsilon", m.camera_epsilon)?;

        let a = &self.avatar;
        if !a.spawn.is_finite() {
            return Err(ConfigError::Invalid {
                field: "avatar.spawn",
                reason: "must be finite",
            });
        }
        positive("avatar.radius", a.radius)?;
        positive("avatar.mass", a.mass)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a finite value greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a finite value of zero or more",
        })
    }
}
