//! Player Movement Controller
//!
//! Turns per-frame [`MovementIntent`] and the current gravity vector into
//! forces and impulses on the avatar's rigid body. Nothing here assumes that
//! "up" is +Y: movement, speed clamping, grounding and jumping are all
//! expressed in the [`MovementBasis`] derived from gravity.
//!
//! # Physics Model
//!
//! - Acceleration: 40.0 m/s^2, applied as a force so momentum carries over
//! - Deceleration: 20.0 m/s^2 braking while grounded with no input
//! - Max planar speed: 6.0 m/s (speed along up is never clamped)
//! - Jump: 8.0 m/s velocity change along up
//! - Grounded: |velocity · gravity direction| < 0.1 m/s
//!
//! # State machine
//!
//! `Grounded` and `Airborne`, re-evaluated every update. A jump fires only
//! from `Grounded`, and the jump intent must be released before it can fire
//! again, so holding jump produces exactly one impulse.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kula_engine::player::MovementController;
//!
//! let mut movement = MovementController::new(MovementConfig::default(), gravity.feed());
//!
//! // Each frame, after the gravity controller's tick:
//! movement.set_camera_forward(camera.forward());
//! movement.update(dt, intent, &mut world, avatar);
//! world.step(dt);
//! ```

use glam::Vec3;
use tracing::{debug, trace, warn};

use super::basis::{BasisSource, MovementBasis};
use crate::config::MovementConfig;
use crate::gravity::GravityFeed;
use crate::input::MovementIntent;
use crate::physics::types::normalize_direction;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Grounded/airborne classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    Grounded,
    Airborne,
}

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementReport {
    /// Result of the ground check this update
    pub grounded: bool,
    /// Whether a jump impulse was applied
    pub jumped: bool,
    /// State after the update
    pub state: MovementState,
    /// Force handed to the physics world (N)
    pub force: Vec3,
}

/// Surface-relative movement controller.
#[derive(Debug, Clone)]
pub struct MovementController {
    config: MovementConfig,

    /// Published gravity from the gravity controller
    feed: GravityFeed,

    /// Gravity the current basis was built from
    gravity: Vec3,
    gravity_revision: u64,

    /// Latest camera forward from the camera
    camera_forward: Vec3,
    /// Camera forward the current basis was built from
    basis_camera: Vec3,

    basis: MovementBasis,
    state: MovementState,

    /// Set when a jump fires, cleared when the jump intent is released
    jump_latched: bool,
    jumps_fired: u32,
}

impl MovementController {
    /// Create a controller reading gravity from `feed`.
    ///
    /// The camera is assumed to look toward -Z until told otherwise.
    pub fn new(config: MovementConfig, feed: GravityFeed) -> Self {
        let sample = feed.sample();
        let camera_forward = Vec3::NEG_Z;
        Self {
            config,
            feed,
            gravity: sample.vector,
            gravity_revision: sample.revision,
            camera_forward,
            basis_camera: camera_forward,
            basis: MovementBasis::from_gravity(sample.vector, camera_forward),
            state: MovementState::Grounded,
            jump_latched: false,
            jumps_fired: 0,
        }
    }

    pub fn get_config(&self) -> &MovementConfig {
        &self.config
    }

    /// Check if the avatar is currently grounded.
    pub fn is_grounded(&self) -> bool {
        self.state == MovementState::Grounded
    }

    pub fn get_state(&self) -> MovementState {
        self.state
    }

    pub fn get_basis(&self) -> &MovementBasis {
        &self.basis
    }

    pub fn get_up_vector(&self) -> Vec3 {
        self.basis.up
    }

    pub fn get_forward_vector(&self) -> Vec3 {
        self.basis.forward
    }

    pub fn get_right_vector(&self) -> Vec3 {
        self.basis.right
    }

    /// Gravity the basis currently reflects.
    pub fn get_gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Number of jump impulses applied since creation or the last reset.
    pub fn get_jumps_fired(&self) -> u32 {
        self.jumps_fired
    }

    /// Get the maximum planar speed.
    pub fn get_max_speed(&self) -> f32 {
        self.config.max_speed
    }

    /// Set the maximum planar speed.
    pub fn set_max_speed(&mut self, speed: f32) {
        self.config.max_speed = speed.max(0.0);
    }

    /// Set the jump velocity change.
    pub fn set_jump_speed(&mut self, speed: f32) {
        self.config.jump_speed = speed.max(0.0);
    }

    /// Reset state machine and jump bookkeeping (e.g. on respawn).
    pub fn reset(&mut self) {
        self.state = MovementState::Grounded;
        self.jump_latched = false;
        self.jumps_fired = 0;
    }

    /// Update the camera-forward direction used for the basis.
    ///
    /// Non-finite input is ignored.
    pub fn set_camera_forward(&mut self, forward: Vec3) {
        if forward.is_finite() {
            self.camera_forward = forward;
        } else {
            debug!(?forward, "ignoring non-finite camera forward");
        }
    }

    /// Re-derive the basis for a new gravity vector.
    pub fn on_gravity_changed(&mut self, gravity: Vec3) {
        if !gravity.is_finite() {
            warn!(?gravity, "ignoring non-finite gravity; keeping previous basis");
            return;
        }
        self.gravity = gravity;
        self.rebuild_basis();
    }

    fn rebuild_basis(&mut self) {
        match self.basis.rebuild(self.gravity, self.camera_forward) {
            Ok((basis, source)) => {
                if source != BasisSource::Camera {
                    debug!(
                        ?source,
                        camera = ?self.camera_forward,
                        up = ?basis.up,
                        "camera forward parallel to up, falling back"
                    );
                }
                trace!(forward = ?basis.forward, right = ?basis.right, up = ?basis.up, "movement basis");
                self.basis = basis;
                self.basis_camera = self.camera_forward;
            }
            Err(err) => {
                warn!(gravity = ?self.gravity, "{err}; keeping previous movement basis");
            }
        }
    }

    /// Pick up new gravity from the feed, or a camera move.
    fn sync_basis(&mut self) {
        let sample = self.feed.sample();
        if sample.revision != self.gravity_revision {
            self.gravity_revision = sample.revision;
            self.on_gravity_changed(sample.vector);
        } else if self.camera_forward.distance(self.basis_camera) > self.config.camera_epsilon {
            self.rebuild_basis();
        }
    }

    /// Braking acceleration that never reverses the planar velocity.
    fn braking(&self, planar: Vec3, dt: f32) -> Vec3 {
        let speed = planar.length();
        if speed < 1e-4 || dt <= 0.0 {
            return Vec3::ZERO;
        }
        let decel = self.config.deceleration.min(speed / dt);
        -planar / speed * decel
    }

    /// Apply this frame's input to the avatar.
    ///
    /// Must run after the gravity controller's tick and before the physics
    /// step of the same frame.
    ///
    /// # Arguments
    /// * `dt` - Delta time in seconds
    /// * `intent` - Movement intent for this frame
    /// * `world` - Physics world owning the avatar
    /// * `avatar` - Handle of the avatar body
    pub fn update<W>(
        &mut self,
        dt: f32,
        intent: MovementIntent,
        world: &mut W,
        avatar: BodyHandle,
    ) -> MovementReport
    where
        W: PhysicsWorld + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        // 1. Basis
        self.sync_basis();

        let Some(body) = world.body(avatar) else {
            debug!(?avatar, "avatar body missing, skipping movement");
            return MovementReport {
                grounded: self.is_grounded(),
                state: self.state,
                ..Default::default()
            };
        };
        let velocity = body.velocity;
        let mass = body.mass;

        let (along_up, planar) = self.basis.decompose(velocity);
        let grounded = is_grounded_velocity(velocity, self.gravity, self.config.ground_threshold);

        // 2. Planar force from input (or braking)
        let acceleration = if intent.has_planar_input() {
            self.basis.world_direction(intent.planar()) * self.config.acceleration
        } else if grounded {
            self.braking(planar, dt)
        } else {
            Vec3::ZERO
        };

        // 3. Clamp planar speed so that it stays within max_speed after the
        //    physics step integrates this frame's force. Up component untouched.
        let step = acceleration * dt;
        let predicted = planar + step;
        if predicted.length() > self.config.max_speed {
            let clamped = predicted.clamp_length_max(self.config.max_speed);
            world.set_velocity(avatar, along_up + (clamped - step));
        }

        let force = acceleration * mass;
        if force != Vec3::ZERO {
            world.apply_force(avatar, force);
        }

        // 4-5. Ground check and edge-triggered jump
        if !intent.jump {
            self.jump_latched = false;
        }

        let mut jumped = false;
        if intent.jump && grounded && !self.jump_latched {
            world.apply_impulse(avatar, self.basis.up * self.config.jump_speed * mass);
            self.jump_latched = true;
            self.jumps_fired += 1;
            jumped = true;
            debug!(up = ?self.basis.up, "jump");
        }

        let next = if jumped || !grounded {
            MovementState::Airborne
        } else {
            MovementState::Grounded
        };
        if next != self.state {
            trace!(from = ?self.state, to = ?next, "movement state");
            self.state = next;
        }

        MovementReport {
            grounded,
            jumped,
            state: self.state,
            force,
        }
    }
}

/// Grounded when the speed along the gravity axis is below `threshold`,
/// whatever direction gravity points in. Degenerate gravity is never grounded.
pub fn is_grounded_velocity(velocity: Vec3, gravity: Vec3, threshold: f32) -> bool {
    match normalize_direction(gravity) {
        Some(down) => velocity.dot(down).abs() < threshold,
        None => false,
    }
}
