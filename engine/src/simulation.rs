//! Simulation
//!
//! Owns one physics world, the avatar body in it, and the two controllers,
//! and runs them in the only order that keeps movement consistent with
//! gravity:
//!
//! 1. [`GravityController::tick`] - advance or start a transition, push
//!    gravity into the world
//! 2. [`MovementController::update`] - basis, forces, clamp, jump
//! 3. [`PhysicsWorld::step`] - integrate
//!
//! # Example
//!
//! ```rust,ignore
//! use kula_engine::{Simulation, SimulationConfig, MovementIntent};
//!
//! let mut sim = Simulation::try_new(SimulationConfig::default())?;
//! sim.add_surface(Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0)), Vec3::Y)?;
//!
//! loop {
//!     let report = sim.step(frame_dt, MovementIntent::forward(), camera.forward());
//!     if let Some(change) = report.gravity_changed {
//!         camera.start_reorient(change.up);
//!     }
//! }
//! ```

use glam::Vec3;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::{ConfigError, GravityError};
use crate::gravity::{GravityChanged, GravityController, GravityObserver, SubscriptionId, SurfaceId};
use crate::input::MovementIntent;
use crate::physics::{Aabb, BodyHandle, PhysicsWorld, RigidBody, SimpleWorld};
use crate::player::{MovementController, MovementReport};

/// Summary of one simulated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Timestep actually simulated after clamping (seconds)
    pub dt: f32,
    /// Gravity vector after the gravity tick
    pub gravity: Vec3,
    /// Whether a transition is still in flight after this frame
    pub transitioning: bool,
    /// Set on the frame a transition completes
    pub gravity_changed: Option<GravityChanged>,
    /// What the movement controller did
    pub movement: MovementReport,
}

/// Clamp a frame time to `[0, max]`. Non-finite or negative input gives 0.
pub fn clamp_timestep(dt: f32, max: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max.max(0.0)) } else { 0.0 }
}

/// Frame-synchronous gravity core over a physics world.
#[derive(Debug)]
pub struct Simulation<W: PhysicsWorld = SimpleWorld> {
    config: SimulationConfig,
    world: W,
    avatar: BodyHandle,
    gravity: GravityController,
    movement: MovementController,
    frame: u64,
}

impl Simulation<SimpleWorld> {
    /// Validate `config`, then create the simulation as [`Simulation::new`]
    /// does. Use this for configs that did not come from
    /// [`SimulationConfig::load`] or [`SimulationConfig::from_json_str`].
    pub fn try_new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a simulation on a fresh [`SimpleWorld`], spawning the avatar
    /// from `config.avatar`.
    ///
    /// `config` must already be valid. A zero gravity magnitude or transition
    /// rate yields non-finite gravity; see [`Simulation::try_new`].
    pub fn new(config: SimulationConfig) -> Self {
        let mut world = SimpleWorld::new(Vec3::new(0.0, -config.gravity.magnitude, 0.0));
        let avatar = world.add_body(RigidBody::sphere(
            config.avatar.spawn,
            config.avatar.radius,
            config.avatar.mass,
        ));
        Self::with_world(config, world, avatar)
    }

    /// Add a static box to the world and register it as a gravity surface.
    ///
    /// The box is added as a collider even when the normal is rejected, so
    /// the level geometry stays solid.
    pub fn add_surface(&mut self, collider: Aabb, normal: Vec3) -> Result<SurfaceId, GravityError> {
        self.world.add_static(collider);
        self.gravity.register_surface(collider, normal)
    }

    /// Add a static box that is solid but never a transition target.
    pub fn add_static(&mut self, collider: Aabb) {
        self.world.add_static(collider);
    }

    /// Drop every collider and surface, e.g. on level unload.
    pub fn clear_level(&mut self) {
        self.world.clear_static();
        self.gravity.unregister_all();
    }
}

impl<W: PhysicsWorld> Simulation<W> {
    /// Wrap an existing world and avatar body.
    pub fn with_world(config: SimulationConfig, mut world: W, avatar: BodyHandle) -> Self {
        let gravity = GravityController::new(config.gravity);
        world.set_gravity(gravity.current_vector());
        let movement = MovementController::new(config.movement, gravity.feed());
        Self {
            config,
            world,
            avatar,
            gravity,
            movement,
            frame: 0,
        }
    }

    /// Advance one frame.
    ///
    /// `frame_dt` is clamped to `max_timestep` before anything runs.
    pub fn step(&mut self, frame_dt: f32, intent: MovementIntent, camera_forward: Vec3) -> FrameReport {
        let dt = clamp_timestep(frame_dt, self.config.max_timestep);
        if dt != frame_dt {
            debug!(frame_dt, dt, "clamped frame timestep");
        }

        let gravity_changed = self.gravity.tick(dt, &mut self.world, self.avatar);

        self.movement.set_camera_forward(camera_forward);
        let movement = self.movement.update(dt, intent, &mut self.world, self.avatar);

        self.world.step(dt);
        self.frame += 1;

        FrameReport {
            dt,
            gravity: self.gravity.current_vector(),
            transitioning: self.gravity.is_transitioning(),
            gravity_changed,
            movement,
        }
    }

    pub fn register_surface(&mut self, collider: Aabb, normal: Vec3) -> Result<SurfaceId, GravityError> {
        self.gravity.register_surface(collider, normal)
    }

    pub fn reorient_to(&mut self, normal: Vec3) -> Result<(), GravityError> {
        self.gravity.reorient_to(normal)
    }

    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: GravityObserver + 'static,
    {
        self.gravity.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.gravity.unsubscribe(id)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn avatar(&self) -> BodyHandle {
        self.avatar
    }

    /// The avatar's rigid body, if the world still has it.
    pub fn avatar_body(&self) -> Option<&RigidBody> {
        self.world.body(self.avatar)
    }

    pub fn gravity(&self) -> &GravityController {
        &self.gravity
    }

    pub fn gravity_mut(&mut self) -> &mut GravityController {
        &mut self.gravity
    }

    pub fn movement(&self) -> &MovementController {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementController {
        &mut self.movement
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_timestep() {
        assert_eq!(clamp_timestep(0.01, 1.0 / 30.0), 0.01);
        assert_eq!(clamp_timestep(0.5, 1.0 / 30.0), 1.0 / 30.0);
        assert_eq!(clamp_timestep(-0.1, 1.0 / 30.0), 0.0);
        assert_eq!(clamp_timestep(f32::NAN, 1.0 / 30.0), 0.0);
        assert_eq!(clamp_timestep(f32::INFINITY, 1.0 / 30.0), 0.0);
    }

    #[test]
    fn test_new_sets_world_gravity() {
        let sim = Simulation::new(SimulationConfig::default());
        assert_eq!(sim.world().gravity(), Vec3::new(0.0, -9.82, 0.0));
        assert_eq!(sim.avatar_body().unwrap().position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let mut config = SimulationConfig::default();
        config.gravity.magnitude = 0.0;
        match Simulation::try_new(config) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "gravity.magnitude"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("zero gravity accepted"),
        }

        let sim = Simulation::try_new(SimulationConfig::default()).unwrap();
        assert!(sim.gravity().current_vector().is_finite());
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut sim = Simulation::new(SimulationConfig::default());
        let report = sim.step(1.0, MovementIntent::idle(), Vec3::NEG_Z);
        assert!((report.dt - 1.0 / 30.0).abs() < 1e-7);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_add_surface_keeps_collider_on_rejection() {
        let mut sim = Simulation::new(SimulationConfig::default());
        let floor = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        assert!(sim.add_surface(floor, Vec3::ZERO).is_err());
        assert_eq!(sim.world().colliders().len(), 1);
        assert_eq!(sim.gravity().surface_count(), 0);

        sim.clear_level();
        assert!(sim.world().colliders().is_empty());
    }

    #[test]
    fn test_avatar_settles_on_floor() {
        let mut sim = Simulation::new(SimulationConfig::default());
        sim.add_surface(Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0)), Vec3::Y)
            .unwrap();

        let mut report = None;
        for _ in 0..120 {
            report = Some(sim.step(1.0 / 60.0, MovementIntent::idle(), Vec3::NEG_Z));
        }
        let report = report.unwrap();
        assert!(report.movement.grounded);
        assert!(!report.transitioning);
        let body = sim.avatar_body().unwrap();
        assert!((body.position.y - 0.5).abs() < 0.01);
    }
}
