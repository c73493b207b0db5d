//! Gravity Controller
//!
//! Sole owner of the world's gravity vector. Each tick it either advances
//! the transition in flight or looks for an edge crossing that should start
//! one.
//!
//! # Edge detection
//!
//! One data-driven rule covers all six cardinal orientations. A registered
//! surface is a candidate when its normal is orthogonal to the current up
//! vector and the avatar is in front of its face and within its extent. For
//! each candidate:
//!
//! - `edge_distance` is the distance from the avatar to the edge shared by
//!   the surface it stands on and the candidate (`hypot` of the two plane
//!   distances). With no supporting surface it falls back to the distance to
//!   the candidate plane.
//! - `inward_speed` is the avatar velocity along the candidate's inward
//!   direction (`-normal`).
//!
//! A transition triggers when `edge_distance < trigger_distance` and
//! `inward_speed > trigger_speed`. When several candidates qualify the
//! nearest wins (registration order breaks ties); the others are looked at
//! again once the transition has completed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kula_engine::gravity::GravityController;
//!
//! let mut gravity = GravityController::new(GravityConfig::default());
//! gravity.register_surface(wall_box, Vec3::NEG_X)?;
//! gravity.subscribe(|e: &GravityChanged| camera.start_reorient(e.up));
//!
//! // Each frame, before the movement controller:
//! gravity.tick(dt, &mut world, avatar);
//! ```

use glam::Vec3;
use tracing::{debug, info, trace, warn};

use super::events::{GravityChanged, GravityFeed, GravityObserver, ObserverList, SubscriptionId};
use super::state::{Advance, GravityState};
use super::surface::{GravitySurface, SurfaceId, validate_normal};
use crate::config::GravityConfig;
use crate::error::GravityError;
use crate::physics::{BodyHandle, PhysicsWorld, collision::Aabb};

/// A surface that satisfies the transition trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerCandidate {
    pub surface: SurfaceId,
    /// Distance from the avatar to the shared edge (meters)
    pub edge_distance: f32,
    /// Avatar speed toward the surface (m/s)
    pub inward_speed: f32,
}

/// Owns gravity, detects edge crossings and runs transitions.
#[derive(Debug)]
pub struct GravityController {
    config: GravityConfig,
    state: GravityState,
    surfaces: Vec<GravitySurface>,
    next_surface_id: u32,
    /// Surface the transition in flight is heading for
    pending_surface: Option<SurfaceId>,
    observers: ObserverList,
    feed: GravityFeed,
}

impl GravityController {
    /// Create a controller with gravity pointing down (-Y).
    ///
    /// `config` is not checked here. Run [`crate::config::SimulationConfig::validate`]
    /// first, since a zero magnitude or transition rate gives non-finite gravity.
    pub fn new(config: GravityConfig) -> Self {
        Self::with_direction(config, Vec3::NEG_Y)
    }

    /// Create a controller with gravity along `direction`.
    pub fn with_direction(config: GravityConfig, direction: Vec3) -> Self {
        let state = GravityState::new(direction, config.magnitude, config.transition_rate);
        Self {
            config,
            feed: GravityFeed::new(state.current_vector()),
            state,
            surfaces: Vec::new(),
            next_surface_id: 0,
            pending_surface: None,
            observers: ObserverList::default(),
        }
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    /// Read-only handle to the published gravity sample.
    pub fn feed(&self) -> GravityFeed {
        self.feed.clone()
    }

    pub fn state(&self) -> &GravityState {
        &self.state
    }

    pub fn current_vector(&self) -> Vec3 {
        self.state.current_vector()
    }

    pub fn up_vector(&self) -> Vec3 {
        self.state.up_vector()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// Fraction of the transition in flight, if any.
    pub fn transition_progress(&self) -> Option<f32> {
        self.state.transition().map(|t| t.progress())
    }

    // ------------------------------------------------------------------
    // Surfaces
    // ------------------------------------------------------------------

    /// Register a static surface with its outward normal.
    ///
    /// Zero-length or non-finite normals are logged and discarded; the level
    /// carries on with one fewer transition point.
    pub fn register_surface(&mut self, collider: Aabb, normal: Vec3) -> Result<SurfaceId, GravityError> {
        let id = SurfaceId(self.next_surface_id);
        match GravitySurface::new(id, collider, normal) {
            Ok(surface) => {
                self.next_surface_id += 1;
                self.surfaces.push(surface);
                debug!(surface = id.0, normal = ?surface.normal(), "registered gravity surface");
                Ok(id)
            }
            Err(err) => {
                warn!(?normal, ?collider, "discarding gravity surface: {err}");
                Err(err)
            }
        }
    }

    /// Drop every registered surface (level unload).
    ///
    /// A transition already in flight still runs to completion.
    pub fn unregister_all(&mut self) {
        self.surfaces.clear();
    }

    pub fn surfaces(&self) -> &[GravitySurface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&GravitySurface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Subscribe to completed transitions.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: GravityObserver + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Scripted reorientation: make the surface with `normal` the floor.
    ///
    /// Ignored while a transition is in flight; the running transition is
    /// never pre-empted.
    pub fn reorient_to(&mut self, normal: Vec3) -> Result<(), GravityError> {
        let normal = validate_normal(normal).inspect_err(|err| {
            warn!(?normal, "rejecting reorientation: {err}");
        })?;

        if self.state.is_transitioning() {
            debug!(?normal, "reorientation ignored, transition in progress");
            return Err(GravityError::TransitionInProgress);
        }

        let up = self.state.up_vector();
        let tolerance = self.config.orthogonal_tolerance;
        if normal.dot(up) >= 1.0 - tolerance {
            return Err(GravityError::AlreadyOriented);
        }
        if normal.dot(up).abs() > tolerance {
            warn!(?normal, ?up, "rejecting non-orthogonal reorientation");
            return Err(GravityError::NonOrthogonal { normal, up });
        }

        self.start_transition(normal, None)
    }

    fn start_transition(&mut self, normal: Vec3, surface: Option<SurfaceId>) -> Result<(), GravityError> {
        let target = self.state.begin(-normal)?;
        self.pending_surface = surface;
        self.feed.publish(self.state.current_vector(), true);
        info!(
            surface = surface.map(|s| s.0),
            from = ?self.state.current_vector(),
            to = ?target,
            "gravity transition started"
        );
        Ok(())
    }

    /// Advance gravity by one tick.
    ///
    /// Must run before the movement controller's update in the same frame.
    /// Returns the change event when a transition completes this tick.
    pub fn tick<W>(&mut self, dt: f32, world: &mut W, avatar: BodyHandle) -> Option<GravityChanged>
    where
        W: PhysicsWorld + ?Sized,
    {
        let mut completed = None;

        if self.state.is_transitioning() {
            match self.state.advance(dt, self.config.snap_epsilon) {
                Advance::Completed(gravity) => {
                    let event = GravityChanged {
                        gravity,
                        up: self.state.up_vector(),
                        surface: self.pending_surface.take(),
                    };
                    self.feed.publish(gravity, false);
                    info!(gravity = ?gravity, "gravity transition completed");
                    self.observers.notify(&event);
                    completed = Some(event);
                }
                Advance::InFlight => {
                    self.feed.publish(self.state.current_vector(), true);
                    trace!(progress = ?self.transition_progress(), "gravity transition advancing");
                }
                Advance::Idle => {}
            }
        } else if let Some(body) = world.body(avatar) {
            if let Some(candidate) = self.find_trigger(body.position, body.velocity) {
                if let Some(normal) = self.surface(candidate.surface).map(GravitySurface::normal) {
                    if let Err(err) = self.start_transition(normal, Some(candidate.surface)) {
                        warn!(surface = candidate.surface.0, "could not start gravity transition: {err}");
                    }
                }
            }
        } else {
            debug!(?avatar, "avatar body missing, skipping edge detection");
        }

        let current = self.state.current_vector();
        if world.gravity() != current {
            world.set_gravity(current);
        }

        completed
    }

    /// Evaluate every registered surface against the avatar's state.
    ///
    /// Returns the nearest qualifying surface, if any.
    pub fn find_trigger(&self, position: Vec3, velocity: Vec3) -> Option<TriggerCandidate> {
        let up = self.state.up_vector();
        let tolerance = self.config.orthogonal_tolerance;
        let floor = self.supporting_surface(position, up);

        let mut best: Option<TriggerCandidate> = None;
        for surface in &self.surfaces {
            if !surface.is_orthogonal_to(up, tolerance) {
                continue;
            }

            let wall_distance = surface.plane_distance(position);
            if wall_distance < 0.0 || !surface.covers(position, self.config.trigger_distance) {
                continue;
            }

            let edge_distance = match floor {
                Some(floor) => wall_distance.hypot(floor.plane_distance(position).max(0.0)),
                None => wall_distance,
            };
            let inward_speed = velocity.dot(surface.inward());

            if edge_distance >= self.config.trigger_distance || inward_speed <= self.config.trigger_speed {
                continue;
            }

            if best.is_none_or(|b| edge_distance < b.edge_distance) {
                best = Some(TriggerCandidate {
                    surface: surface.id(),
                    edge_distance,
                    inward_speed,
                });
            }
        }
        best
    }

    /// Nearest surface facing `up` whose face the avatar stands over.
    fn supporting_surface(&self, position: Vec3, up: Vec3) -> Option<&GravitySurface> {
        let tolerance = self.config.orthogonal_tolerance;
        self.surfaces
            .iter()
            .filter(|s| s.faces(up, tolerance) && s.covers(position, 0.0))
            .map(|s| (s, s.plane_distance(position)))
            .filter(|(_, d)| *d >= 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::physics::{RigidBody, SimpleWorld};

    const G: f32 = 9.82;

    fn floor_box() -> Aabb {
        Aabb::new(Vec3::new(-6.0, -1.0, -6.0), Vec3::new(6.0, 0.0, 6.0))
    }

    fn east_wall_box() -> Aabb {
        Aabb::new(Vec3::new(5.0, -1.0, -6.0), Vec3::new(6.0, 11.0, 6.0))
    }

    fn north_wall_box() -> Aabb {
        Aabb::new(Vec3::new(-6.0, -1.0, -6.0), Vec3::new(6.0, 11.0, -5.0))
    }

    fn controller_with_room() -> (GravityController, SurfaceId, SurfaceId, SurfaceId) {
        let mut controller = GravityController::new(GravityConfig::default());
        let floor = controller.register_surface(floor_box(), Vec3::Y).unwrap();
        let east = controller.register_surface(east_wall_box(), Vec3::NEG_X).unwrap();
        let north = controller.register_surface(north_wall_box(), Vec3::Z).unwrap();
        (controller, floor, east, north)
    }

    #[test]
    fn test_default_gravity_points_down() {
        let controller = GravityController::new(GravityConfig::default());
        assert_eq!(controller.current_vector(), Vec3::new(0.0, -G, 0.0));
        assert_eq!(controller.up_vector(), Vec3::Y);
        assert!(!controller.is_transitioning());
    }

    #[test]
    fn test_register_rejects_degenerate_normal() {
        let mut controller = GravityController::new(GravityConfig::default());
        assert!(controller.register_surface(floor_box(), Vec3::ZERO).is_err());
        assert!(controller.register_surface(floor_box(), Vec3::splat(f32::NAN)).is_err());
        assert_eq!(controller.surface_count(), 0);

        let id = controller.register_surface(floor_box(), Vec3::Y).unwrap();
        assert_eq!(id.index(), 0);
        assert_eq!(controller.surface_count(), 1);
    }

    #[test]
    fn test_trigger_near_wall_moving_toward_it() {
        let (controller, _, east, _) = controller_with_room();
        let candidate = controller
            .find_trigger(Vec3::new(4.2, 0.5, 0.0), Vec3::new(2.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(candidate.surface, east);
        assert!((candidate.inward_speed - 2.0).abs() < 1e-5);
        assert!(candidate.edge_distance < 1.0);
    }

    #[test]
    fn test_no_trigger_when_too_slow_or_too_far() {
        let (controller, _, _, _) = controller_with_room();
        // Standing still by the wall
        assert!(controller.find_trigger(Vec3::new(4.2, 0.5, 0.0), Vec3::ZERO).is_none());
        // Walking along the wall
        assert!(controller
            .find_trigger(Vec3::new(4.2, 0.5, 0.0), Vec3::new(0.0, 0.0, 3.0))
            .is_none());
        // Moving toward the wall from the middle of the room
        assert!(controller
            .find_trigger(Vec3::new(0.0, 0.5, 0.0), Vec3::new(3.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_floor_is_never_a_candidate_for_itself() {
        let (controller, _, _, _) = controller_with_room();
        // Falling onto the floor fast: floor faces up, not orthogonal
        assert!(controller
            .find_trigger(Vec3::new(0.0, 0.6, 0.0), Vec3::new(0.0, -5.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let (controller, _, east, north) = controller_with_room();
        // In the north-east corner, closer to the north wall (z = -5)
        let position = Vec3::new(4.3, 0.5, -4.4);
        let velocity = Vec3::new(2.0, 0.0, -2.0);
        let candidate = controller.find_trigger(position, velocity).unwrap();
        assert_eq!(candidate.surface, north);

        // Closer to the east wall instead
        let candidate = controller
            .find_trigger(Vec3::new(4.4, 0.5, -4.3), velocity)
            .unwrap();
        assert_eq!(candidate.surface, east);
    }

    #[test]
    fn test_reorient_rejections() {
        let mut controller = GravityController::new(GravityConfig::default());
        assert_eq!(controller.reorient_to(Vec3::Y), Err(GravityError::AlreadyOriented));
        assert!(matches!(
            controller.reorient_to(Vec3::new(1.0, 1.0, 0.0)),
            Err(GravityError::NonOrthogonal { .. })
        ));
        assert!(matches!(
            controller.reorient_to(Vec3::ZERO),
            Err(GravityError::DegenerateNormal { .. })
        ));
        assert!(!controller.is_transitioning());

        assert!(controller.reorient_to(Vec3::NEG_X).is_ok());
        assert_eq!(controller.reorient_to(Vec3::Z), Err(GravityError::TransitionInProgress));
        assert_eq!(controller.state().target_vector(), Some(Vec3::new(G, 0.0, 0.0)));
    }

    #[test]
    fn test_tick_runs_transition_and_notifies_once() {
        let mut controller = GravityController::new(GravityConfig::default());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        controller.subscribe(move |e: &GravityChanged| sink.borrow_mut().push(*e));

        let mut world = SimpleWorld::default();
        let avatar = world.add_body(RigidBody::sphere(Vec3::new(0.0, 5.0, 0.0), 0.5, 1.0));

        controller.reorient_to(Vec3::NEG_X).unwrap();
        let feed = controller.feed();
        let mut ticks = 0;
        while controller.is_transitioning() {
            controller.tick(1.0 / 60.0, &mut world, avatar);
            assert!((controller.current_vector().length() - G).abs() < 1e-3);
            assert_eq!(world.gravity(), controller.current_vector());
            ticks += 1;
            assert!(ticks < 100, "transition never completed");
        }

        assert_eq!(controller.current_vector(), Vec3::new(G, 0.0, 0.0));
        assert_eq!(feed.vector(), Vec3::new(G, 0.0, 0.0));
        assert!(!feed.sample().transitioning);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].gravity, Vec3::new(G, 0.0, 0.0));
        assert_eq!(events[0].up, Vec3::NEG_X);
        assert_eq!(events[0].surface, None);
    }

    #[test]
    fn test_tick_detects_and_reports_surface() {
        let (mut controller, _, east, _) = controller_with_room();
        let mut world = SimpleWorld::default();
        let avatar = world.add_body(RigidBody::sphere(Vec3::new(4.2, 0.5, 0.0), 0.5, 1.0));
        world.set_velocity(avatar, Vec3::new(2.0, 0.0, 0.0));

        assert!(controller.tick(1.0 / 60.0, &mut world, avatar).is_none());
        assert!(controller.is_transitioning());

        let mut completed = None;
        for _ in 0..60 {
            if let Some(event) = controller.tick(1.0 / 60.0, &mut world, avatar) {
                completed = Some(event);
                break;
            }
        }
        let event = completed.unwrap();
        assert_eq!(event.surface, Some(east));
        assert_eq!(event.gravity, Vec3::new(G, 0.0, 0.0));
    }

    #[test]
    fn test_unsubscribe() {
        let mut controller = GravityController::new(GravityConfig::default());
        let id = controller.subscribe(|_: &GravityChanged| {});
        assert_eq!(controller.observer_count(), 1);
        assert!(controller.unsubscribe(id));
        assert_eq!(controller.observer_count(), 0);
    }

    #[test]
    fn test_unregister_all_keeps_transition() {
        let (mut controller, _, _, _) = controller_with_room();
        controller.reorient_to(Vec3::NEG_X).unwrap();
        controller.unregister_all();
        assert_eq!(controller.surface_count(), 0);
        assert!(controller.is_transitioning());
    }
}
