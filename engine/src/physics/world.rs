//! Physics world seam and the built-in reference world.
//!
//! The gravity and movement controllers never reach for a global physics
//! object. They are handed `&mut impl PhysicsWorld` on every call, and the
//! world itself is an ordinary owned value (see
//! [`Simulation`](crate::simulation::Simulation)).
//!
//! [`SimpleWorld`] integrates sphere bodies with semi-implicit Euler and
//! resolves contacts against static boxes. Any other rigid-body engine can
//! stand in by implementing [`PhysicsWorld`].

use glam::Vec3;

use super::body::{BodyHandle, RigidBody};
use super::collision::{Aabb, sphere_aabb_contact};

/// Rigid-body engine as seen by the gravity core.
pub trait PhysicsWorld {
    /// Uniform gravity acceleration applied to every dynamic body (m/s²).
    fn gravity(&self) -> Vec3;

    fn set_gravity(&mut self, gravity: Vec3);

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody>;

    /// Accumulate a force to be integrated on the next step.
    fn apply_force(&mut self, handle: BodyHandle, force: Vec3);

    /// Apply an instantaneous impulse; velocity changes before the next step.
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3);

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3);

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);
}

/// Handle to a static collider inside a [`SimpleWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(usize);

impl ColliderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Minimal rigid-body world: dynamic spheres against static boxes.
#[derive(Debug, Clone)]
pub struct SimpleWorld {
    gravity: Vec3,
    bodies: Vec<RigidBody>,
    colliders: Vec<Aabb>,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.82, 0.0))
    }
}

impl SimpleWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            colliders: Vec::new(),
        }
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    pub fn add_static(&mut self, collider: Aabb) -> ColliderId {
        self.colliders.push(collider);
        ColliderId(self.colliders.len() - 1)
    }

    pub fn colliders(&self) -> &[Aabb] {
        &self.colliders
    }

    /// Remove all static geometry (level unload). Bodies are kept.
    pub fn clear_static(&mut self) {
        self.colliders.clear();
    }

    fn resolve_contacts(body: &mut RigidBody, colliders: &[Aabb]) {
        for collider in colliders {
            if let Some(contact) = sphere_aabb_contact(body.position, body.radius, collider) {
                body.position += contact.normal * contact.depth;
                // Remove only the velocity component driving into the surface
                let into_surface = body.velocity.dot(contact.normal);
                if into_surface < 0.0 {
                    body.velocity -= contact.normal * into_surface;
                }
            }
        }
    }
}

impl PhysicsWorld for SimpleWorld {
    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.add_force(force);
        }
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.apply_impulse(impulse);
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.velocity = velocity;
        }
    }

    fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let gravity = self.gravity;
        for body in &mut self.bodies {
            let acceleration = gravity + body.take_force() * body.inverse_mass();

            // Semi-implicit Euler: velocity first, then position with the new velocity
            body.velocity += acceleration * dt;
            body.position += body.velocity * dt;

            Self::resolve_contacts(body, &self.colliders);
        }
    }
}
