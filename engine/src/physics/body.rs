//! Rigid bodies simulated by a [`PhysicsWorld`](super::PhysicsWorld).

use glam::Vec3;

/// Opaque handle to a body owned by a physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Index of the body inside its world.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A dynamic sphere body.
///
/// Forces accumulate between steps and are cleared by the world after
/// integration. Impulses change velocity immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Current position in world space (meters)
    pub position: Vec3,
    /// Current velocity (meters/second)
    pub velocity: Vec3,
    /// Angular velocity (radians/second); carried for the host, not integrated
    pub angular_velocity: Vec3,
    /// Mass (kilograms)
    pub mass: f32,
    /// Collision radius (meters)
    pub radius: f32,
    force: Vec3,
}

impl RigidBody {
    /// Create a sphere body at rest.
    pub fn sphere(position: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: mass.max(0.001), // Prevent division by zero
            radius: radius.max(0.0),
            force: Vec3::ZERO,
        }
    }

    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Force accumulated since the last step.
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Apply an instantaneous impulse (kg·m/s).
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse * self.inverse_mass();
    }

    pub(crate) fn take_force(&mut self) -> Vec3 {
        std::mem::take(&mut self.force)
    }
}
