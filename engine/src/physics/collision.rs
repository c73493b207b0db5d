//! Collision detection module
//!
//! Static level geometry is a set of axis-aligned boxes; the avatar is a
//! sphere. This module holds the box math (face planes, face coverage) used
//! by gravity surfaces, and the sphere-box contact query used by
//! [`SimpleWorld`](super::SimpleWorld).
//!
//! # Example
//!
//! ```ignore
//! use kula_engine::physics::collision::{Aabb, sphere_aabb_contact};
//! use glam::Vec3;
//!
//! let floor = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
//! if let Some(contact) = sphere_aabb_contact(Vec3::new(0.0, 0.4, 0.0), 0.5, &floor) {
//!     println!("push out {} along {:?}", contact.depth, contact.normal);
//! }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box used as a static collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two opposite corners (in any order).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check whether a point lies inside (or on) the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Plane offset of the face that looks along `direction`.
    ///
    /// For a unit `direction`, every point `p` on that face satisfies
    /// `p.dot(direction) == support_distance(direction)`.
    pub fn support_distance(&self, direction: Vec3) -> f32 {
        self.center().dot(direction) + self.half_extents().dot(direction.abs())
    }

    /// Check whether `point` projects onto the face looking along `normal`,
    /// with the face rectangle grown by `margin` on every side.
    ///
    /// Only the axes lying in the face plane are tested; distance along the
    /// normal is the caller's concern.
    pub fn face_contains(&self, point: Vec3, normal: Vec3, margin: f32) -> bool {
        let in_plane = normal.abs().cmplt(Vec3::splat(0.5));
        let inside = point.cmpge(self.min - margin) & point.cmple(self.max + margin);
        // Axes along the normal always pass.
        (inside | !in_plane).all()
    }
}

/// Contact between a sphere and a static box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit direction to push the sphere out of the box
    pub normal: Vec3,
    /// Penetration depth along `normal` (meters)
    pub depth: f32,
}

/// Computes the surface normal for a point on (or inside) an AABB.
///
/// Picks the face the point is closest to in unit-cube space and returns its
/// outward normal.
pub fn aabb_surface_normal(point: Vec3, aabb: &Aabb) -> Vec3 {
    let half_extents = aabb.half_extents().max(Vec3::splat(f32::EPSILON));
    let normalized = (point - aabb.center()) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Sphere vs AABB contact query.
///
/// Returns `None` when the sphere does not touch the box. When the sphere
/// center is inside the box it is pushed out through the nearest face.
pub fn sphere_aabb_contact(center: Vec3, radius: f32, aabb: &Aabb) -> Option<Contact> {
    let closest = center.clamp(aabb.min, aabb.max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: delta / dist,
            depth: radius - dist,
        });
    }

    // Center inside the box
    let normal = aabb_surface_normal(center, aabb);
    let depth = aabb.support_distance(normal) - center.dot(normal) + radius;
    Some(Contact { normal, depth })
}
