//! Physics module for the Kula engine
//!
//! The gravity core treats rigid-body simulation as a leaf dependency behind
//! the [`PhysicsWorld`] trait. This module defines that seam and ships a
//! small reference implementation, [`SimpleWorld`], good enough for the
//! sandbox, the browser build and the test suite.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec3, Quat) re-exported from glam
//! - [`body`] - Sphere rigid bodies and handles
//! - [`collision`] - AABB colliders and sphere-box contacts
//! - [`world`] - The `PhysicsWorld` trait and `SimpleWorld`

pub mod body;
pub mod collision;
pub mod types;
pub mod world;

pub use body::{BodyHandle, RigidBody};
pub use collision::{Aabb, Contact, aabb_surface_normal, sphere_aabb_contact};
pub use types::{Quat, Vec3, normalize_direction, project_onto_plane};
pub use world::{ColliderId, PhysicsWorld, SimpleWorld};
