//! Gravity Module
//!
//! Ownership of the world's gravity vector and the surface-to-surface
//! transitions that turn walls into floors.
//!
//! # Components
//!
//! - [`GravityController`] - Registers surfaces, detects edge crossings, runs transitions
//! - [`GravitySurface`] - Static collider plus outward walkable normal
//! - [`GravityState`] - Current vector and the (single) transition in flight
//! - [`GravityObserver`] / [`GravityFeed`] - Change notification and the published sample

pub mod controller;
pub mod events;
pub mod state;
pub mod surface;

pub use controller::{GravityController, TriggerCandidate};
pub use events::{GravityChanged, GravityFeed, GravityObserver, GravitySample, SubscriptionId};
pub use state::{Advance, GravityState, Transition};
pub use surface::{GravitySurface, SurfaceId, validate_normal};
