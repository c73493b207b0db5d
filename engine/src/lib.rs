//! Kula Engine Library
//!
//! Gravity-reorientation and surface-relative movement core for a puzzle
//! platformer where walls become floors. Rendering, audio, UI and camera
//! animation live in the host; this crate owns gravity, edge detection and
//! avatar movement under an arbitrary gravity direction.
//!
//! # Modules
//!
//! - [`gravity`] - Gravity ownership, surface registry, edge-triggered transitions
//! - [`player`] - Movement basis and the surface-relative movement controller
//! - [`physics`] - The `PhysicsWorld` seam and a small reference world
//! - [`input`] - Per-frame movement intent
//! - [`config`] - Serde-loadable tuning with defaults
//! - [`simulation`] - Frame loop tying the pieces together in order
//!
//! # Example
//!
//! ```ignore
//! use kula_engine::{Aabb, MovementIntent, Simulation, SimulationConfig, Vec3};
//!
//! let mut sim = Simulation::new(SimulationConfig::default());
//!
//! // Floor and the east wall of a room
//! sim.add_surface(Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0)), Vec3::Y)?;
//! sim.add_surface(Aabb::new(Vec3::new(5.0, 0.0, -5.0), Vec3::new(6.0, 10.0, 5.0)), Vec3::NEG_X)?;
//!
//! sim.subscribe(|e: &GravityChanged| println!("new up: {:?}", e.up));
//!
//! // Walk into the wall; gravity swings onto it
//! for _ in 0..300 {
//!     sim.step(1.0 / 60.0, MovementIntent::forward(), Vec3::X);
//! }
//! ```

pub mod config;
pub mod error;
pub mod gravity;
pub mod input;
pub mod physics;
pub mod player;
pub mod simulation;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GravityConfig, MovementConfig, SimulationConfig};
pub use error::{BasisError, ConfigError, GravityError};
pub use gravity::{GravityChanged, GravityController, GravityFeed, GravityObserver, SurfaceId};
pub use input::MovementIntent;
pub use physics::{Aabb, BodyHandle, PhysicsWorld, RigidBody, SimpleWorld, Vec3};
pub use player::{MovementBasis, MovementController, MovementState};
pub use simulation::{FrameReport, Simulation};
