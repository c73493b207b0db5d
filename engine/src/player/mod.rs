//! Player Module
//!
//! Surface-relative avatar control.
//!
//! # Components
//!
//! - [`MovementController`] - Force-based movement relative to the current gravity
//!   - Camera-relative planar input, braking, planar speed cap
//!   - Edge-triggered jump along the current up vector
//! - [`MovementBasis`] - The {forward, right, up} frame derived from gravity and camera

pub mod basis;
pub mod movement_controller;

pub use basis::{BasisSource, MovementBasis, tangent};
pub use movement_controller::{MovementController, MovementReport, MovementState, is_grounded_velocity};
