//! Input Module
//!
//! The core consumes a per-frame [`MovementIntent`]; mapping keys, sticks or
//! touch gestures onto it is the host's job.
//!
//! # Example
//!
//! ```rust,ignore
//! use kula_engine::input::MovementIntent;
//!
//! let intent = MovementIntent::new(1.0, 0.0, space_pressed);
//! simulation.step(dt, intent, camera_forward);
//! ```

pub mod intent;

pub use intent::MovementIntent;
