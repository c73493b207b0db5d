//! Error types for the gravity core.
//!
//! Nothing here is fatal. Per-frame entry points recover locally and keep
//! the previous valid state; these types exist so that setup-time calls
//! (surface registration, scripted reorientation, config loading) can tell
//! their caller what was rejected.

use glam::Vec3;

/// Errors raised by the gravity controller.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GravityError {
    /// A surface normal is zero-length or non-finite.
    #[error("degenerate surface normal {normal:?}")]
    DegenerateNormal { normal: Vec3 },

    /// A transition was requested while another one is in flight.
    #[error("a gravity transition is already in progress")]
    TransitionInProgress,

    /// The requested orientation is not at 90° to the current one.
    #[error("surface normal {normal:?} is not orthogonal to current up {up:?}")]
    NonOrthogonal { normal: Vec3, up: Vec3 },

    /// Gravity already points against the requested normal.
    #[error("gravity is already oriented to this surface")]
    AlreadyOriented,
}

/// Reasons a movement basis could not be derived from its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BasisError {
    /// The direction to project is parallel to the up vector.
    #[error("direction is parallel to the up vector")]
    Degenerate,

    /// A computed component came out NaN or infinite.
    #[error("basis computation produced a non-finite value")]
    NonFinite,
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
