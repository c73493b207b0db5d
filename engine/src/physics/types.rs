//! Physics type re-exports from glam
//!
//! Core math types used throughout the gravity core, plus the small set of
//! direction helpers shared by the gravity and movement controllers.

pub use glam::{Quat, Vec3};

/// Squared length below which a direction is considered degenerate.
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-8;

/// Normalize a direction, rejecting zero-length and non-finite input.
///
/// Unlike `Vec3::try_normalize`, tiny-but-finite vectors are rejected too,
/// since their normalized result is dominated by rounding noise.
pub fn normalize_direction(v: Vec3) -> Option<Vec3> {
    if !v.is_finite() {
        return None;
    }
    let length_sq = v.length_squared();
    if length_sq < DEGENERATE_LENGTH_SQ {
        return None;
    }
    let n = v / length_sq.sqrt();
    n.is_finite().then_some(n)
}

/// Remove the component of `v` along the unit vector `axis`.
pub fn project_onto_plane(v: Vec3, axis: Vec3) -> Vec3 {
    v - axis * v.dot(axis)
}
