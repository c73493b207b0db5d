//! Movement basis: the per-frame {forward, right, up} triple.
//!
//! `up` is always opposite to gravity. `forward` is the camera's forward
//! direction flattened onto the plane perpendicular to `up`, and
//! `right = forward × up`. When the camera looks straight along the gravity
//! axis there is nothing to flatten, so the basis falls back, in order, to:
//!
//! 1. the previous forward (re-projected if gravity moved),
//! 2. the previous up (walking into a wall that becomes the floor keeps
//!    going "up" it),
//! 3. any vector orthogonal to `up`.

use glam::{Vec2, Vec3};

use crate::error::BasisError;
use crate::physics::types::{normalize_direction, project_onto_plane};

/// Where the forward vector of a rebuilt basis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisSource {
    Camera,
    PreviousForward,
    PreviousUp,
    Arbitrary,
}

/// Orthonormal, right-handed movement frame (`forward × up == right`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for MovementBasis {
    /// Gravity down (-Y), camera looking toward -Z.
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}

impl MovementBasis {
    /// Build a basis from scratch, using the default basis as history.
    pub fn from_gravity(gravity: Vec3, camera_forward: Vec3) -> Self {
        Self::default()
            .rebuild(gravity, camera_forward)
            .map(|(basis, _)| basis)
            .unwrap_or_default()
    }

    /// Derive the basis for `gravity` and `camera_forward`, using `self` as
    /// the previous valid basis.
    ///
    /// Fails only with [`BasisError::NonFinite`] (gravity is zero/non-finite
    /// or a result diverged); the caller keeps `self` in that case.
    pub fn rebuild(&self, gravity: Vec3, camera_forward: Vec3) -> Result<(Self, BasisSource), BasisError> {
        let up = normalize_direction(-gravity).ok_or(BasisError::NonFinite)?;

        let (forward, source) = match tangent(camera_forward, up) {
            Ok(forward) => (forward, BasisSource::Camera),
            Err(_) => self.fallback_forward(up),
        };

        let right = normalize_direction(forward.cross(up)).ok_or(BasisError::NonFinite)?;
        let basis = Self { forward, right, up };
        if basis.is_finite() {
            Ok((basis, source))
        } else {
            Err(BasisError::NonFinite)
        }
    }

    fn fallback_forward(&self, up: Vec3) -> (Vec3, BasisSource) {
        // Unchanged gravity: keep the previous forward bit-for-bit
        if self.forward.dot(up).abs() < 1e-6 && self.forward.is_normalized() {
            return (self.forward, BasisSource::PreviousForward);
        }
        if let Ok(forward) = tangent(self.forward, up) {
            return (forward, BasisSource::PreviousForward);
        }
        if let Ok(forward) = tangent(self.up, up) {
            return (forward, BasisSource::PreviousUp);
        }
        (up.any_orthonormal_vector(), BasisSource::Arbitrary)
    }

    /// Map planar input (right, forward) to a world direction on the plane.
    pub fn world_direction(&self, planar: Vec2) -> Vec3 {
        self.right * planar.x + self.forward * planar.y
    }

    /// Split `v` into (along up, on the plane).
    pub fn decompose(&self, v: Vec3) -> (Vec3, Vec3) {
        let along_up = self.up * v.dot(self.up);
        (along_up, v - along_up)
    }

    pub fn is_finite(&self) -> bool {
        self.forward.is_finite() && self.right.is_finite() && self.up.is_finite()
    }

    /// Unit length, pairwise orthogonal and right-handed, within `epsilon`.
    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let unit = [self.forward, self.right, self.up]
            .iter()
            .all(|v| (v.length() - 1.0).abs() < epsilon);
        let orthogonal = self.forward.dot(self.right).abs() < epsilon
            && self.forward.dot(self.up).abs() < epsilon
            && self.right.dot(self.up).abs() < epsilon;
        let handed = self.forward.cross(self.up).distance(self.right) < epsilon;
        unit && orthogonal && handed
    }
}

/// Flatten `direction` onto the plane perpendicular to the unit `up`.
pub fn tangent(direction: Vec3, up: Vec3) -> Result<Vec3, BasisError> {
    let direction = normalize_direction(direction).ok_or(if direction.is_finite() {
        BasisError::Degenerate
    } else {
        BasisError::NonFinite
    })?;
    normalize_direction(project_onto_plane(direction, up)).ok_or(BasisError::Degenerate)
}
