//! Gravity surfaces: static colliders that can become "the floor".

use glam::Vec3;

use crate::error::GravityError;
use crate::physics::collision::Aabb;
use crate::physics::types::normalize_direction;

/// Identifier assigned to a surface at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u32);

impl SurfaceId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A static collider plus the outward unit normal of its walkable face.
///
/// Immutable once registered; the normal always points into open space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySurface {
    id: SurfaceId,
    collider: Aabb,
    normal: Vec3,
}

impl GravitySurface {
    /// Validate `normal` and build a surface. Non-unit normals are normalized.
    pub(crate) fn new(id: SurfaceId, collider: Aabb, normal: Vec3) -> Result<Self, GravityError> {
        let normal = validate_normal(normal)?;
        Ok(Self {
            id,
            collider,
            normal,
        })
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn collider(&self) -> &Aabb {
        &self.collider
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Direction pointing from open space into the surface.
    pub fn inward(&self) -> Vec3 {
        -self.normal
    }

    /// Gravity vector that makes this surface the floor.
    pub fn gravity(&self, magnitude: f32) -> Vec3 {
        self.inward() * magnitude
    }

    /// Signed distance from `point` to the walkable face plane.
    ///
    /// Positive in front of the face, negative behind it.
    pub fn plane_distance(&self, point: Vec3) -> f32 {
        point.dot(self.normal) - self.collider.support_distance(self.normal)
    }

    /// Whether `point` projects onto the face, grown by `margin`.
    pub fn covers(&self, point: Vec3, margin: f32) -> bool {
        self.collider.face_contains(point, self.normal, margin)
    }

    /// Whether this surface meets `up` at (roughly) 90 degrees.
    pub fn is_orthogonal_to(&self, up: Vec3, tolerance: f32) -> bool {
        self.normal.dot(up).abs() <= tolerance
    }

    /// Whether this surface faces the same way as `up`.
    pub fn faces(&self, up: Vec3, tolerance: f32) -> bool {
        self.normal.dot(up) >= 1.0 - tolerance
    }
}

/// Check that a normal can orient gravity and return it normalized.
pub fn validate_normal(normal: Vec3) -> Result<Vec3, GravityError> {
    normalize_direction(normal).ok_or(GravityError::DegenerateNormal { normal })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn east_wall() -> GravitySurface {
        // Wall occupying x in [5, 6], walkable face at x = 5 looking toward -X
        let collider = Aabb::new(Vec3::new(5.0, -1.0, -5.0), Vec3::new(6.0, 10.0, 5.0));
        GravitySurface::new(SurfaceId(0), collider, -Vec3::X).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_normals() {
        let collider = Aabb::new(Vec3::ZERO, Vec3::ONE);
        for normal in [
            Vec3::ZERO,
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(0.0, f32::INFINITY, 0.0),
        ] {
            let err = GravitySurface::new(SurfaceId(0), collider, normal).unwrap_err();
            assert!(matches!(err, GravityError::DegenerateNormal { .. }));
        }
    }

    #[test]
    fn test_normalizes_normal() {
        let collider = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let surface = GravitySurface::new(SurfaceId(3), collider, Vec3::new(0.0, 4.0, 0.0)).unwrap();
        assert_eq!(surface.normal(), Vec3::Y);
        assert_eq!(surface.id().index(), 3);
    }

    #[test]
    fn test_gravity_points_into_surface() {
        let wall = east_wall();
        assert_eq!(wall.gravity(9.82), Vec3::new(9.82, 0.0, 0.0));
    }

    #[test]
    fn test_plane_distance() {
        let wall = east_wall();
        assert!((wall.plane_distance(Vec3::new(4.2, 0.5, 0.0)) - 0.8).abs() < 1e-5);
        assert!(wall.plane_distance(Vec3::new(5.5, 0.5, 0.0)) < 0.0);
    }

    #[test]
    fn test_orientation_queries() {
        let wall = east_wall();
        assert!(wall.is_orthogonal_to(Vec3::Y, 1e-3));
        assert!(!wall.is_orthogonal_to(-Vec3::X, 1e-3));
        assert!(wall.faces(-Vec3::X, 1e-3));
        assert!(!wall.faces(Vec3::X, 1e-3));
    }
}
