#![warn(missing_docs)]

//! Math types for the fashionsynth garment pipeline.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! stage: points and vectors, an affine transform that composes the
//! scene's XYZ Euler rotations, bounding boxes, 2D outlines, and
//! tolerance constants.

mod bbox;
mod outline;

pub use bbox::Aabb3;
pub use outline::Outline;

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// A point in 3D scene space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D pattern (SVG) space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Rotation from XYZ Euler angles (radians).
    ///
    /// X is applied first, then Y, then Z, so the matrix is `Rz * Ry * Rx`.
    /// This is the rotation order pattern pieces carry in the scene.
    pub fn euler_xyz(euler: &Vec3) -> Self {
        Self::rotation_z(euler.z)
            .then(&Self::rotation_y(euler.y))
            .then(&Self::rotation_x(euler.x))
    }

    /// Object-to-world transform for a piece at `location` with Euler `rotation`.
    pub fn placement(location: &Vec3, rotation: &Vec3) -> Self {
        Self::translation(location.x, location.y, location.z).then(&Self::euler_xyz(rotation))
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Distance tolerance for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f64,
}

impl Tolerance {
    /// Default garment tolerance, 1e-3 scene units.
    ///
    /// The distance under which two traced vertices are treated as the
    /// same stitch anchor.
    pub const DEFAULT: Self = Self { linear: 1e-3 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(FRAC_PI_2);
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euler_order_applies_x_first() {
        // X then Z: (0,1,0) -x90-> (0,0,1) -z90-> (0,0,1)
        let t = Transform::euler_xyz(&Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let r = t.apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert!(r.x.abs() < 1e-12);
        assert!(r.y.abs() < 1e-12);
        assert!((r.z - 1.0).abs() < 1e-12);

        // (1,0,0) -x90-> (1,0,0) -z90-> (0,1,0)
        let r2 = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(r2.x.abs() < 1e-12);
        assert!((r2.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_placement_rotates_then_translates() {
        let t = Transform::placement(&Vec3::new(0.5, 0.0, 0.0), &Vec3::new(0.0, 0.0, FRAC_PI_2));
        let r = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((r.x - 0.5).abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert!(r.z.abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-4, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.01, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
        assert!(tol.is_zero(5e-4));
    }
}
