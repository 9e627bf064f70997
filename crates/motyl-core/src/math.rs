//! Math utilities
//!
//! Re-exports from glam plus planes and planar reflections.

pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// A plane in 3D space (`normal · p + distance = 0`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector
    pub normal: Vec3,
    /// Signed offset from origin along the normal, negated
    pub distance: f32,
}

impl Plane {
    /// Create a new plane. `normal` must already be unit length.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Create a plane from a point and normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Get the signed distance from a point to the plane
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Closest point on the plane to the origin
    pub fn origin_projection(&self) -> Vec3 {
        self.normal * -self.distance
    }

    /// Reflect a point across the plane: `p - 2 (n·p - d) n`
    pub fn reflect_point(&self, point: Vec3) -> Vec3 {
        point - 2.0 * self.distance_to_point(point) * self.normal
    }

    /// Matrix reflecting points across the plane
    pub fn reflection_matrix(&self) -> Mat4 {
        reflection_matrix(self.origin_projection(), self.normal)
    }
}

/// Computes a reflection matrix for a plane given by a point and a normal.
pub fn reflection_matrix(plane_point: Vec3, plane_normal: Vec3) -> Mat4 {
    let n = plane_normal.normalize();
    let d = -plane_point.dot(n);

    // | 1-2nx²   -2nxny   -2nxnz   -2nxd |
    // | -2nxny   1-2ny²   -2nynz   -2nyd |
    // | -2nxnz   -2nynz   1-2nz²   -2nzd |
    // |    0        0        0       1   |
    Mat4::from_cols(
        Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
        Vec4::new(-2.0 * n.x * d, -2.0 * n.y * d, -2.0 * n.z * d, 1.0),
    )
}

/// Check whether two matrices agree element-wise within `epsilon`
pub fn mat4_approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}
