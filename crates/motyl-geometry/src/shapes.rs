//! Fixed Shapes
//!
//! Pentagon template, cube, butterfly wing and billboard quad. Front faces
//! wind counterclockwise around their normal.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::{Mesh, Vertex};
use crate::{GeometryError, GeometryResult};

/// Index list of the pentagon: a fan from vertex 0.
pub const PENTAGON_INDICES: [u32; 9] = [0, 1, 2, 0, 2, 3, 0, 3, 4];

/// Unit regular pentagon in the XY plane facing -Z.
///
/// Vertex `i` sits at angle `-i * 2π/5`, starting on +X.
pub fn build_pentagon() -> Mesh {
    let da = TAU / 5.0;
    let vertices = (0..5)
        .map(|i| {
            let (sin, cos) = (-(i as f32) * da).sin_cos();
            Vertex::new(Vec3::new(cos, sin, 0.0), Vec3::NEG_Z)
        })
        .collect();

    Mesh::from_trusted("pentagon", vertices, PENTAGON_INDICES.to_vec())
}

/// Unit axis-aligned cube centred at the origin with flat per-face normals.
pub fn build_box() -> Mesh {
    // (normal, u, v) with u × v = normal
    let faces = [
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        let center = normal * 0.5;
        for (du, dv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(Vertex::new(center + u * du + v * dv, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::from_trusted("box", vertices, indices)
}

/// Double-sided butterfly wing rectangle in the XY plane.
///
/// Spans `[-width/2, width/2]` along X (the body's forward axis) and
/// `[-height/2, height/2]` along Y. The animator offsets it so the hinge
/// lies on the body.
pub fn build_wing(width: f32, height: f32) -> GeometryResult<Mesh> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(GeometryError::InvalidWingSize { width, height });
    }

    let (hw, hh) = (width * 0.5, height * 0.5);
    let corners = [
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    ];

    let mut vertices: Vec<Vertex> = corners.iter().map(|&p| Vertex::new(p, Vec3::Z)).collect();
    vertices.extend(corners.iter().map(|&p| Vertex::new(p, Vec3::NEG_Z)));

    let indices = vec![0, 1, 2, 0, 2, 3, 4, 6, 5, 4, 7, 6];
    Mesh::new("wing", vertices, indices)
}

/// Unit quad in the XY plane facing +Z, used for camera-facing billboards.
pub fn build_billboard_quad() -> Mesh {
    let vertices = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z))
        .collect();

    Mesh::from_trusted("billboard", vertices, vec![0, 1, 2, 0, 2, 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pentagon_layout() {
        let pentagon = build_pentagon();
        assert_eq!(pentagon.vertex_count(), 5);
        assert_eq!(pentagon.index_count(), 9);
        assert!((pentagon.vertices()[0].position - Vec3::X).length() < 1e-6);

        // Second vertex is a step clockwise when looking down -Z from +Z
        let v1 = pentagon.vertices()[1].position;
        assert!(v1.y < 0.0);

        for v in pentagon.vertices() {
            assert!((v.position.length() - 1.0).abs() < 1e-6);
            assert_eq!(v.position.z, 0.0);
            assert_eq!(v.normal, Vec3::NEG_Z);
        }
    }

    #[test]
    fn test_pentagon_faces_its_normal() {
        let pentagon = build_pentagon();
        for tri in pentagon.triangles() {
            assert!(pentagon.face_normal(tri).dot(Vec3::NEG_Z) > 0.0);
        }
    }

    #[test]
    fn test_box_layout() {
        let cube = build_box();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.normals_are_unit(1e-6));
        assert!(cube.all_vertices_referenced());

        for v in cube.vertices() {
            assert_eq!(v.position.abs().max_element(), 0.5);
            // Each vertex lies on the face its normal names
            assert_eq!(v.position.dot(v.normal), 0.5);
        }
    }

    #[test]
    fn test_box_winding_points_outward() {
        let cube = build_box();
        for tri in cube.triangles() {
            let normal = cube.vertices()[tri[0] as usize].normal;
            let geometric = cube.face_normal(tri);
            assert!(geometric.normalize().dot(normal) > 0.99);
        }
    }

    #[test]
    fn test_wing_is_double_sided() {
        let wing = build_wing(0.15, 0.1).unwrap();
        assert_eq!(wing.vertex_count(), 8);
        assert_eq!(wing.triangle_count(), 4);
        for tri in wing.triangles() {
            let normal = wing.vertices()[tri[0] as usize].normal;
            assert!(wing.face_normal(tri).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_wing_rejects_zero_size() {
        assert_eq!(
            build_wing(0.0, 0.1).unwrap_err(),
            GeometryError::InvalidWingSize {
                width: 0.0,
                height: 0.1
            }
        );
    }

    #[test]
    fn test_billboard_quad() {
        let quad = build_billboard_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert!(quad.face_normal([0, 1, 2]).dot(Vec3::Z) > 0.0);
    }
}
