//! Dodecahedron Transforms
//!
//! Places the pentagon template on each of the 12 faces of a regular
//! dodecahedron and derives the matching mirror reflection per face.
//!
//! Face layout:
//! - face 0 is the bottom face (outward normal -Y), reached by tipping the
//!   template's -Z normal down onto -Y
//! - faces 1..=5 are the lower ring: face 1 is face 0 tilted about Z by the
//!   supplement of the dihedral angle (and spun half a turn so its edge meets
//!   face 0), the others follow by fifth turns about Y
//! - faces 6..=11 are faces 0..=5 turned half a turn about Z, which is a
//!   symmetry of the solid mapping the lower half onto the upper half
//!
//! Template pentagons are scaled by [`FACE_SCALE`] so that face centres sit
//! at distance [`DODECAHEDRON_H`] from the centre and neighbouring faces
//! share their edges exactly.

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Mat4, Vec3};
use motyl_core::math::Plane;
use motyl_core::{DODECAHEDRON_A, DODECAHEDRON_FACES, DODECAHEDRON_H};

/// 4x4 matrix placing a template shape (or a mirrored copy of the scene)
/// into world space.
pub type RigidTransform = Mat4;

/// Uniform scale applied to the unit pentagon template.
///
/// A dodecahedron built from circumradius-1 pentagons has its faces
/// `DODECAHEDRON_H / 2` from the centre; doubling the template puts them at
/// `DODECAHEDRON_H`.
pub const FACE_SCALE: f32 = 2.0;

/// Outward normal of the pentagon template
const TEMPLATE_NORMAL: Vec3 = Vec3::NEG_Z;

/// Rotations taking the template's plane onto each face
fn face_rotations() -> [Mat3; DODECAHEDRON_FACES] {
    let bottom = Mat3::from_rotation_x(-PI / 2.0);
    let first_side =
        Mat3::from_rotation_z(DODECAHEDRON_A - PI) * bottom * Mat3::from_rotation_z(PI);

    let mut rotations = [Mat3::IDENTITY; DODECAHEDRON_FACES];
    rotations[0] = bottom;
    for k in 0..5 {
        rotations[1 + k] = Mat3::from_rotation_y(TAU * k as f32 / 5.0) * first_side;
    }

    let flip = Mat3::from_rotation_z(PI);
    for i in 0..6 {
        rotations[6 + i] = flip * rotations[i];
    }
    rotations
}

/// Build the 12 face placement transforms and the 12 mirror transforms.
///
/// Placement `i` maps the XY-plane pentagon onto face `i`; mirror `i`
/// reflects any point across the plane of face `i`.
pub fn build_dodecahedron_transforms() -> (
    [RigidTransform; DODECAHEDRON_FACES],
    [RigidTransform; DODECAHEDRON_FACES],
) {
    let tables = DodecahedronTables::build();
    (tables.placements, tables.mirrors)
}

/// Cached per-face transforms, built once at scene load
#[derive(Debug, Clone)]
pub struct DodecahedronTables {
    placements: [RigidTransform; DODECAHEDRON_FACES],
    mirrors: [RigidTransform; DODECAHEDRON_FACES],
    planes: [Plane; DODECAHEDRON_FACES],
}

impl DodecahedronTables {
    /// Compute all face placements, planes and mirrors
    pub fn build() -> Self {
        let rotations = face_rotations();

        let mut placements = [Mat4::IDENTITY; DODECAHEDRON_FACES];
        let mut mirrors = [Mat4::IDENTITY; DODECAHEDRON_FACES];
        let mut planes = [Plane::new(Vec3::Y, 0.0); DODECAHEDRON_FACES];

        for (i, rotation) in rotations.iter().enumerate() {
            let normal = (*rotation * TEMPLATE_NORMAL).normalize();
            let plane = Plane::new(normal, -DODECAHEDRON_H);

            placements[i] = Mat4::from_translation(normal * DODECAHEDRON_H)
                * Mat4::from_mat3(*rotation)
                * Mat4::from_scale(Vec3::splat(FACE_SCALE));
            mirrors[i] = plane.reflection_matrix();
            planes[i] = plane;
        }

        log::debug!("Built dodecahedron tables for {DODECAHEDRON_FACES} faces");

        Self {
            placements,
            mirrors,
            planes,
        }
    }

    /// Placement transform of face `i`
    pub fn placement(&self, face: usize) -> RigidTransform {
        self.placements[face]
    }

    /// Mirror transform of face `i`
    pub fn mirror(&self, face: usize) -> RigidTransform {
        self.mirrors[face]
    }

    /// All placement transforms
    pub fn placements(&self) -> &[RigidTransform; DODECAHEDRON_FACES] {
        &self.placements
    }

    /// All mirror transforms
    pub fn mirrors(&self) -> &[RigidTransform; DODECAHEDRON_FACES] {
        &self.mirrors
    }

    /// Plane of face `i`, normal pointing out of the solid
    pub fn plane(&self, face: usize) -> Plane {
        self.planes[face]
    }

    /// Outward unit normal of face `i`
    pub fn face_normal(&self, face: usize) -> Vec3 {
        self.planes[face].normal
    }

    /// Centre of face `i`
    pub fn face_center(&self, face: usize) -> Vec3 {
        self.placements[face].transform_point3(Vec3::ZERO)
    }
}

impl Default for DodecahedronTables {
    fn default() -> Self {
        Self::build()
    }
}
