//! Lighting
//!
//! Up to three positional lights plus an ambient term, and the fixed
//! surface colours of the scene.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use motyl_core::DODECAHEDRON_FACES;
use smallvec::SmallVec;

/// Maximum number of lights a rig carries
pub const MAX_LIGHTS: usize = 3;

pub const WHITE: Vec4 = Vec4::ONE;

/// Position of the green light of the triple rig
pub const GREEN_LIGHT_POSITION: Vec3 = Vec3::new(-1.2, 1.2, 1.2);

/// Position of the blue light of the triple rig
pub const BLUE_LIGHT_POSITION: Vec3 = Vec3::new(1.2, -1.2, -1.2);

const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
    Vec4::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    )
}

/// Translucent colour of each dodecahedron face
pub const FACE_COLORS: [Vec4; DODECAHEDRON_FACES] = [
    rgba8(253, 198, 137, 100),
    rgba8(255, 247, 153, 100),
    rgba8(196, 223, 155, 100),
    rgba8(162, 211, 156, 100),
    rgba8(130, 202, 156, 100),
    rgba8(122, 204, 200, 100),
    rgba8(109, 207, 246, 100),
    rgba8(125, 167, 216, 100),
    rgba8(131, 147, 202, 100),
    rgba8(135, 129, 189, 100),
    rgba8(161, 134, 190, 100),
    rgba8(244, 154, 193, 100),
];

/// Phong coefficients shared by every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCoefficients {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for SurfaceCoefficients {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            diffuse: 0.8,
            specular: 1.0,
            shininess: 100.0,
        }
    }
}

impl SurfaceCoefficients {
    /// Packed as `[ka, kd, ks, m]`
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.ambient, self.diffuse, self.specular, self.shininess)
    }
}

/// Positional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec4,
}

/// Lights active for a group of draws
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient: Vec4,
    pub surface: SurfaceCoefficients,
    pub lights: SmallVec<[PointLight; MAX_LIGHTS]>,
}

impl LightRig {
    /// One white light at the camera
    pub fn single(camera_position: Vec3) -> Self {
        let mut lights = SmallVec::new();
        lights.push(PointLight {
            position: camera_position,
            color: WHITE,
        });
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            surface: SurfaceCoefficients::default(),
            lights,
        }
    }

    /// White light at the camera, plus a green and a blue light in the scene
    pub fn triple(camera_position: Vec3) -> Self {
        let mut rig = Self::single(camera_position);
        rig.lights.push(PointLight {
            position: GREEN_LIGHT_POSITION,
            color: Vec4::new(0.0, 1.0, 0.0, 1.0),
        });
        rig.lights.push(PointLight {
            position: BLUE_LIGHT_POSITION,
            color: Vec4::new(0.0, 0.0, 1.0, 1.0),
        });
        rig
    }

    /// Lights with a fixed place in the scene (everything but the camera light)
    pub fn scene_lights(&self) -> &[PointLight] {
        self.lights.get(1..).unwrap_or(&[])
    }

    /// Shader constant block; unused slots are zero
    pub fn to_constants(&self) -> LightConstants {
        let mut constants = LightConstants::zeroed();
        constants.colors[0] = self.ambient;
        constants.colors[1] = self.surface.to_vec4();
        for (i, light) in self.lights.iter().take(MAX_LIGHTS).enumerate() {
            constants.positions[i] = light.position.extend(1.0);
            constants.colors[2 + i] = light.color;
        }
        constants
    }
}

/// GPU layout of a light rig
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightConstants {
    pub positions: [Vec4; MAX_LIGHTS],
    /// Ambient, surface coefficients, then one colour per light
    pub colors: [Vec4; 2 + MAX_LIGHTS],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rig() {
        let camera = Vec3::new(0.0, 0.0, 5.0);
        let rig = LightRig::single(camera);
        assert_eq!(rig.lights.len(), 1);
        assert_eq!(rig.lights[0].position, camera);
        assert!(rig.scene_lights().is_empty());
    }

    #[test]
    fn test_triple_rig() {
        let rig = LightRig::triple(Vec3::Z);
        assert_eq!(rig.lights.len(), 3);
        assert!(!rig.lights.spilled());
        let scene = rig.scene_lights();
        assert_eq!(scene[0].color, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(scene[1].color, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_constants_layout() {
        let constants = LightRig::single(Vec3::ONE).to_constants();
        assert_eq!(std::mem::size_of::<LightConstants>(), 8 * 16);
        assert_eq!(constants.colors[0], Vec4::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(constants.colors[1], Vec4::new(1.0, 0.8, 1.0, 100.0));
        assert_eq!(constants.colors[2], WHITE);
        assert_eq!(constants.colors[3], Vec4::ZERO);
        assert_eq!(constants.positions[0], Vec4::ONE);
        assert_eq!(constants.positions[1], Vec4::ZERO);
        assert_eq!(bytemuck::bytes_of(&constants).len(), 128);
    }

    #[test]
    fn test_face_colors_translucent() {
        for color in FACE_COLORS {
            assert!((color.w - 100.0 / 255.0).abs() < 1e-6);
        }
        assert!((FACE_COLORS[0].x - 253.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_scene_lights_inside_dodecahedron() {
        for position in [GREEN_LIGHT_POSITION, BLUE_LIGHT_POSITION] {
            assert!(position.length() < motyl_core::DODECAHEDRON_H);
        }
    }
}
