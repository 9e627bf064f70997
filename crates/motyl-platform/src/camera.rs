//! Orbit Camera
//!
//! Camera circling the origin. The view matrix is
//! `translate(0, 0, -distance) * rotate_x(pitch) * rotate_y(yaw)`, so the
//! camera always looks at the origin along its own -Z.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};
use motyl_core::CameraConfig;

use crate::input::{MouseButton, MouseState};
use crate::{PlatformError, PlatformResult};

/// Camera orbiting the scene centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    distance: f32,
    pitch: f32,
    yaw: f32,
    min_distance: f32,
    max_distance: f32,
}

/// Wrap an angle into `[-π, π)`
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

impl OrbitCamera {
    /// Create a camera at `distance`, clamped into `[min_distance, max_distance]`
    pub fn new(distance: f32, min_distance: f32, max_distance: f32) -> PlatformResult<Self> {
        if !(min_distance.is_finite() && max_distance.is_finite() && min_distance < max_distance) {
            return Err(PlatformError::InvalidDistanceRange {
                min: min_distance,
                max: max_distance,
            });
        }
        Ok(Self {
            distance: distance.clamp(min_distance, max_distance),
            pitch: 0.0,
            yaw: 0.0,
            min_distance,
            max_distance,
        })
    }

    /// Camera limited to the clip range of the projection
    pub fn from_config(config: &CameraConfig) -> PlatformResult<Self> {
        Self::new(config.initial_distance, config.near, config.far)
    }

    /// Rotate about the camera's X axis (`d_pitch`) and the world Y axis (`d_yaw`)
    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32) {
        if !(d_pitch.is_finite() && d_yaw.is_finite()) {
            log::warn!("Ignoring non-finite camera rotation ({d_pitch}, {d_yaw})");
            return;
        }
        self.pitch = wrap_angle(self.pitch + d_pitch);
        self.yaw = wrap_angle(self.yaw + d_yaw);
    }

    /// Move towards or away from the centre
    pub fn zoom(&mut self, d_distance: f32) {
        if !d_distance.is_finite() {
            log::warn!("Ignoring non-finite camera zoom {d_distance}");
            return;
        }
        self.distance = (self.distance + d_distance).clamp(self.min_distance, self.max_distance);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.pitch)
            * Mat4::from_rotation_y(self.yaw)
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        Mat4::from_rotation_y(-self.yaw)
            .mul_mat4(&Mat4::from_rotation_x(-self.pitch))
            .transform_point3(Vec3::new(0.0, 0.0, self.distance))
    }
}

/// Turns mouse drags into camera motion.
///
/// Left drag rotates, right drag zooms; left wins when both are held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Radians per pixel of drag
    pub rotate_sensitivity: f32,
    /// Distance units per pixel of vertical drag
    pub zoom_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            rotate_sensitivity: config.rotate_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
        }
    }

    /// Apply this frame's drag. Returns whether the camera moved.
    pub fn apply(&self, camera: &mut OrbitCamera, mouse: &MouseState) -> bool {
        let delta = mouse.delta();
        if delta == glam::Vec2::ZERO {
            return false;
        }

        if mouse.is_pressed(MouseButton::Left) {
            camera.rotate(
                delta.y * self.rotate_sensitivity,
                delta.x * self.rotate_sensitivity,
            );
        } else if mouse.is_pressed(MouseButton::Right) {
            camera.zoom(delta.y * self.zoom_sensitivity);
        } else {
            return false;
        }

        log::trace!(
            "Camera at distance {:.3}, pitch {:.3}, yaw {:.3}",
            camera.distance(),
            camera.pitch(),
            camera.yaw()
        );
        true
    }
}
