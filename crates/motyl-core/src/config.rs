//! Scene Configuration
//!
//! All tunable parameters of the scene, with defaults matching the
//! reference constants. Loaded from JSON by the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: u32,
        value: u32,
    },

    #[error("strip grid of {segments} x {cross_sections} samples exceeds {max} vertices")]
    StripTooLarge {
        segments: u32,
        cross_sections: u32,
        max: u32,
    },

    #[error("camera near plane {near} must be closer than far plane {far}")]
    InvalidClipRange { near: f32, far: f32 },

    #[error("wing angle {0} must lie in (0, pi/2]")]
    InvalidWingAngle(f32),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest strip grid (`segments * cross_sections`) a mesh may be built from.
/// Keeps every vertex and index count of the strip within `u32`.
pub const MAX_STRIP_VERTICES: u32 = 1 << 22;

/// Moebius strip parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoebiusConfig {
    /// Radius of the centre line
    pub radius: f32,
    /// Width of the band
    pub width: f32,
    /// Samples along the loop parameter `t`
    pub segments: u32,
    /// Samples across the band parameter `s`
    pub cross_sections: u32,
}

impl Default for MoebiusConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width: 0.1,
            segments: 128,
            cross_sections: 2,
        }
    }
}

/// Butterfly animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButterflyConfig {
    /// Seconds per lap of the animation clock
    pub lap_time: f32,
    /// Wing extent along the body
    pub wing_width: f32,
    /// Wing extent away from the body
    pub wing_height: f32,
    /// Maximum wing angle from the vertical, in radians
    pub wing_max_angle: f32,
}

impl Default for ButterflyConfig {
    fn default() -> Self {
        Self {
            lap_time: 10.0,
            wing_width: 0.15,
            wing_height: 0.1,
            // 80 degrees
            wing_max_angle: 8.0 * std::f32::consts::FRAC_PI_2 / 9.0,
        }
    }
}

/// Orbit camera and projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near clip plane, also the minimum orbit distance
    pub near: f32,
    /// Far clip plane, also the maximum orbit distance
    pub far: f32,
    /// Orbit distance at startup
    pub initial_distance: f32,
    /// Radians of rotation per pixel of drag
    pub rotate_sensitivity: f32,
    /// Units of zoom per pixel of drag
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.01,
            far: 100.0,
            initial_distance: 5.0,
            rotate_sensitivity: 1.0 / 300.0,
            zoom_sensitivity: 1.0 / 10.0,
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub moebius: MoebiusConfig,
    pub butterfly: ButterflyConfig,
    pub camera: CameraConfig,
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn at_least(field: &'static str, min: u32, value: u32) -> ConfigResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { field, min, value })
    }
}

impl SceneConfig {
    /// Check every parameter, reporting the first invalid one
    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.moebius;
        positive("moebius.radius", m.radius)?;
        positive("moebius.width", m.width)?;
        at_least("moebius.segments", 3, m.segments)?;
        at_least("moebius.cross_sections", 2, m.cross_sections)?;
        if u64::from(m.segments) * u64::from(m.cross_sections) > u64::from(MAX_STRIP_VERTICES) {
            return Err(ConfigError::StripTooLarge {
                segments: m.segments,
                cross_sections: m.cross_sections,
                max: MAX_STRIP_VERTICES,
            });
        }

        let b = &self.butterfly;
        positive("butterfly.lap_time", b.lap_time)?;
        positive("butterfly.wing_width", b.wing_width)?;
        positive("butterfly.wing_height", b.wing_height)?;
        if !(b.wing_max_angle > 0.0 && b.wing_max_angle <= std::f32::consts::FRAC_PI_2) {
            return Err(ConfigError::InvalidWingAngle(b.wing_max_angle));
        }

        let c = &self.camera;
        positive("camera.fov_y", c.fov_y)?;
        positive("camera.near", c.near)?;
        positive("camera.far", c.far)?;
        positive("camera.initial_distance", c.initial_distance)?;
        positive("camera.rotate_sensitivity", c.rotate_sensitivity)?;
        positive("camera.zoom_sensitivity", c.zoom_sensitivity)?;
        if c.near >= c.far {
            return Err(ConfigError::InvalidClipRange {
                near: c.near,
                far: c.far,
            });
        }

        log::debug!("Scene configuration validated");
        Ok(())
    }
}
