//! # Motyl Core
//!
//! Shared foundation for the Motyl scene: a cube, a mirrored dodecahedron,
//! a Moebius strip and a butterfly flying along it.
//!
//! This crate provides:
//! - **Config**: Serializable scene parameters with the reference defaults
//! - **Math**: Planes and reflections on top of `glam`
//! - **Time**: Frame timing for the update loop

pub mod config;
pub mod math;
pub mod time;

pub use config::{
    ButterflyConfig, CameraConfig, ConfigError, ConfigResult, MAX_STRIP_VERTICES, MoebiusConfig,
    SceneConfig,
};
pub use math::{Plane, reflection_matrix};
pub use time::{DeltaTime, FrameTimer};

/// Circumradius-to-apothem ratio of a regular pentagon, `sqrt(3/8 + sqrt(5)/8)`.
///
/// Equal to `cos(36°)`: the distance from the centre of a unit pentagon to
/// the midpoint of one of its edges.
pub const DODECAHEDRON_R: f32 = 0.809_017;

/// Distance between two opposite faces of the dodecahedron built from
/// unit pentagons, `1 + 2 * DODECAHEDRON_R`.
pub const DODECAHEDRON_H: f32 = 2.618_034;

/// Dihedral angle of a regular dodecahedron, `acos(-sqrt(5)/5)`.
pub const DODECAHEDRON_A: f32 = 2.034_444;

/// Number of faces of a dodecahedron.
pub const DODECAHEDRON_FACES: usize = 12;
