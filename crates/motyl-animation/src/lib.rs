//! # Motyl Animation
//!
//! Time-driven animation for the scene.
//!
//! ## Features
//! - Wrapping lap clock advanced once per frame
//! - Triangular-wave wing flap
//! - Butterfly flight along the Moebius strip with a surface-aligned frame

pub mod butterfly;
pub mod clock;

pub use butterfly::{ButterflyAnimator, ButterflyPose, WingPose};
pub use clock::AnimationClock;

use motyl_geometry::GeometryError;
use thiserror::Error;

/// Animation construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("lap time must be positive and finite, got {0}")]
    InvalidLapTime(f32),

    #[error("wing angle {0} must lie in (0, pi/2]")]
    InvalidWingAngle(f32),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Result type for animation construction
pub type AnimationResult<T> = Result<T, AnimationError>;
