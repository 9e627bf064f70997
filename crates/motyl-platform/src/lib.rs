//! # Motyl Platform
//!
//! Glue between the windowing layer and the scene.
//!
//! This crate provides:
//! - **Input**: Mouse button and pointer-drag tracking, mapped from `winit` events
//! - **Camera**: Orbit camera driven by mouse drags
//! - **Window**: Window configuration, viewport size and projection

pub mod camera;
pub mod input;
pub mod window;

pub use camera::{CameraController, OrbitCamera};
pub use input::{InputEvent, MouseButton, MouseButtons, MouseState};
pub use window::{Viewport, WindowConfig, WindowEvent};

use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Viewport must have a non-zero size, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },

    #[error("Camera distance range [{min}, {max}] is empty")]
    InvalidDistanceRange { min: f32, max: f32 },
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;
