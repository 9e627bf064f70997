//! Window Management
//!
//! Window configuration and the viewport the projection is derived from.

use glam::{Mat4, UVec2};
use motyl_core::CameraConfig;

use crate::{PlatformError, PlatformResult};

/// Initial client area size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl WindowConfig {
    /// Viewport matching the initial window size
    pub fn viewport(&self) -> PlatformResult<Viewport> {
        Viewport::new(self.width, self.height)
    }
}

/// Window events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Client area was resized
    Resized { width: u32, height: u32 },
    /// Window close was requested
    CloseRequested,
    /// Redraw was requested
    RedrawRequested,
}

impl WindowEvent {
    /// Map a `winit` window event, if the scene cares about it
    pub fn from_winit(event: &winit::event::WindowEvent) -> Option<Self> {
        match event {
            winit::event::WindowEvent::Resized(size) => Some(WindowEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            winit::event::WindowEvent::CloseRequested => Some(WindowEvent::CloseRequested),
            winit::event::WindowEvent::RedrawRequested => Some(WindowEvent::RedrawRequested),
            _ => None,
        }
    }
}

/// Client area size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> PlatformResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlatformError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Perspective projection for this viewport
    pub fn projection(&self, camera: &CameraConfig) -> Mat4 {
        Mat4::perspective_rh(camera.fov_y, self.aspect_ratio(), camera.near, camera.far)
    }

    /// Track a window event. Returns whether the size changed.
    ///
    /// A minimised window reports a zero size; the last real size is kept.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        let WindowEvent::Resized { width, height } = *event else {
            return false;
        };
        match Viewport::new(width, height) {
            Ok(resized) if resized != *self => {
                log::debug!("Viewport resized to {width}x{height}");
                *self = resized;
                true
            }
            Ok(_) => false,
            Err(_) => {
                log::debug!("Ignoring resize to {width}x{height}");
                false
            }
        }
    }
}
