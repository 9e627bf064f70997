//! # Motyl Renderer
//!
//! Draw sequencing for the Motyl scene.
//!
//! ## Features
//! - Device interface with a command-recording implementation
//! - Depth/stencil, blend and rasterizer state descriptors mapped onto `wgpu`
//! - One- and three-light rigs
//! - Stencil-masked mirrored worlds behind each dodecahedron face
//! - Scene orchestration in a fixed per-frame order

pub mod device;
pub mod lighting;
pub mod mirror;
pub mod pipeline;
pub mod scene;

pub use device::{MeshHandle, RecordingDevice, RenderCommand, RenderDevice, TransformSlot};
pub use lighting::{FACE_COLORS, LightRig, PointLight};
pub use mirror::{MirrorPhase, MirrorRecursionState, MirroredScene, MirroredWorldRenderer};
pub use pipeline::{BlendState, DepthStencilState, PipelineState, RasterizerState};
pub use scene::ButterflyScene;

use glam::Vec4;
use motyl_animation::AnimationError;
use motyl_core::ConfigError;
use motyl_geometry::GeometryError;
use serde::Serialize;
use thiserror::Error;

/// Renderer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RendererError {
    #[error("Invalid scene configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene geometry could not be built: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Scene animation could not be set up: {0}")]
    Animation(#[from] AnimationError),

    #[error("Mesh handle {0} was never uploaded to this device")]
    UnknownMesh(u32),

    #[error("Device mesh table is full")]
    TooManyMeshes,
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub clear_color: Vec4,
    pub strip_color: Vec4,
    pub butterfly_color: Vec4,
    /// Edge length of the light billboards
    pub billboard_size: f32,
    /// Draw the mirrored worlds behind the dodecahedron faces
    pub mirrors: bool,
    pub color_format: wgpu::TextureFormat,
    /// Must carry a stencil aspect
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Vec4::ONE,
            strip_color: Vec4::new(0.9, 0.9, 0.9, 1.0),
            butterfly_color: Vec4::new(1.0, 0.55, 0.1, 1.0),
            billboard_size: 0.3,
            mirrors: true,
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_format: wgpu::TextureFormat::Depth24PlusStencil8,
        }
    }
}

impl RendererConfig {
    /// `wgpu` descriptors for a state in this configuration's formats
    pub fn wgpu_states(&self, state: &PipelineState) -> pipeline::WgpuPipelineStates {
        state.to_wgpu(self.color_format, self.depth_format)
    }
}

/// Renderer statistics for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RendererStats {
    /// Draw calls this frame
    pub draw_calls: u32,
    /// Triangles submitted
    pub triangles: u32,
    /// Depth/stencil, blend and rasterizer state changes
    pub state_changes: u32,
    /// Mirror passes issued
    pub mirror_passes: u32,
}

impl RendererStats {
    /// Add another frame's counts
    pub fn accumulate(&mut self, other: &RendererStats) {
        self.draw_calls += other.draw_calls;
        self.triangles += other.triangles;
        self.state_changes += other.state_changes;
        self.mirror_passes += other.mirror_passes;
    }
}
