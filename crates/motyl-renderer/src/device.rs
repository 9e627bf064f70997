//! Render Device
//!
//! The interface the scene submits work through, and a device that records
//! the submitted commands instead of executing them. The recording device
//! backs headless runs and lets tests assert on exact draw sequences.

use glam::{Mat4, Vec4};
use motyl_geometry::Mesh;

use crate::lighting::LightRig;
use crate::pipeline::{BlendState, DepthStencilState, PipelineState, RasterizerState};
use crate::{RendererError, RendererResult};

/// Opaque handle to an uploaded mesh.
///
/// Handles are minted by [`RenderDevice::upload_mesh`]; a device never sees
/// a handle it did not issue unless one is smuggled across devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    /// Wrap a device-specific id. For device implementations.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Matrix slots of the shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformSlot {
    World,
    Projection,
}

/// Rendering device. Calls are executed in submission order.
pub trait RenderDevice {
    /// Upload a mesh once at load time
    fn upload_mesh(&mut self, mesh: &Mesh) -> RendererResult<MeshHandle>;

    /// Clear color, depth and stencil
    fn clear(&mut self, color: Vec4, depth: f32, stencil: u32);

    fn set_transform(&mut self, slot: TransformSlot, matrix: Mat4);

    fn set_view_transform(&mut self, view: Mat4);

    fn set_depth_stencil_state(&mut self, state: &DepthStencilState, stencil_reference: u32);

    fn set_blend_state(&mut self, state: &BlendState);

    fn set_rasterizer_state(&mut self, state: &RasterizerState);

    fn set_lights(&mut self, rig: &LightRig);

    fn set_surface_color(&mut self, color: Vec4);

    fn bind_mesh(&mut self, mesh: MeshHandle);

    /// Draw `index_count` indices of the bound mesh
    fn draw_indexed(&mut self, index_count: u32);

    /// Finish the frame
    fn present(&mut self);
}

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear { color: Vec4, depth: f32, stencil: u32 },
    SetTransform { slot: TransformSlot, matrix: Mat4 },
    SetViewTransform(Mat4),
    SetDepthStencilState { state: DepthStencilState, stencil_reference: u32 },
    SetBlendState(BlendState),
    SetRasterizerState(RasterizerState),
    SetLights(LightRig),
    SetSurfaceColor(Vec4),
    BindMesh(MeshHandle),
    DrawIndexed { mesh: MeshHandle, index_count: u32 },
    Present,
}

impl RenderCommand {
    /// Whether this command changes fixed-function state
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            RenderCommand::SetDepthStencilState { .. }
                | RenderCommand::SetBlendState(_)
                | RenderCommand::SetRasterizerState(_)
        )
    }
}

/// Mesh known to a [`RecordingDevice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMesh {
    pub name: String,
    pub vertex_count: usize,
    pub index_count: u32,
}

/// Device that records commands and tracks the resulting state
#[derive(Debug, Default)]
pub struct RecordingDevice {
    meshes: Vec<UploadedMesh>,
    commands: Vec<RenderCommand>,
    state: PipelineState,
    bound: Option<MeshHandle>,
    frames: u64,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since creation or the last `take_commands`
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Uploaded mesh behind a handle
    pub fn mesh(&self, handle: MeshHandle) -> Option<&UploadedMesh> {
        self.meshes.get(handle.raw() as usize)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Current fixed-function state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    fn uploaded(&self, handle: MeshHandle) -> &UploadedMesh {
        match self.mesh(handle) {
            Some(mesh) => mesh,
            None => {
                log::error!("Mesh handle {} was never uploaded to this device", handle.raw());
                panic!("{}", RendererError::UnknownMesh(handle.raw()));
            }
        }
    }
}

impl RenderDevice for RecordingDevice {
    fn upload_mesh(&mut self, mesh: &Mesh) -> RendererResult<MeshHandle> {
        let id = u32::try_from(self.meshes.len()).map_err(|_| RendererError::TooManyMeshes)?;
        self.meshes.push(UploadedMesh {
            name: mesh.name().to_owned(),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
        });
        log::debug!(
            "Uploaded mesh '{}' as #{id}: {} vertices, {} indices",
            mesh.name(),
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(MeshHandle::from_raw(id))
    }

    fn clear(&mut self, color: Vec4, depth: f32, stencil: u32) {
        self.commands.push(RenderCommand::Clear {
            color,
            depth,
            stencil,
        });
    }

    fn set_transform(&mut self, slot: TransformSlot, matrix: Mat4) {
        self.commands.push(RenderCommand::SetTransform { slot, matrix });
    }

    fn set_view_transform(&mut self, view: Mat4) {
        self.commands.push(RenderCommand::SetViewTransform(view));
    }

    fn set_depth_stencil_state(&mut self, state: &DepthStencilState, stencil_reference: u32) {
        self.state.depth_stencil = *state;
        self.state.stencil_reference = stencil_reference;
        self.commands.push(RenderCommand::SetDepthStencilState {
            state: *state,
            stencil_reference,
        });
    }

    fn set_blend_state(&mut self, state: &BlendState) {
        self.state.blend = *state;
        self.commands.push(RenderCommand::SetBlendState(*state));
    }

    fn set_rasterizer_state(&mut self, state: &RasterizerState) {
        self.state.rasterizer = *state;
        self.commands.push(RenderCommand::SetRasterizerState(*state));
    }

    fn set_lights(&mut self, rig: &LightRig) {
        self.commands.push(RenderCommand::SetLights(rig.clone()));
    }

    fn set_surface_color(&mut self, color: Vec4) {
        self.commands.push(RenderCommand::SetSurfaceColor(color));
    }

    fn bind_mesh(&mut self, mesh: MeshHandle) {
        self.uploaded(mesh);
        self.bound = Some(mesh);
        self.commands.push(RenderCommand::BindMesh(mesh));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        let Some(mesh) = self.bound else {
            panic!("draw_indexed called with no mesh bound");
        };
        let available = self.uploaded(mesh).index_count;
        assert!(
            index_count <= available,
            "drawing {index_count} indices from a mesh with {available}"
        );
        self.commands.push(RenderCommand::DrawIndexed { mesh, index_count });
    }

    fn present(&mut self) {
        self.frames += 1;
        self.commands.push(RenderCommand::Present);
    }
}
