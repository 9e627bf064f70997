//! Mirrored Worlds
//!
//! Every dodecahedron face is a mirror one reflection deep. Per face:
//!
//! 1. **MaskFace**: draw the face into the stencil buffer only, tagging its
//!    visible pixels with the face's reference value.
//! 2. **MirroredDraw**: draw the scene again through the reflected view,
//!    limited to the tagged pixels, with the triangle winding reversed.
//! 3. **Idle**: restore the default state and the base view.
//!
//! A face turned away from the camera is culled in step 1, leaves no
//! tagged pixels, and so hides its whole mirrored draw.

use glam::{Mat4, Vec3};
use motyl_core::DODECAHEDRON_FACES;
use motyl_geometry::DodecahedronTables;

use crate::device::RenderDevice;
use crate::pipeline::{BlendState, DepthStencilState, RasterizerState};

/// Where the renderer is within one face's pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorPhase {
    #[default]
    Idle,
    MaskFace,
    MirroredDraw,
}

impl MirrorPhase {
    /// The only phase reachable from this one
    pub fn next(self) -> Self {
        match self {
            MirrorPhase::Idle => MirrorPhase::MaskFace,
            MirrorPhase::MaskFace => MirrorPhase::MirroredDraw,
            MirrorPhase::MirroredDraw => MirrorPhase::Idle,
        }
    }
}

/// Render context of one face's mirrored world, alive for that pass only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorRecursionState {
    pub face: usize,
    /// Reflection across the face plane
    pub mirror: Mat4,
    /// `base_view * mirror`
    pub view: Mat4,
    pub stencil_reference: u32,
    /// Rasterizer state to draw the reflected world with
    pub rasterizer: RasterizerState,
}

impl MirrorRecursionState {
    pub fn new(face: usize, tables: &DodecahedronTables, base_view: Mat4, base: RasterizerState) -> Self {
        let mirror = tables.mirror(face);
        Self {
            face,
            mirror,
            view: base_view * mirror,
            // Stencil is cleared to zero, so face ids start at one
            stencil_reference: face as u32 + 1,
            rasterizer: base.mirrored(),
        }
    }

    /// Where a world-space point (like the camera) sits in the reflected world
    pub fn reflect_point(&self, point: Vec3) -> Vec3 {
        self.mirror.transform_point3(point)
    }
}

/// Content drawn by the mirror passes
pub trait MirroredScene {
    /// Draw the geometry of one mirror face with the currently bound state
    fn draw_mirror_face<D: RenderDevice + ?Sized>(&self, device: &mut D, face: usize);

    /// Draw the reflected world. Must not change depth/stencil state.
    fn draw_reflection<D: RenderDevice + ?Sized>(
        &self,
        device: &mut D,
        state: &MirrorRecursionState,
    );
}

/// Drives the mask/draw/restore cycle over all faces
#[derive(Debug, Clone, Default)]
pub struct MirroredWorldRenderer {
    phase: MirrorPhase,
    base_rasterizer: RasterizerState,
}

impl MirroredWorldRenderer {
    pub fn new(base_rasterizer: RasterizerState) -> Self {
        Self {
            phase: MirrorPhase::Idle,
            base_rasterizer,
        }
    }

    pub fn phase(&self) -> MirrorPhase {
        self.phase
    }

    fn enter(&mut self, phase: MirrorPhase) {
        debug_assert_eq!(self.phase.next(), phase, "invalid mirror pass transition");
        self.phase = phase;
    }

    /// Render all mirrored worlds. Returns the number of face passes issued.
    pub fn render<D, S>(
        &mut self,
        device: &mut D,
        scene: &S,
        tables: &DodecahedronTables,
        base_view: Mat4,
    ) -> u32
    where
        D: RenderDevice + ?Sized,
        S: MirroredScene,
    {
        for face in 0..DODECAHEDRON_FACES {
            self.render_face(device, scene, tables, base_view, face);
        }
        DODECAHEDRON_FACES as u32
    }

    /// Render the mirrored world behind one face
    pub fn render_face<D, S>(
        &mut self,
        device: &mut D,
        scene: &S,
        tables: &DodecahedronTables,
        base_view: Mat4,
        face: usize,
    ) where
        D: RenderDevice + ?Sized,
        S: MirroredScene,
    {
        let state = MirrorRecursionState::new(face, tables, base_view, self.base_rasterizer);
        log::trace!("Mirror pass for face {face}, stencil {}", state.stencil_reference);

        self.enter(MirrorPhase::MaskFace);
        device.set_depth_stencil_state(&DepthStencilState::stencil_write(), state.stencil_reference);
        device.set_blend_state(&BlendState::no_color());
        scene.draw_mirror_face(device, face);

        self.enter(MirrorPhase::MirroredDraw);
        device.set_depth_stencil_state(&DepthStencilState::stencil_test(), state.stencil_reference);
        device.set_blend_state(&BlendState::default());
        device.set_rasterizer_state(&state.rasterizer);
        device.set_view_transform(state.view);
        scene.draw_reflection(device, &state);

        self.enter(MirrorPhase::Idle);
        device.set_depth_stencil_state(&DepthStencilState::default(), 0);
        device.set_blend_state(&BlendState::default());
        device.set_rasterizer_state(&self.base_rasterizer);
        device.set_view_transform(base_view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{RecordingDevice, RenderCommand};
    use crate::pipeline::{FrontFace, PipelineState};

    /// Scene whose draws are single marker commands
    struct Markers;

    impl MirroredScene for Markers {
        fn draw_mirror_face<D: RenderDevice + ?Sized>(&self, device: &mut D, face: usize) {
            device.set_surface_color(glam::Vec4::splat(face as f32));
        }

        fn draw_reflection<D: RenderDevice + ?Sized>(
            &self,
            device: &mut D,
            state: &MirrorRecursionState,
        ) {
            device.set_surface_color(glam::Vec4::splat(-(state.face as f32)));
        }
    }

    #[test]
    fn test_phase_cycle() {
        let phase = MirrorPhase::Idle;
        assert_eq!(phase.next(), MirrorPhase::MaskFace);
        assert_eq!(phase.next().next(), MirrorPhase::MirroredDraw);
        assert_eq!(phase.next().next().next(), MirrorPhase::Idle);
    }

    #[test]
    fn test_recursion_state() {
        let tables = DodecahedronTables::build();
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let state = MirrorRecursionState::new(4, &tables, view, RasterizerState::default());

        assert_eq!(state.stencil_reference, 5);
        assert_eq!(state.view, view * tables.mirror(4));
        assert_eq!(state.rasterizer.front_face, FrontFace::Clockwise);
        let center = tables.face_center(4);
        assert!((state.reflect_point(center) - center).length() < 1e-4);
    }

    #[test]
    fn test_single_face_sequence() {
        let tables = DodecahedronTables::build();
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let mut device = RecordingDevice::new();
        let mut renderer = MirroredWorldRenderer::default();

        renderer.render_face(&mut device, &Markers, &tables, view, 2);
        assert_eq!(renderer.phase(), MirrorPhase::Idle);

        let expected = vec![
            RenderCommand::SetDepthStencilState {
                state: DepthStencilState::stencil_write(),
                stencil_reference: 3,
            },
            RenderCommand::SetBlendState(BlendState::no_color()),
            RenderCommand::SetSurfaceColor(glam::Vec4::splat(2.0)),
            RenderCommand::SetDepthStencilState {
                state: DepthStencilState::stencil_test(),
                stencil_reference: 3,
            },
            RenderCommand::SetBlendState(BlendState::default()),
            RenderCommand::SetRasterizerState(RasterizerState::default().mirrored()),
            RenderCommand::SetViewTransform(view * tables.mirror(2)),
            RenderCommand::SetSurfaceColor(glam::Vec4::splat(-2.0)),
            RenderCommand::SetDepthStencilState {
                state: DepthStencilState::default(),
                stencil_reference: 0,
            },
            RenderCommand::SetBlendState(BlendState::default()),
            RenderCommand::SetRasterizerState(RasterizerState::default()),
            RenderCommand::SetViewTransform(view),
        ];
        assert_eq!(device.commands(), expected.as_slice());
        assert_eq!(*device.state(), PipelineState::default());
    }

    #[test]
    fn test_all_faces_in_order() {
        let tables = DodecahedronTables::build();
        let mut device = RecordingDevice::new();
        let passes = MirroredWorldRenderer::default().render(&mut device, &Markers, &tables, Mat4::IDENTITY);
        assert_eq!(passes, 12);

        let masks: Vec<u32> = device
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::SetDepthStencilState { state, stencil_reference }
                    if state.writes_stencil() =>
                {
                    Some(*stencil_reference)
                }
                _ => None,
            })
            .collect();
        assert_eq!(masks, (1..=12).collect::<Vec<_>>());
    }
}
