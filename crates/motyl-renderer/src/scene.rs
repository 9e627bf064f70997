//! Butterfly Scene
//!
//! Owns the scene's meshes, transform tables and animation, and issues one
//! frame's worth of device calls in a fixed order:
//!
//! 1. clear
//! 2. box, three lights
//! 3. the twelve mirrored worlds
//! 4. dodecahedron, one light, alpha blended
//! 5. Moebius strip and butterfly, three lights
//! 6. light billboards
//! 7. present

use glam::{Mat3, Mat4, Vec3, Vec4};
use motyl_animation::{ButterflyAnimator, ButterflyPose};
use motyl_core::{DODECAHEDRON_FACES, SceneConfig};
use motyl_geometry::{
    DodecahedronTables, Mesh, MoebiusStrip, build_billboard_quad, build_box, build_pentagon,
    build_wing,
};

use crate::device::{MeshHandle, RenderDevice, TransformSlot};
use crate::lighting::{FACE_COLORS, LightRig, WHITE};
use crate::mirror::{MirrorRecursionState, MirroredScene, MirroredWorldRenderer};
use crate::pipeline::{BlendState, CullMode, DepthStencilState, RasterizerState};
use crate::{RendererConfig, RendererResult, RendererStats};

/// Uploaded mesh and the number of indices to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuMesh {
    pub handle: MeshHandle,
    pub index_count: u32,
}

impl GpuMesh {
    fn upload<D: RenderDevice + ?Sized>(device: &mut D, mesh: &Mesh) -> RendererResult<Self> {
        Ok(Self {
            handle: device.upload_mesh(mesh)?,
            index_count: mesh.index_count(),
        })
    }
}

/// Every mesh the scene draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneMeshes {
    pub cube: GpuMesh,
    pub pentagon: GpuMesh,
    pub moebius: GpuMesh,
    pub wing: GpuMesh,
    pub billboard: GpuMesh,
}

/// Per-draw context shared by the direct and the mirrored passes
#[derive(Debug, Clone, Copy)]
struct DrawContext {
    /// Camera position as seen from the world being drawn
    camera: Vec3,
    rasterizer: RasterizerState,
}

/// Everything a pass draws, split from the mirror driver so both can be
/// borrowed at once
#[derive(Debug, Clone)]
struct SceneContent {
    meshes: SceneMeshes,
    tables: DodecahedronTables,
    pose: ButterflyPose,
    camera_position: Vec3,
    render_config: RendererConfig,
}

fn draw<D: RenderDevice + ?Sized>(device: &mut D, mesh: GpuMesh, world: Mat4) {
    device.set_transform(TransformSlot::World, world);
    device.bind_mesh(mesh.handle);
    device.draw_indexed(mesh.index_count);
}

impl SceneContent {
    fn draw_box<D: RenderDevice + ?Sized>(&self, device: &mut D) {
        device.set_surface_color(WHITE);
        draw(device, self.meshes.cube, Mat4::IDENTITY);
    }

    fn draw_face<D: RenderDevice + ?Sized>(&self, device: &mut D, face: usize, color: Vec4) {
        device.set_surface_color(color);
        draw(device, self.meshes.pentagon, self.tables.placement(face));
    }

    /// All faces, each in its own colour or plain white
    fn draw_dodecahedron<D: RenderDevice + ?Sized>(&self, device: &mut D, colors: bool) {
        for face in 0..DODECAHEDRON_FACES {
            let color = if colors { FACE_COLORS[face] } else { WHITE };
            self.draw_face(device, face, color);
        }
    }

    fn draw_moebius_strip<D: RenderDevice + ?Sized>(&self, device: &mut D, ctx: &DrawContext) {
        // A one-sided surface has no back to cull
        let two_sided = RasterizerState {
            cull_mode: CullMode::None,
            ..ctx.rasterizer
        };
        device.set_rasterizer_state(&two_sided);
        device.set_surface_color(self.render_config.strip_color);
        draw(device, self.meshes.moebius, Mat4::IDENTITY);
        device.set_rasterizer_state(&ctx.rasterizer);
    }

    fn draw_butterfly<D: RenderDevice + ?Sized>(&self, device: &mut D) {
        device.set_surface_color(self.render_config.butterfly_color);
        draw(device, self.meshes.wing, self.pose.left_wing);
        draw(device, self.meshes.wing, self.pose.right_wing);
    }

    /// Camera-facing quads at the coloured lights
    fn draw_billboards<D: RenderDevice + ?Sized>(&self, device: &mut D, view: Mat4, rig: &LightRig) {
        let facing = Mat3::from_mat4(view).transpose();
        let scale = Mat4::from_scale(Vec3::splat(self.render_config.billboard_size));

        device.set_blend_state(&BlendState::alpha());
        device.set_depth_stencil_state(
            &DepthStencilState {
                depth_write: false,
                ..Default::default()
            },
            0,
        );
        for light in rig.scene_lights() {
            device.set_surface_color(light.color);
            let world = Mat4::from_translation(light.position) * Mat4::from_mat3(facing) * scale;
            draw(device, self.meshes.billboard, world);
        }
        device.set_depth_stencil_state(&DepthStencilState::default(), 0);
        device.set_blend_state(&BlendState::default());
    }

    /// Everything but the clear, the mirrors and the billboards
    fn draw_world<D: RenderDevice + ?Sized>(&self, device: &mut D, ctx: &DrawContext) {
        device.set_lights(&LightRig::triple(ctx.camera));
        self.draw_box(device);

        device.set_blend_state(&BlendState::alpha());
        device.set_lights(&LightRig::single(ctx.camera));
        self.draw_dodecahedron(device, true);
        device.set_blend_state(&BlendState::default());

        device.set_lights(&LightRig::triple(ctx.camera));
        self.draw_moebius_strip(device, ctx);
        self.draw_butterfly(device);
    }
}

impl MirroredScene for SceneContent {
    fn draw_mirror_face<D: RenderDevice + ?Sized>(&self, device: &mut D, face: usize) {
        self.draw_face(device, face, WHITE);
    }

    fn draw_reflection<D: RenderDevice + ?Sized>(
        &self,
        device: &mut D,
        state: &MirrorRecursionState,
    ) {
        let ctx = DrawContext {
            camera: state.reflect_point(self.camera_position),
            rasterizer: state.rasterizer,
        };
        self.draw_world(device, &ctx);
    }
}

/// Device wrapper counting what passes through it
struct StatsRecorder<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
    stats: RendererStats,
}

impl<D: RenderDevice + ?Sized> RenderDevice for StatsRecorder<'_, D> {
    fn upload_mesh(&mut self, mesh: &Mesh) -> RendererResult<MeshHandle> {
        self.device.upload_mesh(mesh)
    }

    fn clear(&mut self, color: Vec4, depth: f32, stencil: u32) {
        self.device.clear(color, depth, stencil);
    }

    fn set_transform(&mut self, slot: TransformSlot, matrix: Mat4) {
        self.device.set_transform(slot, matrix);
    }

    fn set_view_transform(&mut self, view: Mat4) {
        self.device.set_view_transform(view);
    }

    fn set_depth_stencil_state(&mut self, state: &DepthStencilState, stencil_reference: u32) {
        self.stats.state_changes += 1;
        self.device.set_depth_stencil_state(state, stencil_reference);
    }

    fn set_blend_state(&mut self, state: &BlendState) {
        self.stats.state_changes += 1;
        self.device.set_blend_state(state);
    }

    fn set_rasterizer_state(&mut self, state: &RasterizerState) {
        self.stats.state_changes += 1;
        self.device.set_rasterizer_state(state);
    }

    fn set_lights(&mut self, rig: &LightRig) {
        self.device.set_lights(rig);
    }

    fn set_surface_color(&mut self, color: Vec4) {
        self.device.set_surface_color(color);
    }

    fn bind_mesh(&mut self, mesh: MeshHandle) {
        self.device.bind_mesh(mesh);
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.stats.draw_calls += 1;
        self.stats.triangles += index_count / 3;
        self.device.draw_indexed(index_count);
    }

    fn present(&mut self) {
        self.device.present();
    }
}

/// The complete scene. Only exists once every resource has been built and
/// uploaded, so drawing it can not fail.
#[derive(Debug, Clone)]
pub struct ButterflyScene {
    config: SceneConfig,
    content: SceneContent,
    animator: ButterflyAnimator,
    mirrors: MirroredWorldRenderer,
    view: Mat4,
    projection: Mat4,
    stats: RendererStats,
    frames: u64,
}

impl ButterflyScene {
    /// Build all geometry and upload it to `device`
    pub fn load<D: RenderDevice + ?Sized>(
        device: &mut D,
        config: &SceneConfig,
        render_config: RendererConfig,
    ) -> RendererResult<Self> {
        config.validate()?;

        let strip = MoebiusStrip::from_config(&config.moebius)?;
        let moebius = strip.build_mesh(config.moebius.segments, config.moebius.cross_sections)?;
        let wing = build_wing(config.butterfly.wing_width, config.butterfly.wing_height)?;

        let meshes = SceneMeshes {
            cube: GpuMesh::upload(device, &build_box())?,
            pentagon: GpuMesh::upload(device, &build_pentagon())?,
            moebius: GpuMesh::upload(device, &moebius)?,
            wing: GpuMesh::upload(device, &wing)?,
            billboard: GpuMesh::upload(device, &build_billboard_quad())?,
        };

        let animator = ButterflyAnimator::new(strip, &config.butterfly)?;
        let distance = config.camera.initial_distance;
        let camera = &config.camera;

        log::info!(
            "Scene loaded: strip {} triangles, {} mirror faces",
            moebius.triangle_count(),
            DODECAHEDRON_FACES
        );

        Ok(Self {
            config: *config,
            content: SceneContent {
                meshes,
                tables: DodecahedronTables::build(),
                pose: animator.pose(),
                camera_position: Vec3::new(0.0, 0.0, distance),
                render_config,
            },
            animator,
            mirrors: MirroredWorldRenderer::new(RasterizerState::default()),
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -distance)),
            projection: Mat4::perspective_rh(camera.fov_y, 1.0, camera.near, camera.far),
            stats: RendererStats::default(),
            frames: 0,
        })
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) -> &ButterflyPose {
        self.content.pose = self.animator.update(dt);
        &self.content.pose
    }

    /// Camera used for the next frame
    pub fn set_camera(&mut self, view: Mat4, position: Vec3) {
        self.view = view;
        self.content.camera_position = position;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Issue one frame
    pub fn render<D: RenderDevice + ?Sized>(&mut self, device: &mut D) {
        let mut device = StatsRecorder {
            device,
            stats: RendererStats::default(),
        };
        let content = &self.content;
        let camera = content.camera_position;
        let ctx = DrawContext {
            camera,
            rasterizer: RasterizerState::default(),
        };

        device.clear(content.render_config.clear_color, 1.0, 0);
        device.set_transform(TransformSlot::Projection, self.projection);
        device.set_view_transform(self.view);
        device.set_depth_stencil_state(&DepthStencilState::default(), 0);
        device.set_blend_state(&BlendState::default());
        device.set_rasterizer_state(&ctx.rasterizer);

        device.set_lights(&LightRig::triple(camera));
        content.draw_box(&mut device);

        if content.render_config.mirrors {
            let passes = self.mirrors.render(&mut device, content, &content.tables, self.view);
            device.stats.mirror_passes = passes;
        }

        device.set_blend_state(&BlendState::alpha());
        device.set_lights(&LightRig::single(camera));
        content.draw_dodecahedron(&mut device, true);
        device.set_blend_state(&BlendState::default());

        let rig = LightRig::triple(camera);
        device.set_lights(&rig);
        content.draw_moebius_strip(&mut device, &ctx);
        content.draw_butterfly(&mut device);
        content.draw_billboards(&mut device, self.view, &rig);

        device.present();

        self.stats = device.stats;
        self.frames += 1;
        log::trace!("Frame {}: {:?}", self.frames, self.stats);
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn pose(&self) -> &ButterflyPose {
        &self.content.pose
    }

    pub fn tables(&self) -> &DodecahedronTables {
        &self.content.tables
    }

    pub fn meshes(&self) -> &SceneMeshes {
        &self.content.meshes
    }

    pub fn animator(&self) -> &ButterflyAnimator {
        &self.animator
    }

    /// Statistics of the last rendered frame
    pub fn stats(&self) -> &RendererStats {
        &self.stats
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{RecordingDevice, RenderCommand};
    use crate::pipeline::{FrontFace, PipelineState};
    use crate::RendererError;
    use motyl_core::ConfigError;

    // Draws of one world: box, 12 faces, strip, 2 wings
    const WORLD_DRAWS: usize = 16;

    fn load() -> (RecordingDevice, ButterflyScene) {
        let mut device = RecordingDevice::new();
        let scene =
            ButterflyScene::load(&mut device, &SceneConfig::default(), RendererConfig::default())
                .unwrap();
        (device, scene)
    }

    fn draws(commands: &[RenderCommand]) -> Vec<(MeshHandle, u32)> {
        commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::DrawIndexed { mesh, index_count } => Some((*mesh, *index_count)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_load_uploads_meshes() {
        let (device, scene) = load();
        assert_eq!(device.mesh_count(), 5);
        let meshes = scene.meshes();
        assert_eq!(meshes.cube.index_count, 36);
        assert_eq!(meshes.pentagon.index_count, 9);
        assert_eq!(meshes.moebius.index_count, 128 * 6);
        assert_eq!(device.mesh(meshes.wing.handle).unwrap().name, "wing");
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_load_rejects_bad_config() {
        let mut config = SceneConfig::default();
        config.moebius.radius = 0.0;
        let error = ButterflyScene::load(&mut RecordingDevice::new(), &config, RendererConfig::default())
            .unwrap_err();
        assert!(matches!(error, RendererError::Config(ConfigError::NotPositive { .. })));
    }

    #[test]
    fn test_frame_order() {
        let (mut device, mut scene) = load();
        scene.render(&mut device);
        let commands = device.take_commands();
        let meshes = *scene.meshes();

        assert!(matches!(commands[0], RenderCommand::Clear { depth: 1.0, stencil: 0, .. }));
        assert_eq!(commands.last(), Some(&RenderCommand::Present));

        let draws = draws(&commands);
        // Each mirror adds a mask and a world; the billboards come last
        assert_eq!(draws.len(), 12 * (1 + WORLD_DRAWS) + WORLD_DRAWS + 2);

        // Box first, then the first mask
        assert_eq!(draws[0], (meshes.cube.handle, 36));
        assert_eq!(draws[1], (meshes.pentagon.handle, 9));
        // Direct pass after all mirrors: 12 faces, strip, wings, billboards
        let direct = &draws[draws.len() - 17..];
        assert!(direct[..12].iter().all(|d| d.0 == meshes.pentagon.handle));
        assert_eq!(direct[12].0, meshes.moebius.handle);
        assert_eq!(direct[13].0, meshes.wing.handle);
        assert_eq!(direct[14].0, meshes.wing.handle);
        assert_eq!(direct[15].0, meshes.billboard.handle);
        assert_eq!(direct[16].0, meshes.billboard.handle);

        assert_eq!(*device.state(), PipelineState::default());
        assert_eq!(device.frames_presented(), 1);
    }

    #[test]
    fn test_mirror_passes_use_reflected_view_and_winding() {
        let (mut device, mut scene) = load();
        scene.render(&mut device);
        let tables = scene.tables().clone();
        let base_view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));

        let mut state = PipelineState::default();
        let mut view = Mat4::IDENTITY;
        let mut masked_faces = Vec::new();
        for command in device.commands() {
            match command {
                RenderCommand::SetDepthStencilState { state: ds, stencil_reference } => {
                    state.depth_stencil = *ds;
                    state.stencil_reference = *stencil_reference;
                }
                RenderCommand::SetBlendState(blend) => state.blend = *blend,
                RenderCommand::SetRasterizerState(raster) => state.rasterizer = *raster,
                RenderCommand::SetViewTransform(v) => view = *v,
                RenderCommand::DrawIndexed { .. } if state.depth_stencil.writes_stencil() => {
                    masked_faces.push(state.stencil_reference);
                    assert!(state.blend.write_mask.is_empty());
                    assert!(!state.depth_stencil.depth_write);
                }
                RenderCommand::DrawIndexed { .. } if state.stencil_reference != 0 => {
                    let face = state.stencil_reference as usize - 1;
                    assert_eq!(view, base_view * tables.mirror(face));
                    assert_eq!(state.rasterizer.front_face, FrontFace::Clockwise);
                }
                RenderCommand::DrawIndexed { .. } => {
                    assert_eq!(view, base_view);
                    assert_eq!(state.rasterizer.front_face, FrontFace::CounterClockwise);
                }
                _ => {}
            }
        }
        assert_eq!(masked_faces, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_mask_draws_only_its_face() {
        let (mut device, mut scene) = load();
        scene.render(&mut device);
        let commands = device.commands();

        let start = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::SetDepthStencilState { stencil_reference: 5, .. }))
            .unwrap();
        assert_eq!(commands[start + 1], RenderCommand::SetBlendState(BlendState::no_color()));
        assert_eq!(commands[start + 2], RenderCommand::SetSurfaceColor(WHITE));
        assert_eq!(
            commands[start + 3],
            RenderCommand::SetTransform {
                slot: TransformSlot::World,
                matrix: scene.tables().placement(4),
            }
        );
    }

    #[test]
    fn test_mirrored_camera_light() {
        let (mut device, mut scene) = load();
        scene.render(&mut device);
        let reflected_camera = scene.tables().mirror(0).transform_point3(Vec3::new(0.0, 0.0, 5.0));

        let rigs: Vec<&LightRig> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetLights(rig) => Some(rig),
                _ => None,
            })
            .collect();
        // Box rig, then the first mirrored world's box rig
        assert_eq!(rigs[0].lights[0].position, Vec3::new(0.0, 0.0, 5.0));
        assert!((rigs[1].lights[0].position - reflected_camera).length() < 1e-5);
    }

    #[test]
    fn test_update_moves_wings() {
        let (mut device, mut scene) = load();
        let start = *scene.pose();
        let pose = *scene.update(2.5);
        assert_ne!(start.right_wing, pose.right_wing);

        scene.render(&mut device);
        let worlds: Vec<Mat4> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetTransform { slot: TransformSlot::World, matrix } => Some(*matrix),
                _ => None,
            })
            .collect();
        assert!(worlds.contains(&pose.left_wing));
        assert!(worlds.contains(&pose.right_wing));
    }

    #[test]
    fn test_without_mirrors() {
        let mut device = RecordingDevice::new();
        let config = RendererConfig {
            mirrors: false,
            ..Default::default()
        };
        let mut scene = ButterflyScene::load(&mut device, &SceneConfig::default(), config).unwrap();
        scene.render(&mut device);

        assert_eq!(draws(device.commands()).len(), WORLD_DRAWS + 2);
        assert!(!device.commands().iter().any(|c| matches!(
            c,
            RenderCommand::SetDepthStencilState { stencil_reference, .. } if *stencil_reference != 0
        )));
        assert_eq!(scene.stats().mirror_passes, 0);
    }

    #[test]
    fn test_stats() {
        let (mut device, mut scene) = load();
        scene.render(&mut device);
        let stats = *scene.stats();
        assert_eq!(stats.draw_calls as usize, draws(device.commands()).len());
        let state_changes = device.commands().iter().filter(|c| c.is_state_change()).count();
        assert_eq!(stats.state_changes as usize, state_changes);
        assert_eq!(stats.mirror_passes, 12);
        let per_world = 12 + 12 * 3 + 128 * 2 + 2 * 4;
        assert_eq!(stats.triangles, per_world * 13 + 12 * 3 + 2 * 2);
        assert_eq!(scene.frames_rendered(), 1);
    }

    #[test]
    fn test_billboards_face_camera() {
        let (mut device, mut scene) = load();
        let view = Mat4::look_at_rh(Vec3::new(3.0, 2.0, 4.0), Vec3::ZERO, Vec3::Y);
        scene.set_camera(view, Vec3::new(3.0, 2.0, 4.0));
        scene.render(&mut device);

        let billboard = scene.meshes().billboard.handle;
        let commands = device.commands();
        for (i, command) in commands.iter().enumerate() {
            if *command == RenderCommand::BindMesh(billboard) {
                let RenderCommand::SetTransform { matrix, .. } = commands[i - 1] else {
                    panic!("billboard drawn without a world transform");
                };
                // Quad normal +Z ends up pointing back at the viewer
                let normal = (view * matrix).transform_vector3(Vec3::Z).normalize();
                assert!((normal - Vec3::Z).length() < 1e-4);
            }
        }
    }
}
