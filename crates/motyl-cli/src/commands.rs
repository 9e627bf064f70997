//! Command implementations
//!
//! Each command builds a serializable report; `execute` prints it as text
//! or JSON.

use std::fmt;

use anyhow::Result;
use glam::{Vec2, Vec3};
use motyl_animation::{ButterflyAnimator, ButterflyPose};
use motyl_core::{DODECAHEDRON_FACES, DODECAHEDRON_H, DeltaTime, FrameTimer, SceneConfig};
use motyl_geometry::{DodecahedronTables, MoebiusStrip};
use motyl_platform::{
    CameraController, InputEvent, MouseButton, MouseState, OrbitCamera, WindowConfig,
};
use motyl_renderer::{ButterflyScene, RecordingDevice, RendererConfig, RendererStats};
use serde::Serialize;

/// Constant mouse drag applied on every frame of a headless run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub delta: Vec2,
    pub button: MouseButton,
}

impl Drag {
    pub fn left(dx: f32, dy: f32) -> Self {
        Self {
            delta: Vec2::new(dx, dy),
            button: MouseButton::Left,
        }
    }

    pub fn with_right_button(self) -> Self {
        Self {
            button: MouseButton::Right,
            ..self
        }
    }
}

/// Parse `DX,DY`
pub fn parse_drag(value: &str) -> Result<Drag, String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{value}'"))?;
    Ok(Drag::left(parse_finite(dx)?, parse_finite(dy)?))
}

/// Parse a finite number of seconds
pub fn parse_finite(value: &str) -> Result<f32, String> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{value}' is not a finite number"))
}

/// Butterfly pose summary
#[derive(Debug, Clone, Serialize)]
pub struct PoseReport {
    pub lap: f32,
    pub t: f32,
    pub wing_angle: f32,
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl From<&ButterflyPose> for PoseReport {
    fn from(pose: &ButterflyPose) -> Self {
        Self {
            lap: pose.lap,
            t: pose.t,
            wing_angle: pose.wing.angle,
            position: pose.position(),
            forward: pose.forward(),
            up: pose.up(),
        }
    }
}

impl fmt::Display for PoseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lap:        {:.3}s (t = {:.4})", self.lap, self.t)?;
        writeln!(f, "wing angle: {:.4} rad", self.wing_angle)?;
        writeln!(f, "position:   {:.4}", self.position)?;
        writeln!(f, "forward:    {:.4}", self.forward)?;
        writeln!(f, "up:         {:.4}", self.up)
    }
}

/// Orbit camera summary
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraReport {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub position: Vec3,
}

impl From<&OrbitCamera> for CameraReport {
    fn from(camera: &OrbitCamera) -> Self {
        Self {
            distance: camera.distance(),
            pitch: camera.pitch(),
            yaw: camera.yaw(),
            position: camera.position(),
        }
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frames: u64,
    pub time_scale: f64,
    pub simulated_seconds: f64,
    /// Counts of the last frame
    pub last_frame: RendererStats,
    /// Counts summed over all frames
    pub total: RendererStats,
    pub pose: PoseReport,
    pub camera: CameraReport,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:        {}", self.frames)?;
        writeln!(f, "simulated:     {:.3}s (x{})", self.simulated_seconds, self.time_scale)?;
        writeln!(
            f,
            "per frame:     {} draws, {} triangles, {} state changes, {} mirror passes",
            self.last_frame.draw_calls,
            self.last_frame.triangles,
            self.last_frame.state_changes,
            self.last_frame.mirror_passes
        )?;
        writeln!(
            f,
            "total:         {} draws, {} triangles",
            self.total.draw_calls, self.total.triangles
        )?;
        writeln!(
            f,
            "camera:        distance {:.3}, pitch {:.3}, yaw {:.3}",
            self.camera.distance, self.camera.pitch, self.camera.yaw
        )?;
        write!(f, "{}", self.pose)
    }
}

/// Drive the scene against a recording device for `frames` frames of `dt`
/// seconds, with the animation running at `time_scale`
pub fn run_frames(
    config: &SceneConfig,
    frames: u32,
    dt: f64,
    time_scale: f64,
    drag: Option<Drag>,
) -> Result<RunReport> {
    let mut device = RecordingDevice::new();
    let mut scene = ButterflyScene::load(&mut device, config, RendererConfig::default())?;
    scene.set_projection(WindowConfig::default().viewport()?.projection(&config.camera));

    let mut camera = OrbitCamera::from_config(&config.camera)?;
    let controller = CameraController::from_config(&config.camera);
    let mut mouse = MouseState::new();
    if let Some(drag) = drag {
        mouse.handle_event(&InputEvent::MousePressed(drag.button));
    }

    let mut timer = FrameTimer::with_time_scale(time_scale);
    let mut total = RendererStats::default();

    for _ in 0..frames {
        let step = timer.tick(DeltaTime::from_secs(dt));

        if let Some(drag) = drag {
            mouse.push_delta(drag.delta);
        }
        controller.apply(&mut camera, &mouse);
        mouse.end_frame();

        scene.update(step.as_secs_f32());
        scene.set_camera(camera.view_matrix(), camera.position());
        scene.render(&mut device);

        let commands = device.take_commands();
        total.accumulate(scene.stats());
        log::trace!("Frame {}: {} commands", timer.frame_count(), commands.len());
    }

    Ok(RunReport {
        frames: timer.frame_count(),
        time_scale: timer.time_scale(),
        simulated_seconds: timer.total_time(),
        last_frame: *scene.stats(),
        total,
        pose: PoseReport::from(scene.pose()),
        camera: CameraReport::from(&camera),
    })
}

/// One mirror face
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FaceReport {
    pub face: usize,
    pub stencil_reference: u32,
    pub normal: Vec3,
    pub center: Vec3,
}

/// Mirror face table of the dodecahedron
#[derive(Debug, Clone, Serialize)]
pub struct DodecahedronReport {
    pub face_distance: f32,
    pub faces: Vec<FaceReport>,
}

impl fmt::Display for DodecahedronReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "face distance: {:.6}", self.face_distance)?;
        for face in &self.faces {
            writeln!(
                f,
                "face {:2} (stencil {:2}): normal {:.4}, center {:.4}",
                face.face, face.stencil_reference, face.normal, face.center
            )?;
        }
        Ok(())
    }
}

pub fn dodecahedron_report() -> DodecahedronReport {
    let tables = DodecahedronTables::build();
    let faces = (0..DODECAHEDRON_FACES)
        .map(|face| FaceReport {
            face,
            stencil_reference: face as u32 + 1,
            normal: tables.face_normal(face),
            center: tables.face_center(face),
        })
        .collect();

    DodecahedronReport {
        face_distance: DODECAHEDRON_H,
        faces,
    }
}

/// Moebius strip mesh statistics
#[derive(Debug, Clone, Serialize)]
pub struct MoebiusReport {
    pub radius: f32,
    pub width: f32,
    pub segments: u32,
    pub cross_sections: u32,
    pub vertices: usize,
    pub triangles: usize,
    /// Triangles stitching the last segment to the flipped first one
    pub seam_triangles: u32,
}

impl fmt::Display for MoebiusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "radius {}, width {}", self.radius, self.width)?;
        writeln!(f, "grid:      {} x {}", self.segments, self.cross_sections)?;
        writeln!(f, "vertices:  {}", self.vertices)?;
        writeln!(f, "triangles: {} ({} on the seam)", self.triangles, self.seam_triangles)
    }
}

pub fn moebius_report(config: &SceneConfig) -> Result<MoebiusReport> {
    let moebius = &config.moebius;
    let mesh = MoebiusStrip::build_config_mesh(moebius)?;

    Ok(MoebiusReport {
        radius: moebius.radius,
        width: moebius.width,
        segments: moebius.segments,
        cross_sections: moebius.cross_sections,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        seam_triangles: (moebius.cross_sections - 1) * 2,
    })
}

/// Pose at `time` seconds; times past a lap wrap around
pub fn pose_report(config: &SceneConfig, time: f32) -> Result<PoseReport> {
    let strip = MoebiusStrip::from_config(&config.moebius)?;
    let animator = ButterflyAnimator::new(strip, &config.butterfly)?;
    let pose = animator.pose_at(time)?;
    Ok(PoseReport::from(&pose))
}
