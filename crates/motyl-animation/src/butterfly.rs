//! Butterfly Flight
//!
//! The butterfly rides the centre line of the Moebius strip, two strip
//! turns per lap, flapping once per turn. The body frame is built from the
//! strip frame: local X points along the flight direction, local Y along
//! the surface normal and local Z across the band.

use glam::{Mat4, Vec3, Vec4};
use motyl_core::ButterflyConfig;
use motyl_geometry::{MoebiusStrip, SurfaceFrame};
use serde::Serialize;

use crate::clock::AnimationClock;
use crate::{AnimationError, AnimationResult};

/// Opening of both wings, measured from the folded (upright) position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WingPose {
    /// Current angle in radians, in `[0, max_angle]`
    pub angle: f32,
    /// Angle at full opening
    pub max_angle: f32,
}

impl WingPose {
    /// Triangular wave over the flap phase `f` in `[0, 2]`:
    /// rises from 0 to `max_angle` on `[0, 1]`, falls back on `[1, 2]`.
    pub fn from_phase(phase: f32, max_angle: f32) -> Self {
        let rising = phase * max_angle;
        let angle = if phase <= 1.0 {
            rising
        } else {
            2.0 * max_angle - rising
        };
        Self {
            angle: angle.clamp(0.0, max_angle),
            max_angle,
        }
    }

    /// Fraction of full opening
    pub fn openness(&self) -> f32 {
        self.angle / self.max_angle
    }
}

/// World transforms of the butterfly's parts at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButterflyPose {
    /// Body frame on the strip
    pub body: Mat4,
    /// Wing rotated towards -Z of the body frame
    pub left_wing: Mat4,
    /// Wing rotated towards +Z of the body frame
    pub right_wing: Mat4,
    pub wing: WingPose,
    /// Strip parameter of the body position
    pub t: f32,
    /// Lap time the pose was taken at
    pub lap: f32,
}

impl ButterflyPose {
    /// Position of the body on the strip
    pub fn position(&self) -> Vec3 {
        self.body.w_axis.truncate()
    }

    /// Flight direction
    pub fn forward(&self) -> Vec3 {
        self.body.x_axis.truncate()
    }

    /// Local up, the strip normal under the butterfly
    pub fn up(&self) -> Vec3 {
        self.body.y_axis.truncate()
    }
}

/// Body transform from a strip frame
pub fn body_transform(frame: &SurfaceFrame) -> Mat4 {
    Mat4::from_cols(
        frame.tangent.extend(0.0),
        frame.normal.extend(0.0),
        frame.binormal.extend(0.0),
        Vec4::from((frame.position, 1.0)),
    )
}

/// Drives the butterfly from the lap clock
#[derive(Debug, Clone)]
pub struct ButterflyAnimator {
    clock: AnimationClock,
    strip: MoebiusStrip,
    wing_height: f32,
    wing_max_angle: f32,
}

impl ButterflyAnimator {
    /// Create an animator at the start of a lap
    pub fn new(strip: MoebiusStrip, config: &ButterflyConfig) -> AnimationResult<Self> {
        let max = config.wing_max_angle;
        if !(max.is_finite() && max > 0.0 && max <= std::f32::consts::FRAC_PI_2) {
            return Err(AnimationError::InvalidWingAngle(max));
        }

        log::debug!(
            "Butterfly animator: lap {}s, wing max {:.3} rad",
            config.lap_time,
            max
        );

        Ok(Self {
            clock: AnimationClock::new(config.lap_time)?,
            strip,
            wing_height: config.wing_height,
            wing_max_angle: max,
        })
    }

    /// Advance the clock by `dt` and return the new pose
    pub fn update(&mut self, dt: f32) -> ButterflyPose {
        self.clock.advance(dt);
        self.pose()
    }

    /// Pose at the current clock time
    pub fn pose(&self) -> ButterflyPose {
        self.pose_for(&self.clock)
    }

    /// Pose at an arbitrary lap time, without touching the clock
    pub fn pose_at(&self, lap: f32) -> AnimationResult<ButterflyPose> {
        let clock = AnimationClock::with_lap(self.clock.lap_time(), lap)?;
        Ok(self.pose_for(&clock))
    }

    fn pose_for(&self, clock: &AnimationClock) -> ButterflyPose {
        let t = clock.strip_parameter();
        let wing = WingPose::from_phase(clock.phase(), self.wing_max_angle);

        let body = body_transform(&self.strip.frame(t, 0.0));
        // The wing mesh is centred on its hinge; lift it so the hinge lies on the body axis
        let hinge = Mat4::from_translation(Vec3::new(0.0, self.wing_height * 0.5, 0.0));

        ButterflyPose {
            body,
            left_wing: body * Mat4::from_rotation_x(-wing.angle) * hinge,
            right_wing: body * Mat4::from_rotation_x(wing.angle) * hinge,
            wing,
            t,
            lap: clock.lap(),
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn strip(&self) -> &MoebiusStrip {
        &self.strip
    }
}
