//! Frame Timing
//!
//! Turns raw per-frame deltas into the step the animation advances by:
//! invalid deltas become zero, stalls are clamped and the result is scaled.

/// Seconds elapsed between two frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTime(pub f64);

impl DeltaTime {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Step in the precision the animation runs at
    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32
    }
}

/// Longest frame step fed to the animation, so a stalled window does not
/// teleport the butterfly.
pub const MAX_FRAME_STEP: f64 = 0.25;

/// Accumulates frame steps for the update loop
#[derive(Debug, Clone)]
pub struct FrameTimer {
    total_time: f64,
    frame_count: u64,
    /// 1.0 is real time, below is slow motion
    time_scale: f64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            total_time: 0.0,
            frame_count: 0,
            time_scale: 1.0,
        }
    }

    /// Timer running at `scale` times real time. Negative or non-finite
    /// scales freeze the animation.
    pub fn with_time_scale(scale: f64) -> Self {
        let time_scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            log::warn!("Time scale {scale} freezes the animation");
            0.0
        };
        Self {
            time_scale,
            ..Self::new()
        }
    }

    /// Advance by a raw wall-clock delta and return the step for this frame
    pub fn tick(&mut self, raw: DeltaTime) -> DeltaTime {
        self.frame_count += 1;

        let raw_secs = raw.as_secs();
        if !raw_secs.is_finite() || raw_secs < 0.0 {
            log::warn!("Ignoring invalid frame delta {raw_secs}");
            return DeltaTime(0.0);
        }

        let step = raw_secs.min(MAX_FRAME_STEP) * self.time_scale;
        self.total_time += step;
        DeltaTime(step)
    }

    /// Scaled time accumulated over all ticks
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer_accumulates() {
        let mut timer = FrameTimer::new();
        timer.tick(DeltaTime::from_secs(0.1));
        timer.tick(DeltaTime::from_secs(0.1));
        assert_eq!(timer.frame_count(), 2);
        assert!((timer.total_time() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut timer = FrameTimer::new();
        let dt = timer.tick(DeltaTime(3.0));
        assert_eq!(dt.as_secs(), MAX_FRAME_STEP);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.tick(DeltaTime(f64::NAN)).as_secs(), 0.0);
        assert_eq!(timer.tick(DeltaTime(-1.0)).as_secs(), 0.0);
        assert_eq!(timer.total_time(), 0.0);
        assert_eq!(timer.frame_count(), 2);
    }

    #[test]
    fn test_time_scale() {
        let mut slow = FrameTimer::with_time_scale(0.5);
        assert!((slow.tick(DeltaTime(0.016)).as_secs() - 0.008).abs() < 1e-9);

        // Scaling applies after the clamp
        let mut fast = FrameTimer::with_time_scale(2.0);
        assert_eq!(fast.tick(DeltaTime(1.0)).as_secs(), 2.0 * MAX_FRAME_STEP);

        let mut frozen = FrameTimer::with_time_scale(f64::NAN);
        assert_eq!(frozen.time_scale(), 0.0);
        assert_eq!(frozen.tick(DeltaTime(0.016)).as_secs(), 0.0);
    }
}
