//! Lap Clock
//!
//! A scalar lap time in `[0, lap_time)` that wraps continuously.

use std::f32::consts::TAU;

use crate::{AnimationError, AnimationResult};

/// Wrapping animation clock owned by the animator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    lap: f32,
    lap_time: f32,
}

impl AnimationClock {
    /// Create a clock at the start of a lap
    pub fn new(lap_time: f32) -> AnimationResult<Self> {
        Self::with_lap(lap_time, 0.0)
    }

    /// Create a clock at a given point of the lap (wrapped into range)
    pub fn with_lap(lap_time: f32, lap: f32) -> AnimationResult<Self> {
        if !(lap_time.is_finite() && lap_time > 0.0) {
            return Err(AnimationError::InvalidLapTime(lap_time));
        }
        let mut clock = Self { lap: 0.0, lap_time };
        clock.advance(lap);
        Ok(clock)
    }

    /// Advance by `dt` seconds, wrapping at the end of the lap
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite animation step {dt}");
            return;
        }
        let lap = (self.lap + dt).rem_euclid(self.lap_time);
        // rem_euclid may round up to the divisor for tiny negative inputs
        self.lap = if lap >= self.lap_time { 0.0 } else { lap };
    }

    /// Time since the current lap started
    pub fn lap(&self) -> f32 {
        self.lap
    }

    /// Length of a lap in seconds
    pub fn lap_time(&self) -> f32 {
        self.lap_time
    }

    /// Flap phase `f = 2 * lap / lap_time`, in `[0, 2)`
    pub fn phase(&self) -> f32 {
        2.0 * self.lap / self.lap_time
    }

    /// Strip parameter of the butterfly, `2π * phase`, in `[0, 4π)`.
    ///
    /// A full lap covers `t` twice over, which on a one-sided strip is what
    /// it takes to come back to the same side of the band.
    pub fn strip_parameter(&self) -> f32 {
        TAU * self.phase()
    }
}
