//! Moebius Strip
//!
//! Parametric half-twisted band:
//!
//! ```text
//! position(t, s) = ((R + s cos(t/2)) cos t,
//!                   (R + s cos(t/2)) sin t,
//!                    s sin(t/2))
//! ```
//!
//! `t` runs around the loop, `s` across the band. Partial derivatives are
//! the exact analytic ones; normals are `normalize(dP/dt × dP/ds)`.

use std::f32::consts::TAU;

use glam::Vec3;
use motyl_core::{MAX_STRIP_VERTICES, MoebiusConfig};

use crate::mesh::{Mesh, Vertex};
use crate::{GeometryError, GeometryResult};

/// Local frame of the strip at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Point on the surface
    pub position: Vec3,
    /// Unit tangent along `t`
    pub tangent: Vec3,
    /// Unit surface normal
    pub normal: Vec3,
    /// Unit vector completing the right-handed frame, `tangent × normal`
    pub binormal: Vec3,
}

/// Moebius strip evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoebiusStrip {
    radius: f32,
    width: f32,
}

impl MoebiusStrip {
    /// Create a strip, rejecting degenerate or self-intersecting shapes
    pub fn new(radius: f32, width: f32) -> GeometryResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        // At |s| >= R the band passes through the axis
        if !(width.is_finite() && width > 0.0 && width < 2.0 * radius) {
            return Err(GeometryError::InvalidWidth { width, radius });
        }
        Ok(Self { radius, width })
    }

    /// Create a strip from configuration
    pub fn from_config(config: &MoebiusConfig) -> GeometryResult<Self> {
        Self::new(config.radius, config.width)
    }

    /// Radius of the centre line
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Width of the band
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Point on the strip
    pub fn position(&self, t: f32, s: f32) -> Vec3 {
        let (sin_h, cos_h) = (t * 0.5).sin_cos();
        let (sin_t, cos_t) = t.sin_cos();
        let rho = self.radius + s * cos_h;
        Vec3::new(rho * cos_t, rho * sin_t, s * sin_h)
    }

    /// Partial derivative of [`position`](Self::position) with respect to `t`
    pub fn d_dt(&self, t: f32, s: f32) -> Vec3 {
        let (sin_h, cos_h) = (t * 0.5).sin_cos();
        let (sin_t, cos_t) = t.sin_cos();
        let rho = self.radius + s * cos_h;
        let d_rho = -0.5 * s * sin_h;
        Vec3::new(
            d_rho * cos_t - rho * sin_t,
            d_rho * sin_t + rho * cos_t,
            0.5 * s * cos_h,
        )
    }

    /// Partial derivative of [`position`](Self::position) with respect to `s`
    pub fn d_ds(&self, t: f32, _s: f32) -> Vec3 {
        let (sin_h, cos_h) = (t * 0.5).sin_cos();
        let (sin_t, cos_t) = t.sin_cos();
        Vec3::new(cos_h * cos_t, cos_h * sin_t, sin_h)
    }

    /// Unit surface normal
    pub fn normal(&self, t: f32, s: f32) -> Vec3 {
        self.d_dt(t, s).cross(self.d_ds(t, s)).normalize()
    }

    /// Orthonormal frame at a point
    pub fn frame(&self, t: f32, s: f32) -> SurfaceFrame {
        let tangent = self.d_dt(t, s).normalize();
        let normal = self.normal(t, s);
        SurfaceFrame {
            position: self.position(t, s),
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Vertex index of grid sample `(i, j)` with `segments` columns along `t`
    /// and `cross_sections` rows along `s`.
    ///
    /// Column `segments` is the seam: after a full turn the band comes back
    /// upside down, so it is column 0 read in reverse `s` order.
    pub fn grid_index(segments: u32, cross_sections: u32, i: u32, j: u32) -> u32 {
        if i == segments {
            cross_sections - 1 - j
        } else {
            i * cross_sections + j
        }
    }

    /// Triangulated strip with `segments` samples around the loop and
    /// `cross_sections` samples across the band
    pub fn build_mesh(&self, segments: u32, cross_sections: u32) -> GeometryResult<Mesh> {
        if segments < 3 {
            return Err(GeometryError::InvalidResolution {
                min: 3,
                value: segments,
            });
        }
        if cross_sections < 2 {
            return Err(GeometryError::InvalidCrossSections(cross_sections));
        }

        let vertex_count = segments
            .checked_mul(cross_sections)
            .filter(|&count| count <= MAX_STRIP_VERTICES)
            .ok_or(GeometryError::ResolutionTooLarge {
                segments,
                cross_sections,
                max: MAX_STRIP_VERTICES,
            })?;

        let (n, k) = (segments, cross_sections);
        let half = self.width * 0.5;

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for i in 0..n {
            let t = TAU * i as f32 / n as f32;
            for j in 0..k {
                let s = -half + self.width * j as f32 / (k - 1) as f32;
                vertices.push(Vertex::new(self.position(t, s), self.normal(t, s)));
            }
        }

        let mut indices = Vec::with_capacity((n * (k - 1) * 6) as usize);
        for i in 0..n {
            for j in 0..k - 1 {
                let a = Self::grid_index(n, k, i, j);
                let b = Self::grid_index(n, k, i + 1, j);
                let c = Self::grid_index(n, k, i + 1, j + 1);
                let d = Self::grid_index(n, k, i, j + 1);
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Mesh::new("moebius", vertices, indices)
    }

    /// Build the strip mesh described by a configuration
    pub fn build_config_mesh(config: &MoebiusConfig) -> GeometryResult<Mesh> {
        Self::from_config(config)?.build_mesh(config.segments, config.cross_sections)
    }
}
