//! # Motyl Geometry
//!
//! Load-time geometry for the scene. Everything here is a pure function of
//! its parameters; uploading the results to the GPU happens in the renderer.
//!
//! - **Mesh**: Position/normal vertices with triangle index lists
//! - **Shapes**: Pentagon template, cube, butterfly wing, billboard quad
//! - **Dodecahedron**: Face placements and mirror reflections for all 12 faces
//! - **Moebius**: Parametric strip, analytic partial derivatives, strip mesh

pub mod dodecahedron;
pub mod mesh;
pub mod moebius;
pub mod shapes;

pub use dodecahedron::{DodecahedronTables, RigidTransform, build_dodecahedron_transforms};
pub use mesh::{Mesh, Vertex};
pub use moebius::{MoebiusStrip, SurfaceFrame};
pub use shapes::{build_billboard_quad, build_box, build_pentagon, build_wing};

use thiserror::Error;

/// Construction errors for malformed geometry parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("strip width must be positive and below twice the radius, got {width} for radius {radius}")]
    InvalidWidth { width: f32, radius: f32 },

    #[error("resolution must be at least {min}, got {value}")]
    InvalidResolution { min: u32, value: u32 },

    #[error("at least 2 cross-section samples are required, got {0}")]
    InvalidCrossSections(u32),

    #[error("strip grid of {segments} x {cross_sections} samples exceeds {max} vertices")]
    ResolutionTooLarge {
        segments: u32,
        cross_sections: u32,
        max: u32,
    },

    #[error("wing size must be positive and finite, got {width} x {height}")]
    InvalidWingSize { width: f32, height: f32 },

    #[error("index {index} out of range for mesh '{mesh}' with {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh '{mesh}' has {count} indices, not a multiple of 3")]
    IncompleteTriangle { mesh: String, count: usize },
}

/// Result type for geometry construction
pub type GeometryResult<T> = Result<T, GeometryError>;
