//! Render Pipeline
//!
//! Fixed-function state descriptors submitted between draws, and their
//! `wgpu` equivalents.

use bitflags::bitflags;

/// Complete fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineState {
    pub depth_stencil: DepthStencilState,
    /// Stencil reference value compared/written by the stencil ops
    pub stencil_reference: u32,
    pub blend: BlendState,
    pub rasterizer: RasterizerState,
}

impl PipelineState {
    /// `wgpu` descriptors for a pipeline rendering into the given formats
    pub fn to_wgpu(
        &self,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> WgpuPipelineStates {
        WgpuPipelineStates {
            primitive: self.rasterizer.to_wgpu(),
            depth_stencil: self.depth_stencil.to_wgpu(depth_format),
            color_target: self.blend.to_wgpu(color_format),
        }
    }
}

/// Pieces of a `wgpu::RenderPipelineDescriptor` that depend on [`PipelineState`]
#[derive(Debug, Clone)]
pub struct WgpuPipelineStates {
    pub primitive: wgpu::PrimitiveState,
    pub depth_stencil: wgpu::DepthStencilState,
    pub color_target: wgpu::ColorTargetState,
}

/// Compare function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareFunction {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl CompareFunction {
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

/// Operation applied to the stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StencilOperation {
    #[default]
    Keep,
    Zero,
    Replace,
    Invert,
    IncrementClamp,
    DecrementClamp,
}

impl StencilOperation {
    pub fn to_wgpu(self) -> wgpu::StencilOperation {
        match self {
            StencilOperation::Keep => wgpu::StencilOperation::Keep,
            StencilOperation::Zero => wgpu::StencilOperation::Zero,
            StencilOperation::Replace => wgpu::StencilOperation::Replace,
            StencilOperation::Invert => wgpu::StencilOperation::Invert,
            StencilOperation::IncrementClamp => wgpu::StencilOperation::IncrementClamp,
            StencilOperation::DecrementClamp => wgpu::StencilOperation::DecrementClamp,
        }
    }
}

/// Stencil test and update for one triangle facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilFaceState {
    pub compare: CompareFunction,
    pub fail_op: StencilOperation,
    pub depth_fail_op: StencilOperation,
    pub pass_op: StencilOperation,
}

impl StencilFaceState {
    /// Passes everything, changes nothing
    pub const IGNORE: Self = Self {
        compare: CompareFunction::Always,
        fail_op: StencilOperation::Keep,
        depth_fail_op: StencilOperation::Keep,
        pass_op: StencilOperation::Keep,
    };

    fn to_wgpu(self) -> wgpu::StencilFaceState {
        wgpu::StencilFaceState {
            compare: self.compare.to_wgpu(),
            fail_op: self.fail_op.to_wgpu(),
            depth_fail_op: self.depth_fail_op.to_wgpu(),
            pass_op: self.pass_op.to_wgpu(),
        }
    }
}

/// Depth and stencil state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_compare: CompareFunction,
    /// Same state for front and back faces
    pub stencil: StencilFaceState,
    pub stencil_read_mask: u32,
    pub stencil_write_mask: u32,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilFaceState::IGNORE,
            stencil_read_mask: 0xff,
            stencil_write_mask: 0xff,
        }
    }
}

impl DepthStencilState {
    /// Tag visible pixels with the stencil reference, leaving depth untouched
    pub fn stencil_write() -> Self {
        Self {
            depth_write: false,
            stencil: StencilFaceState {
                pass_op: StencilOperation::Replace,
                ..StencilFaceState::IGNORE
            },
            ..Self::default()
        }
    }

    /// Regular depth-tested drawing limited to pixels tagged with the reference
    pub fn stencil_test() -> Self {
        Self {
            stencil: StencilFaceState {
                compare: CompareFunction::Equal,
                ..StencilFaceState::IGNORE
            },
            stencil_write_mask: 0,
            ..Self::default()
        }
    }

    /// Whether this state can modify the stencil buffer
    pub fn writes_stencil(&self) -> bool {
        let face = self.stencil;
        self.stencil_write_mask != 0
            && [face.fail_op, face.depth_fail_op, face.pass_op]
                .iter()
                .any(|op| *op != StencilOperation::Keep)
    }

    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        let face = self.stencil.to_wgpu();
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.depth_test && self.depth_write,
            depth_compare: if self.depth_test {
                self.depth_compare.to_wgpu()
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState {
                front: face,
                back: face,
                read_mask: self.stencil_read_mask,
                write_mask: self.stencil_write_mask,
            },
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

bitflags! {
    /// Color channels written by a draw
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorWrites: u8 {
        const RED = 0b0001;
        const GREEN = 0b0010;
        const BLUE = 0b0100;
        const ALPHA = 0b1000;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for ColorWrites {
    fn default() -> Self {
        ColorWrites::ALL
    }
}

impl ColorWrites {
    fn to_wgpu(self) -> wgpu::ColorWrites {
        let mut writes = wgpu::ColorWrites::empty();
        if self.contains(ColorWrites::RED) {
            writes |= wgpu::ColorWrites::RED;
        }
        if self.contains(ColorWrites::GREEN) {
            writes |= wgpu::ColorWrites::GREEN;
        }
        if self.contains(ColorWrites::BLUE) {
            writes |= wgpu::ColorWrites::BLUE;
        }
        if self.contains(ColorWrites::ALPHA) {
            writes |= wgpu::ColorWrites::ALPHA;
        }
        writes
    }
}

/// Blend mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// `src * src_alpha + dst * (1 - src_alpha)`
    AlphaBlend,
}

/// Blend state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlendState {
    pub mode: BlendMode,
    pub write_mask: ColorWrites,
}

impl BlendState {
    pub fn alpha() -> Self {
        Self {
            mode: BlendMode::AlphaBlend,
            write_mask: ColorWrites::ALL,
        }
    }

    /// Draws reach depth/stencil only
    pub fn no_color() -> Self {
        Self {
            mode: BlendMode::Opaque,
            write_mask: ColorWrites::empty(),
        }
    }

    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: match self.mode {
                BlendMode::Opaque => Some(wgpu::BlendState::REPLACE),
                BlendMode::AlphaBlend => Some(wgpu::BlendState::ALPHA_BLENDING),
            },
            write_mask: self.write_mask.to_wgpu(),
        }
    }
}

/// Cull mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    None,
    Front,
    #[default]
    Back,
}

/// Front face winding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl FrontFace {
    /// Winding seen after a reflection
    pub fn flipped(self) -> Self {
        match self {
            FrontFace::Clockwise => FrontFace::CounterClockwise,
            FrontFace::CounterClockwise => FrontFace::Clockwise,
        }
    }
}

/// Rasterizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
}

impl RasterizerState {
    /// No culling, for one-sided surfaces seen from both sides
    pub fn two_sided() -> Self {
        Self {
            cull_mode: CullMode::None,
            ..Self::default()
        }
    }

    /// Same culling with reversed winding, for geometry drawn through a mirror
    pub fn mirrored(self) -> Self {
        Self {
            front_face: self.front_face.flipped(),
            ..self
        }
    }

    pub fn to_wgpu(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: match self.front_face {
                FrontFace::Clockwise => wgpu::FrontFace::Cw,
                FrontFace::CounterClockwise => wgpu::FrontFace::Ccw,
            },
            cull_mode: match self.cull_mode {
                CullMode::None => None,
                CullMode::Front => Some(wgpu::Face::Front),
                CullMode::Back => Some(wgpu::Face::Back),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
    const COLOR: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

    #[test]
    fn test_pipeline_state_default() {
        let state = PipelineState::default();
        assert_eq!(state.blend.mode, BlendMode::Opaque);
        assert!(state.depth_stencil.depth_test);
        assert!(!state.depth_stencil.writes_stencil());
        assert_eq!(state.rasterizer.front_face, FrontFace::CounterClockwise);
    }

    #[test]
    fn test_stencil_write_state() {
        let state = DepthStencilState::stencil_write();
        assert!(state.writes_stencil());

        let wgpu_state = state.to_wgpu(DEPTH);
        assert!(!wgpu_state.depth_write_enabled);
        assert_eq!(wgpu_state.depth_compare, wgpu::CompareFunction::Less);
        assert_eq!(wgpu_state.stencil.front.compare, wgpu::CompareFunction::Always);
        assert_eq!(wgpu_state.stencil.front.pass_op, wgpu::StencilOperation::Replace);
        assert_eq!(wgpu_state.stencil.back, wgpu_state.stencil.front);
    }

    #[test]
    fn test_stencil_test_state() {
        let state = DepthStencilState::stencil_test();
        assert!(!state.writes_stencil());

        let wgpu_state = state.to_wgpu(DEPTH);
        assert!(wgpu_state.depth_write_enabled);
        assert_eq!(wgpu_state.stencil.front.compare, wgpu::CompareFunction::Equal);
        assert_eq!(wgpu_state.stencil.write_mask, 0);
    }

    #[test]
    fn test_disabled_depth_test() {
        let state = DepthStencilState {
            depth_test: false,
            ..Default::default()
        };
        let wgpu_state = state.to_wgpu(DEPTH);
        assert_eq!(wgpu_state.depth_compare, wgpu::CompareFunction::Always);
        assert!(!wgpu_state.depth_write_enabled);
    }

    #[test]
    fn test_blend_states() {
        let alpha = BlendState::alpha().to_wgpu(COLOR);
        assert_eq!(alpha.blend, Some(wgpu::BlendState::ALPHA_BLENDING));
        assert_eq!(alpha.write_mask, wgpu::ColorWrites::ALL);

        let masked = BlendState::no_color().to_wgpu(COLOR);
        assert_eq!(masked.write_mask, wgpu::ColorWrites::empty());
    }

    #[test]
    fn test_mirrored_rasterizer_flips_winding() {
        let mirrored = RasterizerState::default().mirrored();
        assert_eq!(mirrored.front_face, FrontFace::Clockwise);
        assert_eq!(mirrored.cull_mode, CullMode::Back);
        assert_eq!(mirrored.mirrored(), RasterizerState::default());
        assert_eq!(mirrored.to_wgpu().front_face, wgpu::FrontFace::Cw);
        assert_eq!(RasterizerState::two_sided().to_wgpu().cull_mode, None);
    }

    #[test]
    fn test_full_state_conversion() {
        let states = PipelineState::default().to_wgpu(COLOR, DEPTH);
        assert_eq!(states.primitive.topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(states.depth_stencil.format, DEPTH);
        assert_eq!(states.color_target.format, COLOR);
    }
}
