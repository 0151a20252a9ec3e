use crate::source::MaterialType;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Render flags as defined by the target renderer
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct RenderFlags: u16 {
        /// Unlit
        const UNLIT = 0x01;
        /// Unfogged
        const UNFOGGED = 0x02;
        /// No backface culling
        const NO_BACKFACE_CULLING = 0x04;
        /// Depth test
        const DEPTH_TEST = 0x20;
        /// Depth write
        const DEPTH_WRITE = 0x40;
    }
}

/// Blend modes available to converted materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum BlendMode {
    #[default]
    Opaque = 0,
    AlphaKey = 1,
    Alpha = 2,
    Add = 4,
}

impl BlendMode {
    /// Blend mode for a source material, before any per-object override
    pub const fn from_material_type(material_type: MaterialType) -> Self {
        match material_type {
            MaterialType::TransparentAdditive
            | MaterialType::TransparentAdditiveUnlit
            | MaterialType::TransparentAdditiveUnlitSkydome => Self::Add,
            MaterialType::Transparent25Percent
            | MaterialType::Transparent50Percent
            | MaterialType::Transparent75Percent
            | MaterialType::TransparentMasked => Self::AlphaKey,
            _ => Self::Opaque,
        }
    }
}

/// Fixed-point opacity of a static material
pub const fn static_transparency(material_type: MaterialType) -> i16 {
    match material_type {
        MaterialType::Transparent25Percent => 8192,
        MaterialType::Transparent50Percent => 16384,
        MaterialType::Transparent75Percent => 24575,
        _ => i16::MAX,
    }
}

/// Single-texture material handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelMaterial {
    /// Material index referenced by triangles
    pub index: u32,
    pub name: String,
    pub material_type: MaterialType,
    pub texture_name: String,
    pub blend_mode: BlendMode,
    pub render_flags: RenderFlags,
    pub always_bright: bool,
    pub is_particle: bool,
    /// Set on materials produced from one frame of an animated texture chain
    pub animation_frame: Option<u32>,
    pub texture_width: u32,
    pub texture_height: u32,
    pub tint: Option<[u8; 3]>,
}

impl ModelMaterial {
    pub fn has_transparency(&self) -> bool {
        self.material_type.has_transparency()
    }
}
