use glam::{Vec2, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Skinned render vertex
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub bone_weights: [u8; 4],
    /// Indices into the model's bone array
    pub bone_indices: [u16; 4],
    /// Indices into the bone lookup table of this vertex's material
    pub bone_lookup_indices: [u16; 4],
    pub texture_coordinates: [Vec2; 2],
}

impl ModelVertex {
    pub fn new(position: Vec3, normal: Vec3, texture_coordinates: Vec2) -> Self {
        Self {
            position,
            normal,
            bone_weights: [255, 0, 0, 0],
            bone_indices: [0; 4],
            bone_lookup_indices: [0; 4],
            texture_coordinates: [texture_coordinates, Vec2::ZERO],
        }
    }

    pub const fn bone_index(&self) -> u16 {
        self.bone_indices[0]
    }
}
