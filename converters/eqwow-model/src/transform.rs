//! EverQuest to World of Warcraft coordinate transformation
//!
//! EverQuest geometry is authored facing the opposite way around the Z axis
//! and at a different unit scale. Static geometry is turned 180 degrees about
//! Z and scaled; skeletal creatures and equipment are only scaled because
//! their animation data already carries the correct facing.
//!
//! Every transformed mesh also has its triangle winding reversed and its V
//! texture coordinate flipped, since the two engines disagree on handedness.

use glam::{Quat, Vec2, Vec3};

use crate::config::{ConversionConfig, ObjectClass};
use crate::source::{SourceCollision, SourceMesh};

/// Scale and axis conversion applied to one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    scale: f32,
    rotate_z: bool,
    pre_scale: Vec3,
}

impl CoordinateTransformer {
    pub const fn new(scale: f32, rotate_z: bool) -> Self {
        Self {
            scale,
            rotate_z,
            pre_scale: Vec3::ONE,
        }
    }

    /// Per-axis factor applied to positions before the uniform scale
    #[must_use]
    pub const fn with_pre_scale(mut self, pre_scale: Vec3) -> Self {
        self.pre_scale = pre_scale;
        self
    }

    /// Transformer for an object class, or `None` when its geometry is already in target space
    pub fn for_class(class: ObjectClass, skeletal: bool, config: &ConversionConfig) -> Option<Self> {
        match class {
            ObjectClass::Creature => Some(Self::new(config.creature_scale, !skeletal)),
            ObjectClass::EquipmentHeld => Some(Self::new(config.equipment_scale, !skeletal)),
            ObjectClass::StaticDoodad | ObjectClass::Transport => {
                Some(Self::new(config.world_scale, true))
            }
            ObjectClass::ParticleEmitter | ObjectClass::SpellProjectile => {
                Some(Self::new(config.world_scale, false))
            }
            ObjectClass::ZoneModel | ObjectClass::SoundInstance => None,
        }
    }

    pub const fn scale(&self) -> f32 {
        self.scale
    }

    pub const fn rotates(&self) -> bool {
        self.rotate_z
    }

    fn rotate(&self, v: Vec3) -> Vec3 {
        if self.rotate_z {
            Vec3::new(-v.x, -v.y, v.z)
        } else {
            v
        }
    }

    pub fn transform_position(&self, position: Vec3) -> Vec3 {
        self.rotate(position * self.pre_scale * self.scale)
    }

    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.rotate(normal)
    }

    /// Animation translations get the uniform scale but not the per-axis pre-scale
    pub fn transform_translation(&self, translation: Vec3) -> Vec3 {
        self.rotate(translation * self.scale)
    }

    /// Conjugate a rotation by the 180 degree Z turn applied to positions
    pub fn transform_rotation(&self, rotation: Quat) -> Quat {
        if self.rotate_z {
            Quat::from_xyzw(-rotation.x, -rotation.y, rotation.z, rotation.w)
        } else {
            rotation
        }
    }

    pub fn transform_mesh(&self, mesh: &mut SourceMesh) {
        for position in &mut mesh.positions {
            *position = self.transform_position(*position);
        }
        for normal in &mut mesh.normals {
            *normal = self.transform_normal(*normal);
        }
        for texture_coordinate in &mut mesh.texture_coordinates {
            *texture_coordinate = Vec2::new(texture_coordinate.x, -texture_coordinate.y);
        }
        for triangle in &mut mesh.triangles {
            *triangle = triangle.reversed();
        }
        for frame in &mut mesh.animated_vertex_frames {
            for offset in frame.iter_mut() {
                *offset = self.rotate(*offset * self.pre_scale * self.scale);
            }
        }
    }

    /// Collision gets exactly the same treatment as the render mesh
    pub fn transform_collision(&self, collision: &mut SourceCollision) {
        for position in &mut collision.positions {
            *position = self.transform_position(*position);
        }
        for triangle in &mut collision.triangles {
            *triangle = triangle.reversed();
        }
    }
}
