//! Converted object model and its parts

pub mod animation;
pub mod bone;
pub mod material;
pub mod vertex;

use std::collections::BTreeMap;

use glam::Vec3;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::common::{BoundingBox, TriangleFace};
use crate::config::{ObjectClass, ObjectProperties};
use crate::context::ConversionContext;
use crate::error::{ConversionError, Result};
use crate::pipeline;
use crate::source::SourceObject;
use crate::track::Track;

pub use animation::{AnimationFlags, AnimationType, ModelAnimation, PLAY_FREQUENCY_TOTAL};
pub use bone::{BoneFlags, KEY_BONE_LOOKUP_COUNT, KeyBone, ModelBone};
pub use material::{BlendMode, ModelMaterial, RenderFlags};
pub use vertex::ModelVertex;

/// Attachment point identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum AttachmentType {
    ShieldMountMain = 0,
    ElbowRight = 3,
    ElbowLeft = 4,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelAttachment {
    pub attachment_type: AttachmentType,
    pub bone: u16,
    pub position: Vec3,
}

/// Animation event identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum EventType {
    DeathThud,
    WeaponSwoosh,
    Fidget1,
    Fidget2,
    Footfall,
    Wound,
}

impl EventType {
    pub const ALL: [Self; 6] = [
        Self::DeathThud,
        Self::WeaponSwoosh,
        Self::Fidget1,
        Self::Fidget2,
        Self::Footfall,
        Self::Wound,
    ];

    /// Four-character event identifier
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::DeathThud => "$DTH",
            Self::WeaponSwoosh => "$SWG",
            Self::Fidget1 => "$FD1",
            Self::Fidget2 => "$FD2",
            Self::Footfall => "$FSD",
            Self::Wound => "$HIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelEvent {
    pub event_type: EventType,
    pub bone: u16,
    pub position: Vec3,
}

/// Physical geometry used for collision
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct CollisionMesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<TriangleFace>,
    pub face_normals: Vec<Vec3>,
    pub bounding_box: BoundingBox,
    pub sphere_radius: f32,
}

impl CollisionMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Camera placement for unit portraits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct PortraitCamera {
    pub position: Vec3,
    pub target: Vec3,
}

/// Fully converted object, ready for serialization
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ObjectModel {
    pub name: String,
    pub properties: ObjectProperties,
    pub is_loaded: bool,
    pub is_skeletal: bool,
    pub vertices: Vec<ModelVertex>,
    pub triangles: Vec<TriangleFace>,
    pub materials: Vec<ModelMaterial>,
    pub bones: Vec<ModelBone>,
    /// Key bone slot to bone index, -1 when unresolved
    pub key_bone_lookups: Vec<i16>,
    pub animations: Vec<ModelAnimation>,
    /// Animation slot id to first animation index, -1 when the slot is empty
    pub animation_lookups: Vec<i16>,
    /// Bone lookup table per material index
    pub bone_lookups: BTreeMap<u32, Vec<u16>>,
    /// Transparency track per material index
    pub transparency: BTreeMap<u32, Track<i16>>,
    /// Length of each global loop sequence in milliseconds
    pub global_loop_sequence_limits: Vec<u32>,
    pub attachments: Vec<ModelAttachment>,
    pub events: Vec<ModelEvent>,
    pub geometry_box: BoundingBox,
    pub visibility_box: BoundingBox,
    pub bounding_radius: f32,
    pub collision: CollisionMesh,
    pub portrait_camera: Option<PortraitCamera>,
}

impl ObjectModel {
    /// Create an empty model carrying only its identity and settings
    pub fn new(name: &str, properties: ObjectProperties) -> Self {
        Self {
            name: name.to_string(),
            properties,
            is_loaded: false,
            is_skeletal: false,
            vertices: Vec::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
            bones: Vec::new(),
            key_bone_lookups: Vec::new(),
            animations: Vec::new(),
            animation_lookups: Vec::new(),
            bone_lookups: BTreeMap::new(),
            transparency: BTreeMap::new(),
            global_loop_sequence_limits: Vec::new(),
            attachments: Vec::new(),
            events: Vec::new(),
            geometry_box: BoundingBox::default(),
            visibility_box: BoundingBox::default(),
            bounding_radius: 0.0,
            collision: CollisionMesh::default(),
            portrait_camera: None,
        }
    }

    pub fn class(&self) -> ObjectClass {
        self.properties.class
    }

    /// Run the conversion pipeline over `source`.
    ///
    /// On error the model is left untouched and unloaded.
    pub fn load(&mut self, source: SourceObject, context: &ConversionContext) -> Result<()> {
        if self.is_loaded {
            return Err(ConversionError::AlreadyLoaded(self.name.clone()));
        }
        let loaded = pipeline::run(self.name.clone(), self.properties.clone(), source, context)?;
        *self = loaded;
        Ok(())
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.is_named(name))
    }

    pub fn material(&self, index: u32) -> Option<&ModelMaterial> {
        self.materials.iter().find(|m| m.index == index)
    }

    /// Animations filling the given slot, in order
    pub fn animations_of(&self, animation_type: AnimationType) -> impl Iterator<Item = &ModelAnimation> {
        self.animations
            .iter()
            .filter(move |a| a.animation_type == animation_type)
    }
}
