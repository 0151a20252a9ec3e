//! Bones of the converted skeleton

use glam::Vec3;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::common::CompQuat;
use crate::track::{InterpolationType, Track};

bitflags::bitflags! {
    /// Bone flags as understood by the target renderer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct BoneFlags: u16 {
        /// Spherical billboard
        const SPHERICAL_BILLBOARD = 0x8;
        /// Cylindrical billboard lock X
        const CYLINDRICAL_BILLBOARD_LOCK_X = 0x10;
        /// Cylindrical billboard lock Y
        const CYLINDRICAL_BILLBOARD_LOCK_Y = 0x20;
        /// Cylindrical billboard lock Z
        const CYLINDRICAL_BILLBOARD_LOCK_Z = 0x40;
        /// Transformed
        const TRANSFORMED = 0x200;
        /// Kinematic bone (requires physics)
        const KINEMATIC_BONE = 0x400;
        /// Helper bone
        const HELPER_BONE = 0x1000;
        /// Has animation
        const HAS_ANIMATION = 0x4000;
    }
}

/// Number of slots in the key bone lookup table
pub const KEY_BONE_LOOKUP_COUNT: usize = 27;

/// Semantic roles a bone can be looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum KeyBone {
    ArmLeft = 0,
    ArmRight = 1,
    ShoulderLeft = 2,
    ShoulderRight = 3,
    SpineLow = 4,
    Waist = 5,
    Head = 6,
    Jaw = 7,
    Breath = 21,
    Name = 22,
    NameMount = 23,
    Root = 26,
}

impl KeyBone {
    pub const fn lookup_slot(self) -> usize {
        self as usize
    }
}

/// Hash stored alongside every bone, CRC-32 of the lower-cased name
pub fn bone_name_hash(name: &str) -> u32 {
    crc32fast::hash(name.to_ascii_lowercase().as_bytes())
}

/// A bone with its three animated channels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelBone {
    pub name: String,
    pub name_hash: u32,
    pub flags: BoneFlags,
    /// Parent bone index, -1 for none
    pub parent_bone: i16,
    pub key_bone: Option<KeyBone>,
    pub pivot: Vec3,
    pub scale: Track<Vec3>,
    pub rotation: Track<CompQuat>,
    pub translation: Track<Vec3>,
}

impl ModelBone {
    pub fn new(name: &str, interpolation_type: InterpolationType) -> Self {
        Self {
            name: name.to_string(),
            name_hash: bone_name_hash(name),
            flags: BoneFlags::TRANSFORMED,
            parent_bone: -1,
            key_bone: None,
            pivot: Vec3::ZERO,
            scale: Track::new(interpolation_type),
            rotation: Track::new(interpolation_type),
            translation: Track::new(interpolation_type),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_bone: i16) -> Self {
        self.parent_bone = parent_bone;
        self
    }

    #[must_use]
    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: BoneFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Open one new sub-sequence on every channel, returning its index
    pub fn add_sequence(&mut self) -> usize {
        self.scale.add_sequence();
        self.rotation.add_sequence();
        self.translation.add_sequence()
    }

    pub fn sequence_count(&self) -> usize {
        self.translation.sequences.len()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
