//! Ingested object data as handed over by the EverQuest file readers
//!
//! Nothing here is converted yet: positions are still in EverQuest axes and
//! units, bone indices are still source-local and animation clips carry their
//! EverQuest type codes.

use std::collections::BTreeMap;

use glam::{Quat, Vec2, Vec3};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::common::TriangleFace;

/// Surface type of an EverQuest material, encoded in its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum MaterialType {
    #[default]
    Diffuse,
    Invisible,
    Boundary,
    Transparent25Percent,
    Transparent50Percent,
    Transparent75Percent,
    TransparentAdditive,
    TransparentAdditiveUnlit,
    TransparentMasked,
    DiffuseSkydome,
    TransparentSkydome,
    TransparentAdditiveUnlitSkydome,
}

impl MaterialType {
    /// Parse the prefix before the first underscore of a material name
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Some(match prefix {
            "d" => Self::Diffuse,
            "i" => Self::Invisible,
            "b" | "taus" => Self::Boundary,
            "t25" => Self::Transparent25Percent,
            "t50" => Self::Transparent50Percent,
            "t75" => Self::Transparent75Percent,
            "ta" => Self::TransparentAdditive,
            "tau" => Self::TransparentAdditiveUnlit,
            "tm" => Self::TransparentMasked,
            "ds" => Self::DiffuseSkydome,
            "ts" => Self::TransparentSkydome,
            _ => return None,
        })
    }

    pub fn has_transparency(self) -> bool {
        !matches!(self, Self::Diffuse | Self::DiffuseSkydome)
    }

    pub fn is_additive(self) -> bool {
        matches!(
            self,
            Self::TransparentAdditive
                | Self::TransparentAdditiveUnlit
                | Self::TransparentAdditiveUnlitSkydome
        )
    }
}

/// Material as listed by the source material list
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceMaterial {
    pub index: u32,
    pub name: String,
    /// Name made unique across the object, used to derive frame material names
    pub unique_name: String,
    pub material_type: MaterialType,
    /// Texture chain; more than one entry cycles through frames
    pub texture_names: Vec<String>,
    /// Delay between texture frames, zero for static materials
    pub animation_delay_ms: u32,
    pub texture_width: u32,
    pub texture_height: u32,
    pub always_bright: bool,
    pub is_particle: bool,
}

impl SourceMaterial {
    pub fn is_animated(&self) -> bool {
        self.animation_delay_ms > 0
    }

    pub fn has_transparency(&self) -> bool {
        self.material_type.has_transparency()
    }

    pub fn is_renderable(&self) -> bool {
        !matches!(
            self.material_type,
            MaterialType::Invisible
                | MaterialType::Boundary
                | MaterialType::DiffuseSkydome
                | MaterialType::TransparentSkydome
        ) && !self.texture_names.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.texture_names.len()
    }
}

/// Render mesh in source space
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texture_coordinates: Vec<Vec2>,
    pub triangles: Vec<TriangleFace>,
    /// Source-local bone index per vertex, empty for unskinned meshes
    pub bone_indices: Vec<u16>,
    /// Per-frame offsets for every vertex, empty when the mesh has no vertex animation
    pub animated_vertex_frames: Vec<Vec<Vec3>>,
}

impl SourceMesh {
    pub fn is_consistent(&self) -> bool {
        self.positions.len() == self.normals.len()
            && self.positions.len() == self.texture_coordinates.len()
    }

    /// Whether vertex `index` moves in any vertex animation frame
    pub fn is_vertex_animated(&self, index: usize) -> bool {
        self.animated_vertex_frames.iter().any(|frame| {
            frame
                .get(index)
                .is_some_and(|offset| *offset != Vec3::ZERO)
        })
    }

    /// Stable-sort triangles by material and renumber vertices in first-use order.
    ///
    /// Vertices not referenced by any triangle keep their relative order at the end.
    pub fn sort_by_material(&mut self) {
        self.triangles.sort_by_key(|t| t.material_index);

        let vertex_count = self.positions.len();
        let mut remap: Vec<Option<u32>> = vec![None; vertex_count];
        let mut order: Vec<usize> = Vec::with_capacity(vertex_count);
        for triangle in &mut self.triangles {
            for index in [&mut triangle.v1, &mut triangle.v2, &mut triangle.v3] {
                let old = *index as usize;
                if old >= vertex_count {
                    continue;
                }
                let new = *remap[old].get_or_insert_with(|| {
                    order.push(old);
                    (order.len() - 1) as u32
                });
                *index = new;
            }
        }
        for (old, mapped) in remap.iter().enumerate() {
            if mapped.is_none() {
                order.push(old);
            }
        }

        self.positions = order.iter().map(|&i| self.positions[i]).collect();
        if self.normals.len() == vertex_count {
            self.normals = order.iter().map(|&i| self.normals[i]).collect();
        }
        if self.texture_coordinates.len() == vertex_count {
            self.texture_coordinates = order.iter().map(|&i| self.texture_coordinates[i]).collect();
        }
        if self.bone_indices.len() == vertex_count {
            self.bone_indices = order.iter().map(|&i| self.bone_indices[i]).collect();
        }
        for frame in &mut self.animated_vertex_frames {
            if frame.len() == vertex_count {
                *frame = order.iter().map(|&i| frame[i]).collect();
            }
        }
    }
}

/// Explicit collision geometry supplied alongside the render mesh
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceCollision {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<TriangleFace>,
}

/// Named bone of the source skeleton
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceBone {
    pub name: String,
    /// Children as indices into the source bone list
    pub children: Vec<i32>,
    pub mesh_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceSkeleton {
    pub bones: Vec<SourceBone>,
}

/// EverQuest animation clip types, named after their three-letter codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum SourceAnimationType {
    #[default]
    Unknown,
    C01Kick,
    C02AttackPierce,
    C03Attack2H,
    C04Attack2HBlunt,
    C05AttackThrown,
    C06AttackOff,
    C07ShieldBash,
    C08AttackUnarmed,
    C09AttackBow,
    C10AttackUnderwater,
    C11RoundhouseKick,
    D01Damage1,
    D02Damage2,
    D03TrapDamage,
    D04DrownAndBurn,
    D05Death,
    DrfStandPose,
    L01Walk,
    L01rWalkBackwards,
    L02Run,
    L02rRunBackwards,
    L03JumpRunning,
    L04JumpStanding,
    L05Fall,
    L06CrouchWalk,
    L07Climbing,
    L08Crouch,
    L09SwimIdle,
    O01StandIdle,
    O02StandArmsToSide,
    O03SitIdle,
    P01StandPassive,
    P02StandToSit,
    P03ShuffleFeet,
    P03rShuffleFeetReverse,
    P05KneelStart,
    P06Swim,
    P07SitGround,
    P08StandArmsToSide,
    PosStandPose,
    S15LookAround,
    S17EmoteBlink,
    T04CastPullBack,
    T05CastLoopArms,
}

impl SourceAnimationType {
    /// Resolve an animation code such as `l01` or `p03r`
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "c01" => Self::C01Kick,
            "c02" => Self::C02AttackPierce,
            "c03" => Self::C03Attack2H,
            "c04" => Self::C04Attack2HBlunt,
            "c05" => Self::C05AttackThrown,
            "c06" => Self::C06AttackOff,
            "c07" => Self::C07ShieldBash,
            "c08" => Self::C08AttackUnarmed,
            "c09" => Self::C09AttackBow,
            "c10" => Self::C10AttackUnderwater,
            "c11" => Self::C11RoundhouseKick,
            "d01" => Self::D01Damage1,
            "d02" => Self::D02Damage2,
            "d03" => Self::D03TrapDamage,
            "d04" => Self::D04DrownAndBurn,
            "d05" => Self::D05Death,
            "drf" => Self::DrfStandPose,
            "l01" => Self::L01Walk,
            "l01r" => Self::L01rWalkBackwards,
            "l02" => Self::L02Run,
            "l02r" => Self::L02rRunBackwards,
            "l03" => Self::L03JumpRunning,
            "l04" => Self::L04JumpStanding,
            "l05" => Self::L05Fall,
            "l06" => Self::L06CrouchWalk,
            "l07" => Self::L07Climbing,
            "l08" => Self::L08Crouch,
            "l09" => Self::L09SwimIdle,
            "o01" => Self::O01StandIdle,
            "o02" => Self::O02StandArmsToSide,
            "o03" => Self::O03SitIdle,
            "p01" => Self::P01StandPassive,
            "p02" => Self::P02StandToSit,
            "p03" => Self::P03ShuffleFeet,
            "p03r" => Self::P03rShuffleFeetReverse,
            "p05" => Self::P05KneelStart,
            "p06" => Self::P06Swim,
            "p07" => Self::P07SitGround,
            "p08" => Self::P08StandArmsToSide,
            "pos" => Self::PosStandPose,
            "s15" => Self::S15LookAround,
            "s17" => Self::S17EmoteBlink,
            "t04" => Self::T04CastPullBack,
            "t05" => Self::T05CastLoopArms,
            _ => Self::Unknown,
        }
    }
}

/// One bone's pose for one frame of a clip
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct BoneFrame {
    pub bone_name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// How long this frame is shown
    pub frame_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceAnimation {
    pub animation_type: SourceAnimationType,
    pub frame_count: u32,
    pub total_time_ms: u32,
    /// Frames grouped per bone, in playback order
    pub frames: Vec<BoneFrame>,
}

/// Everything the ingestor produced for one object
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SourceObject {
    pub name: String,
    pub materials: Vec<SourceMaterial>,
    pub mesh: SourceMesh,
    pub skeleton: Option<SourceSkeleton>,
    /// Animation clips keyed by clip name
    pub animations: BTreeMap<String, SourceAnimation>,
    pub collision: Option<SourceCollision>,
}

impl SourceObject {
    pub fn material(&self, index: u32) -> Option<&SourceMaterial> {
        self.materials.iter().find(|m| m.index == index)
    }
}
