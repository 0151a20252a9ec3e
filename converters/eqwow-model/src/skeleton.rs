//! Skeleton building from named EverQuest bone structures
//!
//! The converted skeleton always starts with a synthetic `main` bone. Source
//! bones follow in source order, so a source-local bone index `i` becomes
//! target index `i + 1`. Parent links are resolved by bone name in a second
//! pass because the source expresses children as source-local indices.

use glam::Vec3;
use log::{debug, error, warn};

use crate::error::{ConversionError, Result};
use crate::model::bone::{BoneFlags, KEY_BONE_LOOKUP_COUNT, KeyBone, ModelBone};
use crate::model::{AttachmentType, EventType, ModelAttachment, ModelEvent, ModelVertex};
use crate::source::SourceSkeleton;
use crate::track::InterpolationType;

pub const MAIN_BONE_NAME: &str = "main";
pub const ROOT_BONE_NAME: &str = "root";

pub const ROOT_ALIASES: &[&str] = &["root"];
pub const HEAD_ALIASES: &[&str] = &["he", "head", "head_point", "ch", "pe", "root"];
pub const JAW_ALIASES: &[&str] = &["ja", "jaw", "head_point", "he", "head", "ch", "pe", "root"];
pub const BREATH_ALIASES: &[&str] = &["head_point", "ja", "jaw", "he", "head", "ch", "root"];
pub const NAME_ALIASES: &[&str] = &["head_point", "he", "head", "ch", "pe", "root"];

const KEY_BONE_ALIASES: [(KeyBone, &[&str]); 5] = [
    (KeyBone::Root, ROOT_ALIASES),
    (KeyBone::Head, HEAD_ALIASES),
    (KeyBone::Jaw, JAW_ALIASES),
    (KeyBone::Breath, BREATH_ALIASES),
    (KeyBone::Name, NAME_ALIASES),
];

const EVENT_PIVOTS: [(EventType, Vec3); 6] = [
    (EventType::DeathThud, Vec3::ZERO),
    (EventType::WeaponSwoosh, Vec3::new(0.5, 0.0, 1.0)),
    (EventType::Fidget1, Vec3::new(0.0, 0.0, 1.0)),
    (EventType::Fidget2, Vec3::new(0.0, 0.0, 1.0)),
    (EventType::Footfall, Vec3::ZERO),
    (EventType::Wound, Vec3::new(0.0, 0.0, 1.0)),
];

const ATTACHMENT_PIVOTS: [(AttachmentType, &str, Vec3); 3] = [
    (AttachmentType::ShieldMountMain, "att_shield", Vec3::new(0.0, 0.0, 0.0)),
    (AttachmentType::ElbowRight, "att_elbow_r", Vec3::new(0.0, -0.3, 0.5)),
    (AttachmentType::ElbowLeft, "att_elbow_l", Vec3::new(0.0, 0.3, 0.5)),
];

/// Index of the first bone matching any of `names`, tried in order
pub fn first_bone_index_for_names(bones: &[ModelBone], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| bones.iter().position(|bone| bone.is_named(name)))
}

/// Skeleton ready to receive animation tracks
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSkeleton {
    pub bones: Vec<ModelBone>,
    pub key_bone_lookups: Vec<i16>,
    pub attachments: Vec<ModelAttachment>,
    pub events: Vec<ModelEvent>,
}

impl BuiltSkeleton {
    /// One parentless `main` bone, used whenever a real skeleton is unavailable
    pub fn single_bone() -> Self {
        Self {
            bones: vec![ModelBone::new(MAIN_BONE_NAME, InterpolationType::None)],
            key_bone_lookups: vec![-1; KEY_BONE_LOOKUP_COUNT],
            attachments: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Build the indexed skeleton and rebind `vertices` to it.
///
/// Fails only when the source has no bone structures at all.
pub fn build_skeleton(
    skeleton: &SourceSkeleton,
    vertices: &mut [ModelVertex],
    with_attachments: bool,
) -> Result<BuiltSkeleton> {
    if skeleton.bones.is_empty() {
        return Err(ConversionError::Skeleton(
            "source skeleton has no bone structures".to_string(),
        ));
    }

    let mut bones = Vec::with_capacity(skeleton.bones.len() + 1);
    bones.push(ModelBone::new(MAIN_BONE_NAME, InterpolationType::None));
    for source_bone in &skeleton.bones {
        let bone = if source_bone.name.eq_ignore_ascii_case(ROOT_BONE_NAME) {
            ModelBone::new(&source_bone.name, InterpolationType::None).with_parent(0)
        } else {
            ModelBone::new(&source_bone.name, InterpolationType::Linear)
        };
        bones.push(bone);
    }

    let bone_count = bones.len();
    for vertex in vertices.iter_mut() {
        if let Some(shifted) = vertex.bone_indices[0]
            .checked_add(1)
            .filter(|&s| usize::from(s) < bone_count)
        {
            vertex.bone_indices[0] = shifted;
        } else {
            error!(
                "Vertex references bone {} but the skeleton has {} bones, binding to main",
                vertex.bone_indices[0],
                bone_count - 1
            );
            vertex.bone_indices[0] = 0;
        }
    }

    link_parents(skeleton, &mut bones);

    let mut key_bone_lookups = vec![-1i16; KEY_BONE_LOOKUP_COUNT];
    for (key_bone, aliases) in KEY_BONE_ALIASES {
        match first_bone_index_for_names(&bones, aliases) {
            Some(index) => {
                key_bone_lookups[key_bone.lookup_slot()] = index as i16;
                bones[index].key_bone.get_or_insert(key_bone);
            }
            None => warn!("No bone found for key bone {:?}", key_bone),
        }
    }

    let anchor = first_bone_index_for_names(&bones, ROOT_ALIASES).unwrap_or(0) as i16;

    let mut events = Vec::with_capacity(EVENT_PIVOTS.len());
    for (event_type, pivot) in EVENT_PIVOTS {
        events.push(ModelEvent {
            event_type,
            bone: bones.len() as u16,
            position: pivot,
        });
        bones.push(
            ModelBone::new(event_type.identifier(), InterpolationType::None)
                .with_parent(anchor)
                .with_pivot(pivot),
        );
    }

    let mut attachments = Vec::new();
    if with_attachments {
        for (attachment_type, name, pivot) in ATTACHMENT_PIVOTS {
            attachments.push(ModelAttachment {
                attachment_type,
                bone: bones.len() as u16,
                position: pivot,
            });
            bones.push(
                ModelBone::new(name, InterpolationType::None)
                    .with_parent(anchor)
                    .with_pivot(pivot)
                    .with_flags(BoneFlags::TRANSFORMED),
            );
        }
    }

    debug!(
        "Built skeleton with {} bones ({} source, {} events, {} attachments)",
        bones.len(),
        skeleton.bones.len(),
        events.len(),
        attachments.len()
    );

    Ok(BuiltSkeleton {
        bones,
        key_bone_lookups,
        attachments,
        events,
    })
}

/// Second pass: point every child at its parent, both looked up by name
fn link_parents(skeleton: &SourceSkeleton, bones: &mut [ModelBone]) {
    let source_count = skeleton.bones.len();
    for source_bone in &skeleton.bones {
        let Some(parent_index) = first_bone_index_for_names(bones, &[source_bone.name.as_str()])
        else {
            error!("Bone '{}' vanished from the skeleton", source_bone.name);
            continue;
        };
        for &child in &source_bone.children {
            let Some(child_bone) = usize::try_from(child)
                .ok()
                .filter(|&c| c < source_count)
                .map(|c| &skeleton.bones[c])
            else {
                error!(
                    "Bone '{}' lists child {} outside the {} source bones, skipping",
                    source_bone.name, child, source_count
                );
                continue;
            };
            let Some(child_index) = first_bone_index_for_names(bones, &[child_bone.name.as_str()])
            else {
                error!(
                    "Child bone '{}' of '{}' could not be found, skipping",
                    child_bone.name, source_bone.name
                );
                continue;
            };
            bones[child_index].parent_bone = parent_index as i16;
        }
    }
}
