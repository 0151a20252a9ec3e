//! Portrait camera placement
//!
//! Unit frames show a small live render of the creature's face. The camera
//! is anchored at the head bone's bind-pose position.

use glam::{Quat, Vec3};
use log::{error, trace};

use crate::config::PortraitCameraOffsets;
use crate::model::{ModelBone, PortraitCamera};
use crate::skeleton::first_bone_index_for_names;

/// Bones tried, in order, as the camera anchor
pub const PORTRAIT_ANCHOR_ALIASES: &[&str] = &["head_point", "he", "head", "ch"];

fn parent_of(bones: &[ModelBone], index: usize) -> Option<usize> {
    usize::try_from(bones[index].parent_bone)
        .ok()
        .filter(|&parent| parent < bones.len())
}

/// Bind-pose position of bone `index`, composed with every ancestor's first keyframes
pub fn bone_world_position(bones: &[ModelBone], index: usize) -> Vec3 {
    let mut position = Vec3::ZERO;
    let mut current = Some(index);
    // A malformed hierarchy must not loop forever
    for _ in 0..bones.len() {
        let Some(bone_index) = current else {
            break;
        };
        let bone = &bones[bone_index];
        let rotation = bone
            .rotation
            .first_value()
            .map_or(Quat::IDENTITY, |r| r.to_quat());
        let scale = bone.scale.first_value().copied().unwrap_or(Vec3::ONE);
        let translation = bone.translation.first_value().copied().unwrap_or(Vec3::ZERO);

        position = rotation * position;
        position *= scale;
        position += translation;
        current = parent_of(bones, bone_index);
    }
    position
}

/// Camera looking at the head, or `None` when no head-like bone carries data
pub fn compute_portrait_camera(
    bones: &[ModelBone],
    offsets: &PortraitCameraOffsets,
) -> Option<PortraitCamera> {
    let Some(anchor) = first_bone_index_for_names(bones, PORTRAIT_ANCHOR_ALIASES) else {
        error!("No head bone found for the portrait camera");
        return None;
    };

    let mut current = Some(anchor);
    let mut steps = 0;
    while let Some(index) = current {
        if bones[index].translation.has_keyframes() || steps > bones.len() {
            break;
        }
        trace!("Bone '{}' has no translation, moving up", bones[index].name);
        current = parent_of(bones, index);
        steps += 1;
    }
    let Some(head) = current.filter(|&i| bones[i].translation.has_keyframes()) else {
        error!(
            "No bone at or above '{}' has translation data for the portrait camera",
            bones[anchor].name
        );
        return None;
    };

    let head_position = bone_world_position(bones, head);
    Some(PortraitCamera {
        position: head_position + offsets.position,
        target: head_position + offsets.target,
    })
}
