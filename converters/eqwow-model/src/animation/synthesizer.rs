//! Keyframe construction from source animation clips

use std::collections::{BTreeMap, HashMap};

use glam::{Quat, Vec3};
use log::{debug, error, trace};

use super::mapping::{SKELETAL_SLOTS, SlotRole, find_source_clip};
use crate::common::{BoundingBox, CompQuat};
use crate::error::{ConversionError, Result};
use crate::model::{ModelAnimation, ModelBone, PLAY_FREQUENCY_TOTAL};
use crate::skeleton::{ROOT_ALIASES, first_bone_index_for_names};
use crate::source::SourceAnimation;
use crate::transform::CoordinateTransformer;

/// Builds the fixed skeletal slot set from an object's source clips
#[derive(Debug, Clone)]
pub struct AnimationSynthesizer {
    transformer: CoordinateTransformer,
    lift_height: f32,
    fidget_time_percent: u8,
    bounding_box: BoundingBox,
    bounding_radius: f32,
}

impl AnimationSynthesizer {
    pub fn new(transformer: CoordinateTransformer) -> Self {
        Self {
            transformer,
            lift_height: 0.0,
            fidget_time_percent: 0,
            bounding_box: BoundingBox::default(),
            bounding_radius: 0.0,
        }
    }

    /// Z offset added to every translation of bones hanging off `root`
    #[must_use]
    pub fn with_lift_height(mut self, lift_height: f32) -> Self {
        self.lift_height = lift_height;
        self
    }

    #[must_use]
    pub fn with_fidget_time_percent(mut self, percent: u8) -> Self {
        self.fidget_time_percent = percent;
        self
    }

    /// Bounds copied onto every animation
    #[must_use]
    pub fn with_bounds(mut self, bounding_box: BoundingBox, bounding_radius: f32) -> Self {
        self.bounding_box = bounding_box;
        self.bounding_radius = bounding_radius;
        self
    }

    /// Fill every slot that has a matching clip, adding one sequence per animation to every bone.
    ///
    /// Fails when a clip animates a bone the skeleton does not have.
    pub fn synthesize(
        &self,
        bones: &mut [ModelBone],
        clips: &BTreeMap<String, SourceAnimation>,
    ) -> Result<Vec<ModelAnimation>> {
        let mut animations: Vec<ModelAnimation> = Vec::new();
        let mut roles = Vec::new();

        for mapping in &SKELETAL_SLOTS {
            let Some((name, clip)) = find_source_clip(clips, mapping.candidates) else {
                trace!(
                    "No source animation found for slot {}",
                    mapping.animation_type.name()
                );
                continue;
            };

            let sequence = animations.len();
            for bone in bones.iter_mut() {
                bone.add_sequence();
            }

            let mut animation = ModelAnimation::new(mapping.animation_type, 0)
                .with_bounds(self.bounding_box, self.bounding_radius);
            let duration = self.build_sequence(bones, name, clip, sequence)?;
            for bone in bones.iter_mut() {
                bone.scale.close_loop(sequence, duration, animation.looping)?;
                bone.rotation.close_loop(sequence, duration, animation.looping)?;
                bone.translation.close_loop(sequence, duration, animation.looping)?;
            }

            animation.duration_ms = duration;
            animation.source_type = Some(clip.animation_type);
            animation.source_name = Some(name.to_string());
            animation.alias_next = sequence as u16;
            debug!(
                "Slot {} filled from clip '{}' ({} ms)",
                mapping.animation_type.name(),
                name,
                duration
            );
            animations.push(animation);
            roles.push(mapping.role);
        }

        if animations.is_empty() {
            error!("Skeletal object has no usable animations, it will not move");
        }
        rebalance_stand_frequencies(&mut animations, &roles, self.fidget_time_percent);
        Ok(animations)
    }

    /// Lay one clip's frames into `sequence` and return the animation duration
    fn build_sequence(
        &self,
        bones: &mut [ModelBone],
        clip_name: &str,
        clip: &SourceAnimation,
        sequence: usize,
    ) -> Result<u32> {
        let root_index = first_bone_index_for_names(bones, ROOT_ALIASES);
        let mut bone_indices: HashMap<&str, usize> = HashMap::new();
        let mut clocks: HashMap<usize, u32> = HashMap::new();
        let mut last_timestamp = 0u32;

        for frame in &clip.frames {
            let index = match bone_indices.get(frame.bone_name.as_str()) {
                Some(&index) => index,
                None => {
                    let index = first_bone_index_for_names(bones, &[frame.bone_name.as_str()])
                        .ok_or_else(|| {
                            ConversionError::Animation(format!(
                                "clip '{}' animates unknown bone '{}'",
                                clip_name, frame.bone_name
                            ))
                        })?;
                    bone_indices.insert(frame.bone_name.as_str(), index);
                    index
                }
            };

            let clock = clocks.entry(index).or_insert(0);
            let timestamp = *clock;
            *clock = clock.saturating_add(frame.frame_ms);
            last_timestamp = last_timestamp.max(timestamp);

            let bone = &mut bones[index];
            if Some(index) == root_index {
                // Root never drifts; object placement carries root motion
                if bone.translation.sequence(sequence).is_some_and(|s| s.is_empty()) {
                    bone.scale.add_value(sequence, 0, Vec3::ONE)?;
                    bone.rotation.add_value(sequence, 0, CompQuat::IDENTITY)?;
                    bone.translation.add_value(sequence, 0, Vec3::ZERO)?;
                }
                continue;
            }

            let mut translation = self.transformer.transform_translation(frame.translation);
            if root_index.is_some_and(|root| i32::from(bone.parent_bone) == root as i32) {
                translation.z += self.lift_height;
            }
            let rotation = self.transformer.transform_rotation(Quat::from_xyzw(
                -frame.rotation.x,
                -frame.rotation.y,
                -frame.rotation.z,
                frame.rotation.w,
            ));

            bone.translation.add_value(sequence, timestamp, translation)?;
            bone.scale
                .add_value(sequence, timestamp, Vec3::splat(frame.scale))?;
            bone.rotation.add_rotation(sequence, timestamp, rotation)?;
        }

        let clip_end = clocks.values().copied().max().unwrap_or(0);
        Ok(clip
            .total_time_ms
            .max(clip_end)
            .max(last_timestamp.saturating_add(1)))
    }
}

/// Split the play frequency of stand slots between idling and fidgeting and chain them.
///
/// Idle and fidget shares always add up to [`PLAY_FREQUENCY_TOTAL`]. Every
/// stand-type animation links to the next one, the last back to the first.
pub fn rebalance_stand_frequencies(
    animations: &mut [ModelAnimation],
    roles: &[SlotRole],
    fidget_time_percent: u8,
) {
    let with_role = |wanted: SlotRole| -> Vec<usize> {
        roles
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == wanted)
            .map(|(index, _)| index)
            .collect()
    };
    let idle = with_role(SlotRole::Idle);
    let fidget = with_role(SlotRole::Fidget);

    let (idle_total, fidget_total) = if fidget.is_empty() {
        (PLAY_FREQUENCY_TOTAL, 0)
    } else if idle.is_empty() {
        (0, PLAY_FREQUENCY_TOTAL)
    } else {
        let fidget_share = (u32::from(PLAY_FREQUENCY_TOTAL)
            * u32::from(fidget_time_percent.min(100))
            / 100) as u16;
        (PLAY_FREQUENCY_TOTAL - fidget_share, fidget_share)
    };
    split_frequency(animations, &idle, idle_total);
    split_frequency(animations, &fidget, fidget_total);

    let mut chain: Vec<usize> = idle.iter().chain(fidget.iter()).copied().collect();
    chain.sort_unstable();
    for (position, &index) in chain.iter().enumerate() {
        let animation = &mut animations[index];
        animation.sub_animation_id = position as u16;
        animation.next_animation = if chain.len() > 1 {
            chain[(position + 1) % chain.len()] as i16
        } else {
            -1
        };
    }
}

fn split_frequency(animations: &mut [ModelAnimation], indices: &[usize], total: u16) {
    if indices.is_empty() {
        return;
    }
    let count = indices.len() as u16;
    let share = total / count;
    let remainder = total - share * count;
    for (position, &index) in indices.iter().enumerate() {
        animations[index].play_frequency = if position == 0 {
            share + remainder
        } else {
            share
        };
    }
}
