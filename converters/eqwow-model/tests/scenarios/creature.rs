//! Skeletal creatures

use eqwow_model::model::{AnimationType, ObjectModel, PLAY_FREQUENCY_TOTAL};
use eqwow_model::source::SourceAnimationType;
use eqwow_model::{ConversionContext, ObjectClass, ObjectProperties, PortraitCameraOffsets};
use glam::Vec3;
use pretty_assertions::assert_eq;

use crate::common::{creature_object, init_logging, unit_config};

fn convert(properties: ObjectProperties, clips: &[(&str, SourceAnimationType)]) -> ObjectModel {
    init_logging();
    let context = ConversionContext::new(unit_config());
    let mut model = ObjectModel::new("orc", properties);
    model.load(creature_object(clips), &context).unwrap();
    model
}

#[test]
fn test_stand_and_walk_only() {
    let model = convert(
        ObjectProperties::new(ObjectClass::Creature),
        &[
            ("stand", SourceAnimationType::P01StandPassive),
            ("walk", SourceAnimationType::L01Walk),
        ],
    );

    let stands: Vec<_> = model.animations_of(AnimationType::Stand).collect();
    assert_eq!(stands.len(), 2);
    assert!(
        stands
            .iter()
            .all(|a| a.source_name.as_deref() == Some("stand"))
    );
    assert_eq!(model.animations_of(AnimationType::Walk).count(), 1);
    for empty in [
        AnimationType::AttackUnarmed,
        AnimationType::Run,
        AnimationType::Swim,
        AnimationType::Death,
    ] {
        assert_eq!(model.animations_of(empty).count(), 0, "{}", empty.name());
    }

    // Idle share only, since there is no fidget clip
    let frequencies: Vec<u16> = stands.iter().map(|a| a.play_frequency).collect();
    assert_eq!(frequencies.iter().sum::<u16>(), PLAY_FREQUENCY_TOTAL);
    assert_eq!(stands[0].next_animation, 1);
    assert_eq!(stands[1].next_animation, 0);

    assert_eq!(model.animation_lookups[AnimationType::Stand.id() as usize], 0);
    assert_eq!(model.animation_lookups[AnimationType::Walk.id() as usize], 2);
    assert_eq!(
        model
            .animation_lookups
            .get(AnimationType::Run.id() as usize)
            .copied()
            .unwrap_or(-1),
        -1
    );
}

#[test]
fn test_every_bone_has_a_sequence_per_animation() {
    let model = convert(
        ObjectProperties::new(ObjectClass::Creature),
        &[
            ("stand", SourceAnimationType::P01StandPassive),
            ("walk", SourceAnimationType::L01Walk),
            ("run", SourceAnimationType::L02Run),
        ],
    );
    assert_eq!(model.animations.len(), 4);
    for bone in &model.bones {
        assert_eq!(bone.sequence_count(), model.animations.len(), "{}", bone.name);
    }
}

#[test]
fn test_portrait_camera_sits_at_head() {
    let offsets = PortraitCameraOffsets {
        position: Vec3::new(1.0, 0.0, 0.0),
        target: Vec3::ZERO,
    };
    let model = convert(
        ObjectProperties::new(ObjectClass::Creature).with_portrait_camera(offsets),
        &[("stand", SourceAnimationType::P01StandPassive)],
    );

    // he (0, 0, 0.5) under pe (0, 0, 1) under a still root
    let camera = model.portrait_camera.unwrap();
    assert!(camera.target.abs_diff_eq(Vec3::new(0.0, 0.0, 1.5), 1e-4));
    assert!(camera.position.abs_diff_eq(Vec3::new(1.0, 0.0, 1.5), 1e-4));
}

#[test]
fn test_equipment_gets_attachments() {
    let model = convert(
        ObjectProperties::new(ObjectClass::EquipmentHeld),
        &[("stand", SourceAnimationType::P01StandPassive)],
    );
    assert_eq!(model.attachments.len(), 3);
    for attachment in &model.attachments {
        let bone = &model.bones[attachment.bone as usize];
        assert_eq!(bone.parent_bone as usize, model.bone_index("root").unwrap());
    }
}

#[test]
fn test_skeletal_collision_is_posed() {
    let model = convert(
        ObjectProperties::new(ObjectClass::Creature),
        &[("stand", SourceAnimationType::P01StandPassive)],
    );
    // Vertices bound to pe and he are lifted by their bone's first Stand translation
    assert_eq!(model.collision.triangles.len(), 2);
    let top = model.collision.bounding_box.max.z;
    assert!(top > 1.0);
}
