//! Geometry, skeleton and lookup invariants of the full pipeline

use eqwow_model::model::{AnimationType, ObjectModel};
use eqwow_model::source::SourceAnimationType;
use eqwow_model::{
    ConversionConfig, ConversionContext, ConversionError, ObjectClass, ObjectProperties,
};
use glam::Vec3;
use pretty_assertions::assert_eq;

use crate::common::{
    creature_object, init_logging, material, quad_mesh, static_object, unit_config,
};

fn load(properties: ObjectProperties, source: eqwow_model::SourceObject) -> ObjectModel {
    init_logging();
    let context = ConversionContext::new(unit_config());
    let name = source.name.clone();
    let mut model = ObjectModel::new(&name, properties);
    model.load(source, &context).unwrap();
    model
}

#[test]
fn test_mismatched_geometry_leaves_model_unloaded() {
    let mut source = static_object("crate", quad_mesh(), vec![material(0, "wood", &["wood"], 0)]);
    source.mesh.normals.pop();

    let context = ConversionContext::new(ConversionConfig::default());
    let mut model = ObjectModel::new("crate", ObjectProperties::default());
    let result = model.load(source, &context);

    assert!(matches!(
        result,
        Err(ConversionError::GeometryMismatch {
            positions: 4,
            normals: 3,
            texture_coordinates: 4,
            ..
        })
    ));
    assert!(!model.is_loaded);
    assert!(model.vertices.is_empty());
}

#[test]
fn test_loading_twice_is_rejected() {
    let source = static_object("crate", quad_mesh(), vec![material(0, "wood", &["wood"], 0)]);
    let context = ConversionContext::new(ConversionConfig::default());
    let mut model = ObjectModel::new("crate", ObjectProperties::default());

    model.load(source.clone(), &context).unwrap();
    assert!(model.is_loaded);
    let vertex_count = model.vertices.len();

    let result = model.load(source, &context);
    assert!(matches!(result, Err(ConversionError::AlreadyLoaded(name)) if name == "crate"));
    assert!(model.is_loaded);
    assert_eq!(model.vertices.len(), vertex_count);
}

#[test]
fn test_vertex_bones_shift_past_main() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature),
        creature_object(&[("stand", SourceAnimationType::P01StandPassive)]),
    );

    assert!(model.is_skeletal);
    assert_eq!(model.bones[0].name, "main");
    assert_eq!(model.bones[0].parent_bone, -1);
    let bones: Vec<u16> = model.vertices.iter().map(|v| v.bone_index()).collect();
    assert_eq!(bones, vec![1, 2, 3, 3]);
    assert_eq!(model.bones[2].name, "pe");
    assert_eq!(model.bones[2].parent_bone, 1);
    assert_eq!(model.bones[3].parent_bone, 2);
}

#[test]
fn test_looping_tracks_close_on_first_value() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature),
        creature_object(&[("stand", SourceAnimationType::P01StandPassive)]),
    );
    let stand = &model.animations[0];
    assert!(stand.looping);
    assert_eq!(stand.duration_ms, 200);

    let pelvis = &model.bones[model.bone_index("pe").unwrap()];
    let keys = pelvis.translation.sequence(0).unwrap();
    assert_eq!(keys.timestamps, vec![0, 100, 200]);
    assert_eq!(keys.values[2], keys.values[0]);
}

#[test]
fn test_one_shot_tracks_hold_last_value() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature),
        creature_object(&[
            ("stand", SourceAnimationType::P01StandPassive),
            ("death", SourceAnimationType::D05Death),
        ]),
    );
    let death = model
        .animations
        .iter()
        .position(|a| a.animation_type == AnimationType::Death)
        .unwrap();
    assert!(!model.animations[death].looping);

    let pelvis = &model.bones[model.bone_index("pe").unwrap()];
    let keys = pelvis.translation.sequence(death).unwrap();
    assert_eq!(keys.timestamps.last(), Some(&200));
    assert_eq!(keys.values[2], keys.values[1]);
    assert_eq!(keys.values[2], Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_root_never_moves() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature),
        creature_object(&[("walk", SourceAnimationType::L01Walk)]),
    );
    let root = &model.bones[model.bone_index("root").unwrap()];
    let keys = root.translation.sequence(0).unwrap();
    assert_eq!(keys.values, vec![Vec3::ZERO]);
}

#[test]
fn test_lift_applies_to_children_of_root_only() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature).with_skeleton_lift_height(0.5),
        creature_object(&[("stand", SourceAnimationType::P01StandPassive)]),
    );
    let pelvis = &model.bones[model.bone_index("pe").unwrap()];
    let head = &model.bones[model.bone_index("he").unwrap()];
    assert_eq!(pelvis.translation.first_value(), Some(&Vec3::new(0.0, 0.0, 1.5)));
    assert_eq!(head.translation.first_value(), Some(&Vec3::new(0.0, 0.0, 0.5)));
}

#[test]
fn test_bone_lookups_are_deterministic() {
    let source = creature_object(&[("stand", SourceAnimationType::P01StandPassive)]);
    let first = load(ObjectProperties::new(ObjectClass::Creature), source.clone());
    let second = load(ObjectProperties::new(ObjectClass::Creature), source);

    assert_eq!(first.bone_lookups, second.bone_lookups);
    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.bone_lookups[&0], vec![1, 2, 3]);
    let local: Vec<u16> = first
        .vertices
        .iter()
        .map(|v| v.bone_lookup_indices[0])
        .collect();
    assert_eq!(local, vec![0, 1, 2, 2]);
}

#[test]
fn test_empty_skeleton_falls_back_to_single_bone() {
    let mut source = creature_object(&[("stand", SourceAnimationType::P01StandPassive)]);
    if let Some(skeleton) = source.skeleton.as_mut() {
        skeleton.bones.clear();
    }
    let model = load(ObjectProperties::new(ObjectClass::Creature), source);

    assert!(model.is_loaded);
    assert!(!model.is_skeletal);
    assert_eq!(model.bones.len(), 1);
    assert_eq!(model.animations.len(), 1);
    assert_eq!(model.animations[0].animation_type, AnimationType::Stand);
    assert_eq!(model.animation_lookups, vec![0]);
    assert_eq!(model.key_bone_lookups, vec![-1; 27]);
    assert!(model.vertices.iter().all(|v| v.bone_index() == 0));
    assert_eq!(model.portrait_camera, None);
}

#[test]
fn test_clip_with_unknown_bone_falls_back() {
    let mut source = creature_object(&[("stand", SourceAnimationType::P01StandPassive)]);
    if let Some(clip) = source.animations.get_mut("stand") {
        clip.frames[0].bone_name = "tail".to_string();
    }
    let model = load(ObjectProperties::new(ObjectClass::Creature), source);

    assert!(model.is_loaded);
    assert!(!model.is_skeletal);
    assert_eq!(model.bones.len(), 1);
}

#[test]
fn test_key_bones_resolved() {
    let model = load(
        ObjectProperties::new(ObjectClass::Creature),
        creature_object(&[("stand", SourceAnimationType::P01StandPassive)]),
    );
    let he = model.bone_index("he").unwrap() as i16;
    let root = model.bone_index("root").unwrap() as i16;
    assert_eq!(model.key_bone_lookups.len(), 27);
    assert_eq!(model.key_bone_lookups[6], he);
    assert_eq!(model.key_bone_lookups[7], he);
    assert_eq!(model.key_bone_lookups[26], root);
    assert_eq!(model.events.len(), 6);
    assert!(model.attachments.is_empty());
}

#[test]
fn test_texture_edges_corrected_after_v_flip() {
    let model = load(
        ObjectProperties::default(),
        static_object("crate", quad_mesh(), vec![material(0, "wood", &["wood"], 0)]),
    );

    let half = 0.5 / 64.0;
    let coordinates: Vec<(f32, f32)> = model
        .vertices
        .iter()
        .map(|v| (v.texture_coordinates[0].x, v.texture_coordinates[0].y))
        .collect();
    assert_eq!(
        coordinates,
        vec![
            (half, half),
            (1.0 - half, half),
            (half, -1.0 + half),
            (1.0 - half, -1.0 + half),
        ]
    );
}

#[test]
fn test_out_of_range_bone_index_binds_to_main() {
    let mut source = creature_object(&[("stand", SourceAnimationType::P01StandPassive)]);
    source.mesh.bone_indices = vec![0, 0, 0, u16::MAX];

    let model = load(ObjectProperties::new(ObjectClass::Creature), source);

    assert!(model.is_skeletal);
    let bones: Vec<u16> = model.vertices.iter().map(|v| v.bone_indices[0]).collect();
    assert_eq!(bones, vec![1, 1, 1, 0]);
}
