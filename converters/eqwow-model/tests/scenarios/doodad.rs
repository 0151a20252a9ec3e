//! Static doodads: active doodads, animated materials and collision

use eqwow_model::model::{AnimationType, ObjectModel};
use eqwow_model::source::{MaterialType, SourceCollision};
use eqwow_model::{
    BoundingBox, ConversionContext, ConversionError, CustomCollisionType, ObjectClass,
    ObjectProperties, TriangleFace,
};
use glam::Vec3;
use pretty_assertions::assert_eq;

use crate::common::{box_mesh, init_logging, material, quad_mesh, static_object, unit_config};

fn convert(properties: ObjectProperties, source: eqwow_model::SourceObject) -> ObjectModel {
    init_logging();
    let context = ConversionContext::new(unit_config());
    let name = source.name.clone();
    let mut model = ObjectModel::new(&name, properties);
    model.load(source, &context).unwrap();
    model
}

#[test]
fn test_slide_up_door() {
    let source = static_object(
        "door",
        box_mesh(Vec3::new(-0.5, -0.1, 0.0), Vec3::new(0.5, 0.1, 2.0), 0),
        vec![material(0, "door", &["door"], 0)],
    );
    let model = convert(
        ObjectProperties::new(ObjectClass::StaticDoodad).with_active_doodad("OnActivateSlideUp", 1000),
        source,
    );

    let types: Vec<AnimationType> = model.animations.iter().map(|a| a.animation_type).collect();
    assert_eq!(
        types,
        vec![
            AnimationType::Open,
            AnimationType::Opened,
            AnimationType::Close,
            AnimationType::Closed,
            AnimationType::Stand,
        ]
    );
    assert_eq!(model.bones.len(), 1);

    let translation = &model.bones[0].translation;
    let open = translation.sequence(0).unwrap();
    assert_eq!(open.timestamps, vec![0, 1000]);
    assert_eq!(open.values, vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)]);
    let close = translation.sequence(2).unwrap();
    assert_eq!(close.timestamps, vec![0, 1000]);
    assert_eq!(close.values, vec![Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO]);
}

#[test]
fn test_unknown_active_doodad_is_fatal() {
    let source = static_object("door", quad_mesh(), vec![material(0, "door", &["door"], 0)]);
    let context = ConversionContext::new(unit_config());
    let mut model = ObjectModel::new(
        "door",
        ObjectProperties::new(ObjectClass::StaticDoodad).with_active_doodad("OnActivateTeleport", 500),
    );
    let result = model.load(source, &context);
    assert!(matches!(result, Err(ConversionError::UnsupportedActiveDoodad(_))));
    assert!(!model.is_loaded);
}

#[test]
fn test_animated_material_frames() {
    let source = static_object(
        "torch",
        quad_mesh(),
        vec![material(0, "fire", &["fire1", "fire2", "fire3"], 200)],
    );
    let model = convert(ObjectProperties::default(), source);

    assert_eq!(model.materials.len(), 3);
    assert_eq!(model.global_loop_sequence_limits, vec![600]);
    assert_eq!(model.vertices.len(), 12);
    assert_eq!(model.triangles.len(), 6);

    for frame in 1..3u32 {
        let offset = frame as usize * 4;
        for i in 0..4 {
            let original = &model.vertices[i];
            let copy = &model.vertices[offset + i];
            assert_eq!(copy.position, original.position);
            assert_eq!(copy.normal, original.normal);
            assert_eq!(copy.texture_coordinates, original.texture_coordinates);
        }
        for t in 0..2 {
            let original = model.triangles[t];
            let copy = model.triangles[frame as usize * 2 + t];
            assert_eq!(copy.material_index, frame);
            assert_eq!(copy.indices().map(|i| i - offset as u32), original.indices());
        }
        let track = &model.transparency[&frame];
        assert_eq!(track.global_sequence, Some(0));
    }
}

#[test]
fn test_animated_material_with_one_texture_is_fatal() {
    let source = static_object("torch", quad_mesh(), vec![material(0, "fire", &["fire1"], 200)]);
    let context = ConversionContext::new(unit_config());
    let mut model = ObjectModel::new("torch", ObjectProperties::default());
    let result = model.load(source, &context);
    assert!(matches!(
        result,
        Err(ConversionError::AnimatedMaterialTooFewTextures { texture_count: 1, .. })
    ));
    assert!(!model.is_loaded);
}

#[test]
fn test_ladder_replaces_collision() {
    let mut source = static_object(
        "ladder",
        box_mesh(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 4.0), 0),
        vec![material(0, "rungs", &["rungs"], 0)],
    );
    source.collision = Some(SourceCollision {
        positions: vec![Vec3::splat(50.0), Vec3::splat(51.0), Vec3::new(50.0, 51.0, 50.0)],
        triangles: vec![TriangleFace::new(0, 0, 1, 2)],
    });
    let model = convert(
        ObjectProperties::new(ObjectClass::StaticDoodad).with_custom_collision(CustomCollisionType::Ladder),
        source,
    );

    assert!(!model.collision.is_empty());
    assert!(model.collision.positions.iter().all(|p| p.z <= 4.0));
    assert_eq!(
        model.collision.bounding_box,
        BoundingBox::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 4.0))
    );
    assert_eq!(model.collision.face_normals.len(), model.collision.triangles.len());
}

#[test]
fn test_supplied_collision_used_as_is() {
    let mut source = static_object("rock", quad_mesh(), vec![material(0, "rock", &["rock"], 0)]);
    source.collision = Some(SourceCollision {
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        triangles: vec![TriangleFace::new(0, 0, 1, 2)],
    });
    let model = convert(ObjectProperties::default(), source);
    assert_eq!(model.collision.triangles.len(), 1);
    // Rotated a half turn about Z with the render mesh
    assert!(model.collision.positions.contains(&Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn test_derived_collision_skips_transparent_faces() {
    let mut mesh = box_mesh(Vec3::ZERO, Vec3::ONE, 0);
    for triangle in mesh.triangles.iter_mut().skip(4) {
        triangle.material_index = 1;
    }
    let mut glass = material(1, "glass", &["glass"], 0);
    glass.material_type = MaterialType::Transparent50Percent;
    let source = static_object("cabinet", mesh, vec![material(0, "wood", &["wood"], 0), glass]);

    let model = convert(ObjectProperties::default(), source);
    assert_eq!(model.triangles.len(), 12);
    assert_eq!(model.collision.triangles.len(), 4);
    assert!(model.collision.triangles.iter().all(|t| t.material_index == 0));
}

#[test]
fn test_disabled_collision() {
    let source = static_object("rug", quad_mesh(), vec![material(0, "rug", &["rug"], 0)]);
    let properties = ObjectProperties {
        disable_collision: true,
        ..ObjectProperties::new(ObjectClass::StaticDoodad)
    };
    let model = convert(properties, source);
    assert!(model.collision.is_empty());
}

#[test]
fn test_static_visibility_box_has_minimum_size() {
    let source = static_object("pebble", quad_mesh(), vec![material(0, "rock", &["rock"], 0)]);
    let model = convert(ObjectProperties::default(), source);

    let extent = model.visibility_box.extent();
    assert!(extent.min_element() >= 25.0);
    assert_eq!(model.geometry_box.extent(), Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(model.animations.len(), 1);
    assert_eq!(model.animations[0].bounding_box, model.visibility_box);
}
