//! Spell effects built from sprite lists

use eqwow_model::model::{AnimationType, BoneFlags, ObjectModel};
use eqwow_model::source::SourceMesh;
use eqwow_model::{ConversionContext, ObjectClass, ObjectProperties, SpriteListSettings};
use glam::Vec3;
use pretty_assertions::assert_eq;

use crate::common::{init_logging, material, quad_mesh, static_object, unit_config};

/// Two sprite quads sharing one material
fn two_quads() -> SourceMesh {
    let mut mesh = quad_mesh();
    let second = quad_mesh();
    mesh.positions.extend(second.positions.iter().map(|p| *p + Vec3::Y));
    mesh.normals.extend(second.normals);
    mesh.texture_coordinates.extend(second.texture_coordinates);
    mesh.triangles
        .extend(second.triangles.iter().map(|t| t.offset(4)));
    mesh
}

fn settings() -> SpriteListSettings {
    SpriteListSettings {
        sprite_count: 2,
        radius: 1.0,
        rotations_per_duration: 1.0,
        pulse_distance: 0.5,
        vertical_drift: 2.0,
        effect_duration_ms: 2000,
        ..Default::default()
    }
}

fn convert(class: ObjectClass) -> ObjectModel {
    init_logging();
    let source = static_object("spark", two_quads(), vec![material(0, "spark", &["spark"], 0)]);
    let context = ConversionContext::new(unit_config());
    let mut model = ObjectModel::new(
        "spark",
        ObjectProperties::new(class).with_sprite_list(settings()),
    );
    model.load(source, &context).unwrap();
    model
}

#[test]
fn test_emitter_gets_three_bones_per_sprite() {
    let model = convert(ObjectClass::ParticleEmitter);

    assert_eq!(model.bones.len(), 7);
    assert_eq!(model.animations.len(), 1);
    assert_eq!(model.animations[0].animation_type, AnimationType::Stand);
    assert_eq!(model.animations[0].duration_ms, 2000);

    let billboards: Vec<usize> = model
        .bones
        .iter()
        .enumerate()
        .filter(|(_, b)| b.flags.contains(BoneFlags::SPHERICAL_BILLBOARD))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(billboards, vec![3, 6]);

    let bound: Vec<u16> = model.vertices.iter().map(|v| v.bone_index()).collect();
    assert_eq!(bound, vec![3, 3, 3, 3, 6, 6, 6, 6]);
    assert_eq!(model.bone_lookups[&0], vec![3, 6]);

    let drift = model.bones[3].translation.sequence(0).unwrap();
    assert_eq!(drift.timestamps, vec![0, 1000, 2000]);
    assert_eq!(drift.values[1], Vec3::new(1.5, 0.0, 1.0));
    assert_eq!(drift.values[2], Vec3::new(1.0, 0.0, 2.0));
}

#[test]
fn test_emitter_fades_out() {
    let model = convert(ObjectClass::ParticleEmitter);
    let scale = model.bones[3].scale.sequence(0).unwrap();
    assert_eq!(scale.values, vec![Vec3::ONE, Vec3::ZERO]);
}

#[test]
fn test_projectile_keeps_its_scale() {
    let model = convert(ObjectClass::SpellProjectile);
    let scale = model.bones[3].scale.sequence(0).unwrap();
    assert_eq!(scale.values, vec![Vec3::ONE]);
}

#[test]
fn test_effects_have_no_collision() {
    for class in [ObjectClass::ParticleEmitter, ObjectClass::SpellProjectile] {
        let model = convert(class);
        assert!(model.collision.is_empty());
        assert!(model.collision.positions.is_empty());
    }
}
