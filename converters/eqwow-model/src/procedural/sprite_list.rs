//! Sprite-list effects: rings of camera-facing quads that spin, pulse and drift
//!
//! Every sprite gets a chain of three bones under `main`:
//!
//! 1. a base bone fixing the sprite's angle around the ring,
//! 2. a spin bone turning the whole ring in quarter-turn keys,
//! 3. a billboard bone carrying the quad, its radial pulse, drift and fade.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};
use log::{debug, error};

use crate::config::{SpinDirection, SpriteListSettings};
use crate::error::Result;
use crate::model::{AnimationType, BoneFlags, ModelAnimation, ModelBone, ModelVertex};
use crate::track::InterpolationType;

/// Add sprite bones and their tracks to an object that already has a Stand animation.
///
/// Does nothing but log when there is no Stand animation to fill.
pub fn generate_sprite_list(
    bones: &mut Vec<ModelBone>,
    animations: &mut [ModelAnimation],
    vertices: &mut [ModelVertex],
    settings: &SpriteListSettings,
    is_projectile: bool,
) -> Result<()> {
    let Some(stand) = animations
        .iter()
        .position(|a| a.animation_type == AnimationType::Stand)
    else {
        error!("Sprite list effect needs a Stand animation to attach to, skipping");
        return Ok(());
    };

    let sprite_count = settings.sprite_count.max(1);
    let duration = settings.effect_duration_ms.max(1);
    animations[stand].duration_ms = duration;

    let mut sprite_bones = Vec::with_capacity(sprite_count as usize);
    for sprite in 0..sprite_count {
        let angle = TAU * sprite as f32 / sprite_count as f32;

        let base_index = bones.len() as i16;
        let mut base = ModelBone::new(&format!("sprite{sprite}_base"), InterpolationType::None)
            .with_parent(0);
        let mut spin = ModelBone::new(&format!("sprite{sprite}_spin"), InterpolationType::Linear)
            .with_parent(base_index);
        let mut billboard =
            ModelBone::new(&format!("sprite{sprite}_sprite"), InterpolationType::Linear)
                .with_parent(base_index + 1)
                .with_flags(BoneFlags::SPHERICAL_BILLBOARD | BoneFlags::TRANSFORMED);
        for bone in [&mut base, &mut spin, &mut billboard] {
            for _ in 0..animations.len() {
                bone.add_sequence();
            }
        }

        base.rotation
            .add_rotation(stand, 0, Quat::from_rotation_z(angle))?;
        add_spin_keys(&mut spin, stand, duration, settings)?;

        let start = Vec3::new(settings.radius, 0.0, 0.0);
        let pulse = Vec3::new(
            settings.radius + settings.pulse_distance,
            0.0,
            settings.vertical_drift * 0.5,
        );
        let end = Vec3::new(settings.radius, 0.0, settings.vertical_drift);
        billboard.translation.add_value(stand, 0, start)?;
        billboard.translation.add_value(stand, duration / 2, pulse)?;
        billboard.translation.add_value(stand, duration, end)?;

        billboard.scale.add_value(stand, 0, Vec3::ONE)?;
        if !is_projectile {
            billboard.scale.add_value(stand, duration, Vec3::ZERO)?;
        }

        bones.push(base);
        bones.push(spin);
        sprite_bones.push(bones.len() as u16);
        bones.push(billboard);
    }

    let per_sprite = vertices.len().div_ceil(sprite_bones.len()).max(1);
    for (index, vertex) in vertices.iter_mut().enumerate() {
        let sprite = (index / per_sprite).min(sprite_bones.len() - 1);
        vertex.bone_indices[0] = sprite_bones[sprite];
    }

    debug!(
        "Generated {} sprites over {} ms ({} vertices per sprite)",
        sprite_count, duration, per_sprite
    );
    Ok(())
}

/// Quarter-turn rotation keys covering the configured number of rotations
fn add_spin_keys(
    spin: &mut ModelBone,
    sequence: usize,
    duration: u32,
    settings: &SpriteListSettings,
) -> Result<()> {
    // At most one key per millisecond so timestamps stay strictly increasing
    let quarter_turns =
        ((settings.rotations_per_duration.abs() * 4.0).round() as u32).min(duration);
    if quarter_turns == 0 {
        return spin.rotation.add_rotation(sequence, 0, Quat::IDENTITY);
    }

    // Target winding is mirrored, so clockwise runs through positive angles
    let direction = match settings.spin_direction {
        SpinDirection::Clockwise => 1.0,
        SpinDirection::Counterclockwise => -1.0,
    };
    let spacing = duration / quarter_turns;
    for turn in 0..=quarter_turns {
        let timestamp = if turn == quarter_turns {
            duration
        } else {
            spacing * turn
        };
        let angle = direction * FRAC_PI_2 * turn as f32;
        spin.rotation
            .add_rotation(sequence, timestamp, Quat::from_rotation_z(angle))?;
    }
    Ok(())
}
