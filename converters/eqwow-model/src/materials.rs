//! Material conversion and animated texture expansion
//!
//! The target renderer has no notion of a texture chain. An animated material
//! with N textures becomes N single-texture materials drawn over N copies of
//! the original geometry, each visible only during its own time slice of a
//! shared global loop.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::common::TriangleFace;
use crate::config::ObjectProperties;
use crate::error::{ConversionError, Result};
use crate::model::ModelVertex;
use crate::model::material::{BlendMode, ModelMaterial, RenderFlags, static_transparency};
use crate::source::{MaterialType, SourceMaterial, SourceMesh};
use crate::track::{InterpolationType, Track};

/// Materials ready for rendering, with their transparency animation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandedMaterials {
    pub materials: Vec<ModelMaterial>,
    pub transparency: BTreeMap<u32, Track<i16>>,
    pub global_loop_sequence_limits: Vec<u32>,
}

/// Turn source materials into single-texture materials, duplicating geometry of animated ones.
///
/// Fails before touching `mesh` if any animated material has fewer than two textures.
pub fn expand_materials(
    source_materials: &[SourceMaterial],
    mesh: &mut SourceMesh,
    properties: &ObjectProperties,
) -> Result<ExpandedMaterials> {
    if let Some(bad) = source_materials
        .iter()
        .find(|m| m.is_animated() && m.frame_count() < 2)
    {
        return Err(ConversionError::AnimatedMaterialTooFewTextures {
            material: bad.name.clone(),
            texture_count: bad.frame_count(),
        });
    }

    let mut next_index = source_materials
        .iter()
        .map(|m| m.index + 1)
        .max()
        .unwrap_or(0);
    let mut expanded = ExpandedMaterials::default();

    for material in source_materials {
        if !material.is_animated() {
            if material.frame_count() > 1 {
                warn!(
                    "Material '{}' has {} textures but no frame delay, using the first",
                    material.name,
                    material.frame_count()
                );
            }
            let texture = material.texture_names.first().cloned().unwrap_or_default();
            let mut track = Track::new(InterpolationType::None);
            track.add_sequence();
            track.add_value_to_last_sequence(0, static_transparency(material.material_type))?;
            expanded.transparency.insert(material.index, track);
            expanded.materials.push(convert_material(
                material,
                material.index,
                &material.name,
                texture,
                None,
                properties,
            ));
            continue;
        }

        let frames = material.frame_count() as u32;
        let delay = material.animation_delay_ms;
        let global_sequence = expanded.global_loop_sequence_limits.len() as u16;
        expanded.global_loop_sequence_limits.push(frames * delay);

        let base_triangles: Vec<_> = mesh
            .triangles
            .iter()
            .copied()
            .filter(|t| t.material_index == material.index)
            .collect();
        let base_name = if material.unique_name.is_empty() {
            &material.name
        } else {
            &material.unique_name
        };

        for (frame, texture) in material.texture_names.iter().enumerate() {
            let frame = frame as u32;
            let index = if frame == 0 {
                material.index
            } else {
                let index = next_index;
                next_index += 1;
                duplicate_geometry(mesh, &base_triangles, index);
                index
            };

            let mut track = Track::new(InterpolationType::None);
            track.global_sequence = Some(global_sequence);
            track.add_sequence();
            let opaque = static_transparency(material.material_type);
            for slice in 0..frames {
                let value = if slice == frame { opaque } else { 0 };
                track.add_value_to_last_sequence(slice * delay, value)?;
            }
            expanded.transparency.insert(index, track);

            expanded.materials.push(convert_material(
                material,
                index,
                &format!("{base_name}Anim_{frame}"),
                texture.clone(),
                Some(frame),
                properties,
            ));
        }
        debug!(
            "Expanded animated material '{}' into {} frames over {} ms",
            material.name,
            frames,
            frames * delay
        );
    }

    Ok(expanded)
}

/// Append a copy of the vertices used by `triangles` plus matching triangles under `material_index`
fn duplicate_geometry(
    mesh: &mut SourceMesh,
    triangles: &[TriangleFace],
    material_index: u32,
) {
    let used: BTreeSet<u32> = triangles.iter().flat_map(|t| t.indices()).collect();
    if used.is_empty() {
        return;
    }
    let offset = mesh.positions.len() as u32;
    let remap: BTreeMap<u32, u32> = used
        .iter()
        .enumerate()
        .map(|(position, &index)| (index, offset + position as u32))
        .collect();
    let indices: Vec<usize> = used.iter().map(|&i| i as usize).collect();

    extend_with(&mut mesh.positions, &indices);
    extend_with(&mut mesh.normals, &indices);
    extend_with(&mut mesh.texture_coordinates, &indices);
    extend_with(&mut mesh.bone_indices, &indices);
    for frame in &mut mesh.animated_vertex_frames {
        extend_with(frame, &indices);
    }

    mesh.triangles.extend(triangles.iter().map(|t| {
        let [v1, v2, v3] = t.indices().map(|i| remap[&i]);
        TriangleFace::new(material_index, v1, v2, v3)
    }));
}

fn half_texel(value: f32, size: u32) -> f32 {
    if size == 0 {
        return value;
    }
    let half = 0.5 / size as f32;
    if value == 0.0 {
        half
    } else if value == 1.0 {
        1.0 - half
    } else if value == -1.0 {
        -1.0 + half
    } else {
        value
    }
}

/// Pull texture coordinates lying exactly on a texture edge inward by half a texel.
///
/// Each vertex is corrected once, using the material of the first triangle that uses it.
pub fn correct_texture_coordinates(
    vertices: &mut [ModelVertex],
    triangles: &[TriangleFace],
    materials: &[ModelMaterial],
) {
    let sizes: BTreeMap<u32, (u32, u32)> = materials
        .iter()
        .map(|m| (m.index, (m.texture_width, m.texture_height)))
        .collect();
    let mut corrected = vec![false; vertices.len()];

    for triangle in triangles {
        let Some(&(width, height)) = sizes.get(&triangle.material_index) else {
            continue;
        };
        for index in triangle.indices() {
            let index = index as usize;
            if index >= vertices.len() || corrected[index] {
                continue;
            }
            let uv = &mut vertices[index].texture_coordinates[0];
            uv.x = half_texel(uv.x, width);
            uv.y = half_texel(uv.y, height);
            corrected[index] = true;
        }
    }
}

/// Append clones of the elements at sorted `indices`; lists too short to hold them are left alone
fn extend_with<T: Clone>(values: &mut Vec<T>, indices: &[usize]) {
    if indices.last().is_some_and(|&last| last < values.len()) {
        let copies: Vec<T> = indices.iter().map(|&i| values[i].clone()).collect();
        values.extend(copies);
    }
}

fn convert_material(
    material: &SourceMaterial,
    index: u32,
    name: &str,
    texture_name: String,
    animation_frame: Option<u32>,
    properties: &ObjectProperties,
) -> ModelMaterial {
    let blend_mode = if properties
        .alpha_blend_materials
        .iter()
        .any(|n| n.eq_ignore_ascii_case(&material.name))
    {
        BlendMode::Alpha
    } else {
        BlendMode::from_material_type(material.material_type)
    };
    let always_bright = material.always_bright
        || properties
            .always_bright_materials
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&material.name));

    let mut render_flags = RenderFlags::DEPTH_TEST | RenderFlags::DEPTH_WRITE;
    if always_bright
        || matches!(
            material.material_type,
            MaterialType::TransparentAdditiveUnlit | MaterialType::TransparentAdditiveUnlitSkydome
        )
    {
        render_flags |= RenderFlags::UNLIT;
    }

    let tint = properties
        .tint_overrides
        .iter()
        .find(|tint| texture_name.contains(tint.texture_name_contains.as_str()))
        .map(|tint| tint.color);

    ModelMaterial {
        index,
        name: name.to_string(),
        material_type: material.material_type,
        texture_name,
        blend_mode,
        render_flags,
        always_bright,
        is_particle: material.is_particle,
        animation_frame,
        texture_width: material.texture_width,
        texture_height: material.texture_height,
        tint,
    }
}
