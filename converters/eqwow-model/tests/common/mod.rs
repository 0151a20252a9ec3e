//! Source objects shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;

use eqwow_model::source::{
    BoneFrame, SourceAnimation, SourceAnimationType, SourceBone, SourceMaterial, SourceMesh,
    SourceObject, SourceSkeleton,
};
use eqwow_model::{ConversionConfig, TriangleFace};
use glam::{Quat, Vec2, Vec3};

/// Route engine logs to the test harness; set `RUST_LOG` to see them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config with unit scales so expected positions can be read off the source
pub fn unit_config() -> ConversionConfig {
    ConversionConfig {
        world_scale: 1.0,
        creature_scale: 1.0,
        equipment_scale: 1.0,
        collision_boundary_padding: 0.0,
        ..Default::default()
    }
}

pub fn material(index: u32, name: &str, textures: &[&str], delay_ms: u32) -> SourceMaterial {
    SourceMaterial {
        index,
        name: name.to_string(),
        unique_name: format!("obj_{name}"),
        texture_names: textures.iter().map(|t| (*t).to_string()).collect(),
        animation_delay_ms: delay_ms,
        texture_width: 64,
        texture_height: 64,
        ..Default::default()
    }
}

/// Axis-aligned box from `min` to `max`, two triangles per face, all on `material_index`
pub fn box_mesh(min: Vec3, max: Vec3, material_index: u32) -> SourceMesh {
    let positions: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        })
        .collect();
    let faces: [[u32; 4]; 6] = [
        [0, 1, 3, 2],
        [4, 6, 7, 5],
        [0, 4, 5, 1],
        [2, 3, 7, 6],
        [0, 2, 6, 4],
        [1, 5, 7, 3],
    ];
    let triangles = faces
        .iter()
        .flat_map(|[a, b, c, d]| {
            [
                TriangleFace::new(material_index, *a, *b, *c),
                TriangleFace::new(material_index, *a, *c, *d),
            ]
        })
        .collect();
    SourceMesh {
        normals: positions.iter().map(|p| p.normalize_or_zero()).collect(),
        texture_coordinates: (0..8)
            .map(|i| Vec2::new((i & 1) as f32, ((i >> 1) & 1) as f32))
            .collect(),
        positions,
        triangles,
        bone_indices: Vec::new(),
        animated_vertex_frames: Vec::new(),
    }
}

/// Single quad on material 0, vertices used in order
pub fn quad_mesh() -> SourceMesh {
    SourceMesh {
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ],
        normals: vec![Vec3::Y; 4],
        texture_coordinates: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ],
        triangles: vec![TriangleFace::new(0, 0, 1, 2), TriangleFace::new(0, 1, 3, 2)],
        bone_indices: Vec::new(),
        animated_vertex_frames: Vec::new(),
    }
}

pub fn static_object(name: &str, mesh: SourceMesh, materials: Vec<SourceMaterial>) -> SourceObject {
    SourceObject {
        name: name.to_string(),
        materials,
        mesh,
        ..Default::default()
    }
}

fn bone(name: &str, children: &[i32]) -> SourceBone {
    SourceBone {
        name: name.to_string(),
        children: children.to_vec(),
        mesh_name: None,
    }
}

/// Two 100 ms frames per bone
pub fn clip(animation_type: SourceAnimationType, poses: &[(&str, Vec3, Vec3)]) -> SourceAnimation {
    let frames = poses
        .iter()
        .flat_map(|(bone_name, first, second)| {
            [*first, *second].map(|translation| BoneFrame {
                bone_name: (*bone_name).to_string(),
                translation,
                rotation: Quat::IDENTITY,
                scale: 1.0,
                frame_ms: 100,
            })
        })
        .collect();
    SourceAnimation {
        animation_type,
        frame_count: 2,
        total_time_ms: 200,
        frames,
    }
}

/// root -> pe -> he, mesh vertices bound to root, pe, he, he
pub fn creature_object(clip_types: &[(&str, SourceAnimationType)]) -> SourceObject {
    let mut mesh = quad_mesh();
    mesh.bone_indices = vec![0, 1, 2, 2];

    let animations: BTreeMap<String, SourceAnimation> = clip_types
        .iter()
        .map(|(name, animation_type)| {
            (
                (*name).to_string(),
                clip(
                    *animation_type,
                    &[
                        ("root", Vec3::ZERO, Vec3::ZERO),
                        ("pe", Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0)),
                        ("he", Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.1, 0.5)),
                    ],
                ),
            )
        })
        .collect();

    SourceObject {
        name: "orc".to_string(),
        materials: vec![material(0, "orcskin", &["orcskin01"], 0)],
        mesh,
        skeleton: Some(SourceSkeleton {
            bones: vec![bone("root", &[1]), bone("pe", &[2]), bone("he", &[])],
        }),
        animations,
        collision: None,
    }
}
