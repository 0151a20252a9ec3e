//! Collision geometry
//!
//! Collision is either handed over by the ingestor, derived from the solid
//! part of the render mesh, or synthesized for special shapes such as ladders.

use std::collections::BTreeMap;

use glam::Vec3;
use log::trace;

use crate::common::{BoundingBox, TriangleFace};
use crate::model::{CollisionMesh, ModelBone, ModelMaterial, ModelVertex};

/// Fraction of the X extent the ladder side walls are pulled in on each side
const LADDER_WALL_INSET: f32 = 0.2;

/// Vertex positions offset by the first translation key of each vertex's bone in `sequence`
pub fn pose_positions(vertices: &[ModelVertex], bones: &[ModelBone], sequence: usize) -> Vec<Vec3> {
    vertices
        .iter()
        .map(|vertex| {
            let offset = bones
                .get(vertex.bone_index() as usize)
                .and_then(|bone| bone.translation.sequence(sequence))
                .and_then(|keys| keys.first())
                .map_or(Vec3::ZERO, |(_, translation)| *translation);
            vertex.position + offset
        })
        .collect()
}

/// Keep triangles drawn with solid materials and never moved by vertex animation.
///
/// Duplicated frames of an animated texture are skipped so the surface is
/// only collided with once. Used vertices are compacted.
pub fn derive_from_geometry(
    positions: &[Vec3],
    triangles: &[TriangleFace],
    materials: &[ModelMaterial],
    animated_vertices: &[bool],
) -> (Vec<Vec3>, Vec<TriangleFace>) {
    let solid: BTreeMap<u32, bool> = materials
        .iter()
        .map(|m| {
            let duplicate_frame = m.animation_frame.is_some_and(|frame| frame > 0);
            (m.index, !m.has_transparency() && !duplicate_frame)
        })
        .collect();
    let is_animated = |index: u32| animated_vertices.get(index as usize).copied().unwrap_or(false);

    let mut remap: BTreeMap<u32, u32> = BTreeMap::new();
    let mut collision_positions = Vec::new();
    let mut collision_triangles = Vec::new();

    for triangle in triangles {
        if !solid.get(&triangle.material_index).copied().unwrap_or(false) {
            continue;
        }
        let indices = triangle.indices();
        if indices.iter().any(|&i| is_animated(i) || i as usize >= positions.len()) {
            continue;
        }
        let [v1, v2, v3] = indices.map(|index| {
            *remap.entry(index).or_insert_with(|| {
                collision_positions.push(positions[index as usize]);
                (collision_positions.len() - 1) as u32
            })
        });
        collision_triangles.push(TriangleFace::new(triangle.material_index, v1, v2, v3));
    }

    trace!(
        "Derived {} collision triangles from {} render triangles",
        collision_triangles.len(),
        triangles.len()
    );
    (collision_positions, collision_triangles)
}

fn push_quad(positions: &mut Vec<Vec3>, triangles: &mut Vec<TriangleFace>, corners: [Vec3; 4]) {
    let start = positions.len() as u32;
    positions.extend(corners);
    triangles.push(TriangleFace::new(0, start + 1, start, start + 3));
    triangles.push(TriangleFace::new(0, start + 1, start + 3, start + 2));
}

/// Climbable ladder volume inside `bounds`.
///
/// Every `step_distance` up the box, two ramps split from the centre line
/// and fall `extend_distance` toward the long sides, forming an upside-down V.
/// Four walls close the volume, with the short sides pulled inward.
pub fn ladder_collision(
    bounds: &BoundingBox,
    extend_distance: f32,
    step_distance: f32,
) -> (Vec<Vec3>, Vec<TriangleFace>) {
    let mut positions = Vec::new();
    let mut triangles = Vec::new();
    let (min, max) = (bounds.min, bounds.max);
    let mid_x = bounds.center().x;

    if step_distance > 0.0 {
        let step_count = ((max.z - min.z) / step_distance).floor() as usize + 1;
        for step in 0..step_count {
            let z = min.z + step as f32 * step_distance;
            let low_z = (z - extend_distance).max(min.z);
            push_quad(
                &mut positions,
                &mut triangles,
                [
                    Vec3::new(mid_x, max.y, z),
                    Vec3::new(mid_x, min.y, z),
                    Vec3::new(min.x, min.y, low_z),
                    Vec3::new(min.x, max.y, low_z),
                ],
            );
            push_quad(
                &mut positions,
                &mut triangles,
                [
                    Vec3::new(max.x, max.y, low_z),
                    Vec3::new(max.x, min.y, low_z),
                    Vec3::new(mid_x, min.y, z),
                    Vec3::new(mid_x, max.y, z),
                ],
            );
        }
    }

    let inset = (max.x - min.x) * LADDER_WALL_INSET;
    let (low_x, high_x) = (min.x + inset, max.x - inset);
    let walls = [
        [
            Vec3::new(high_x, min.y, max.z),
            Vec3::new(high_x, min.y, min.z),
            Vec3::new(low_x, min.y, min.z),
            Vec3::new(low_x, min.y, max.z),
        ],
        [
            Vec3::new(high_x, max.y, max.z),
            Vec3::new(low_x, max.y, max.z),
            Vec3::new(low_x, max.y, min.z),
            Vec3::new(high_x, max.y, min.z),
        ],
        [
            Vec3::new(high_x, max.y, max.z),
            Vec3::new(high_x, max.y, min.z),
            Vec3::new(high_x, min.y, min.z),
            Vec3::new(high_x, min.y, max.z),
        ],
        [
            Vec3::new(low_x, max.y, max.z),
            Vec3::new(low_x, min.y, max.z),
            Vec3::new(low_x, min.y, min.z),
            Vec3::new(low_x, max.y, min.z),
        ],
    ];
    for wall in walls {
        push_quad(&mut positions, &mut triangles, wall);
    }

    (positions, triangles)
}

/// Face normal of a triangle, with NaN components of degenerate faces zeroed
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let normal = (b - a).cross(c - a).normalize();
    Vec3::new(
        if normal.x.is_nan() { 0.0 } else { normal.x },
        if normal.y.is_nan() { 0.0 } else { normal.y },
        if normal.z.is_nan() { 0.0 } else { normal.z },
    )
}

/// Attach face normals and padded bounds to a collision point set
pub fn finalize_collision(
    positions: Vec<Vec3>,
    triangles: Vec<TriangleFace>,
    padding: f32,
) -> CollisionMesh {
    let face_normals = triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.indices().map(|i| positions.get(i as usize).copied().unwrap_or_default());
            face_normal(a, b, c)
        })
        .collect();
    let bounding_box = if positions.is_empty() {
        BoundingBox::default()
    } else {
        BoundingBox::from_points(positions.iter().copied()).padded(padding)
    };
    let sphere_radius = bounding_box.radius();

    CollisionMesh {
        positions,
        triangles,
        face_normals,
        bounding_box,
        sphere_radius,
    }
}
