//! Per-material bone lookup tables
//!
//! Skinned submeshes address bones through a small table of their own rather
//! than the model-wide bone array. Each vertex keeps its true bone index and
//! additionally records where that bone sits in its material's table.

use std::collections::BTreeMap;

use log::trace;

use crate::common::TriangleFace;
use crate::model::ModelVertex;

/// Material of the first triangle using each vertex
fn vertex_materials(vertex_count: usize, triangles: &[TriangleFace]) -> Vec<Option<u32>> {
    let mut materials = vec![None; vertex_count];
    for triangle in triangles {
        for index in triangle.indices() {
            if let Some(slot) = materials.get_mut(index as usize) {
                slot.get_or_insert(triangle.material_index);
            }
        }
    }
    materials
}

/// Build lookup tables keyed by material index and point every vertex into its table.
///
/// Vertices are expected sorted by material and then bone; the walk opens a
/// table the first time a material is seen and appends bones in order of
/// first appearance.
pub fn build_bone_lookups(
    vertices: &mut [ModelVertex],
    triangles: &[TriangleFace],
) -> BTreeMap<u32, Vec<u16>> {
    let materials = vertex_materials(vertices.len(), triangles);
    let mut lookups: BTreeMap<u32, Vec<u16>> = BTreeMap::new();

    for (index, vertex) in vertices.iter_mut().enumerate() {
        let Some(material) = materials[index] else {
            trace!("Vertex {index} is not used by any triangle, no bone lookup");
            vertex.bone_lookup_indices[0] = 0;
            continue;
        };
        let table = lookups.entry(material).or_default();
        let bone = vertex.bone_indices[0];
        let position = match table.iter().position(|&b| b == bone) {
            Some(position) => position,
            None => {
                table.push(bone);
                table.len() - 1
            }
        };
        vertex.bone_lookup_indices[0] = position as u16;
    }

    lookups
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    fn bound_vertices(bones: &[u16]) -> Vec<ModelVertex> {
        bones
            .iter()
            .map(|&bone| {
                let mut vertex = ModelVertex::new(Vec3::ZERO, Vec3::Z, Vec2::ZERO);
                vertex.bone_indices[0] = bone;
                vertex
            })
            .collect()
    }

    fn two_materials() -> Vec<TriangleFace> {
        vec![TriangleFace::new(0, 0, 1, 2), TriangleFace::new(1, 3, 4, 5)]
    }

    #[test]
    fn test_lookup_positions_are_local() {
        let mut vertices = bound_vertices(&[4, 4, 7, 7, 9, 9]);
        let lookups = build_bone_lookups(&mut vertices, &two_materials());

        assert_eq!(lookups[&0], vec![4, 7]);
        assert_eq!(lookups[&1], vec![7, 9]);
        let local: Vec<u16> = vertices.iter().map(|v| v.bone_lookup_indices[0]).collect();
        assert_eq!(local, vec![0, 0, 1, 0, 0, 1]);
        // True indices are untouched
        assert_eq!(vertices[4].bone_index(), 9);
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let mut first = bound_vertices(&[1, 2, 2, 3, 1, 3]);
        let mut second = first.clone();
        let a = build_bone_lookups(&mut first, &two_materials());
        let b = build_bone_lookups(&mut second, &two_materials());
        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unused_vertex_gets_no_table() {
        let mut vertices = bound_vertices(&[1, 1, 1, 5]);
        let lookups = build_bone_lookups(&mut vertices, &[TriangleFace::new(0, 0, 1, 2)]);
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[&0], vec![1]);
        assert_eq!(vertices[3].bone_lookup_indices[0], 0);
    }
}
