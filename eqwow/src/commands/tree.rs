//! Tree view of a converted model

use std::path::Path;

use anyhow::{Context, Result};
use eqwow_model::{BoundingBox, ObjectModel};

use super::convert::{load_context, load_object, load_properties};
use crate::cli::TreeArgs;
use crate::utils::{NodeType, TreeNode, TreeOptions, render_tree};

const TEXTURE_EXTENSIONS: [&str; 3] = ["blp", "png", "bmp"];

pub fn execute(args: TreeArgs) -> Result<()> {
    let context = load_context(&args.source)?;
    let properties = load_properties(&args.source)?;
    let object = load_object(&args.input, &properties)?;
    let model = context
        .convert(&object.name, object.properties, object.source)
        .with_context(|| format!("Failed to convert '{}'", object.name))?;

    let root = model_tree(&model, args.textures.as_deref());
    let options = TreeOptions {
        max_depth: args.depth,
        no_color: args.no_color,
        show_metadata: !args.no_metadata,
        compact: args.compact,
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn format_box(bounds: &BoundingBox) -> String {
    format!(
        "({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    )
}

fn texture_exists(dir: &Path, name: &str) -> bool {
    dir.join(name).is_file()
        || TEXTURE_EXTENSIONS
            .iter()
            .any(|ext| dir.join(format!("{name}.{ext}")).is_file())
}

/// Summarize a converted model as a renderable tree
pub fn model_tree(model: &ObjectModel, textures: Option<&Path>) -> TreeNode {
    let geometry = TreeNode::new("Geometry", NodeType::Header)
        .with_metadata("vertices", model.vertices.len())
        .with_metadata("triangles", model.triangles.len())
        .with_metadata("geometry_box", format_box(&model.geometry_box))
        .with_metadata("visibility_box", format_box(&model.visibility_box))
        .with_metadata("bounding_radius", format!("{:.3}", model.bounding_radius));

    let materials = model.materials.iter().map(|material| {
        let mut node = TreeNode::new(
            format!("[{}] {}", material.index, material.name),
            NodeType::Material,
        )
        .with_metadata("type", format!("{:?}", material.material_type))
        .with_metadata("blend", format!("{:?}", material.blend_mode))
        .with_metadata("flags", format!("{:?}", material.render_flags));
        if let Some(frame) = material.animation_frame {
            node = node.with_metadata("frame", frame);
        }
        if !material.texture_name.is_empty() {
            let exists = textures.map(|dir| texture_exists(dir, &material.texture_name));
            node = node.with_texture(&material.texture_name, exists);
        }
        node
    });

    let bones = model.bones.iter().enumerate().map(|(index, bone)| {
        let mut node = TreeNode::new(format!("[{index}] {}", bone.name), NodeType::Bone)
            .with_metadata("parent", bone.parent_bone)
            .with_metadata("sequences", bone.sequence_count());
        if let Some(key_bone) = bone.key_bone {
            node = node.with_metadata("key_bone", format!("{key_bone:?}"));
        }
        node
    });

    let animations = model.animations.iter().enumerate().map(|(index, animation)| {
        let mut node = TreeNode::new(
            format!(
                "[{index}] {}.{}",
                animation.animation_type.name(),
                animation.sub_animation_id
            ),
            NodeType::Animation,
        )
        .with_metadata("duration_ms", animation.duration_ms)
        .with_metadata("frequency", animation.play_frequency)
        .with_metadata("looping", animation.looping)
        .with_metadata("next", animation.next_animation);
        if let Some(source) = &animation.source_name {
            node = node.with_metadata("source", source);
        }
        node
    });

    let collision = TreeNode::new("Collision", NodeType::Collision)
        .with_metadata("vertices", model.collision.positions.len())
        .with_metadata("triangles", model.collision.triangles.len())
        .with_metadata("bounds", format_box(&model.collision.bounding_box))
        .with_metadata("radius", format!("{:.3}", model.collision.sphere_radius));

    let mut root = TreeNode::new(model.name.clone(), NodeType::Root)
        .with_metadata("class", format!("{:?}", model.class()))
        .with_metadata("skeletal", model.is_skeletal)
        .add_child(geometry)
        .add_child(TreeNode::new("Materials", NodeType::Table).with_children(materials))
        .add_child(TreeNode::new("Bones", NodeType::Table).with_children(bones))
        .add_child(TreeNode::new("Animations", NodeType::Table).with_children(animations))
        .add_child(
            TreeNode::new("Global loops", NodeType::Table)
                .with_count(model.global_loop_sequence_limits.len())
                .with_metadata(
                    "limits_ms",
                    format!("{:?}", model.global_loop_sequence_limits),
                ),
        )
        .add_child(collision);

    if let Some(camera) = &model.portrait_camera {
        root = root.add_child(
            TreeNode::new("Portrait camera", NodeType::Property)
                .with_metadata("position", format!("{:.3}", camera.position))
                .with_metadata("target", format!("{:.3}", camera.target)),
        );
    }
    root
}
