//! Conversion pipeline
//!
//! [`run`] drives a [`ModelBuilder`] through every stage in order:
//!
//! 1. validation and profile resolution ([`ModelBuilder::new`])
//! 2. geometry transformation
//! 3. material expansion
//! 4. render vertices and bounds
//! 5. skeleton and animations, or the static single-bone fallback
//! 6. procedural animations
//! 7. animation and bone lookups
//! 8. collision
//! 9. portrait camera
//!
//! The model under construction is owned by the builder and only handed out
//! by [`ModelBuilder::finish`], so a failing stage never leaves a half-built
//! model behind.

use log::{debug, error, trace, warn};

use crate::animation::AnimationSynthesizer;
use crate::bone_lookup::build_bone_lookups;
use crate::collision::{derive_from_geometry, finalize_collision, ladder_collision, pose_positions};
use crate::common::BoundingBox;
use crate::config::{ConversionConfig, CustomCollisionType, ObjectClass, ObjectProperties};
use crate::context::ConversionContext;
use crate::error::{ConversionError, Result};
use crate::materials::{correct_texture_coordinates, expand_materials};
use crate::model::animation::build_animation_lookups;
use crate::model::{AnimationType, ModelAnimation, ModelVertex, ObjectModel};
use crate::portrait::compute_portrait_camera;
use crate::procedural::{ActiveDoodadArchetype, generate_active_doodad, generate_sprite_list};
use crate::skeleton::{BuiltSkeleton, build_skeleton};
use crate::source::SourceObject;
use crate::transform::CoordinateTransformer;

/// Animation generated from configuration instead of source clips
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProceduralPlan {
    None,
    ActiveDoodad(ActiveDoodadArchetype),
    SpriteList { is_projectile: bool },
}

/// Where collision geometry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPlan {
    /// No collision at all
    Skip,
    /// Supplied collision, else derived from the render mesh
    FromSource,
    /// Synthesized ladder volume
    Ladder,
}

/// Class-dependent decisions, made once before any stage runs
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionProfile {
    pub class: ObjectClass,
    pub skeletal: bool,
    pub transformer: Option<CoordinateTransformer>,
    pub procedural: ProceduralPlan,
    pub collision: CollisionPlan,
    pub min_visibility_box_size: f32,
    pub with_attachments: bool,
}

impl ConversionProfile {
    /// Resolve how `source` will be converted.
    ///
    /// Fails on an unknown active doodad archetype.
    pub fn resolve(
        properties: &ObjectProperties,
        source: &SourceObject,
        config: &ConversionConfig,
    ) -> Result<Self> {
        let class = properties.class;
        let supports_skeleton = matches!(
            class,
            ObjectClass::Creature
                | ObjectClass::EquipmentHeld
                | ObjectClass::StaticDoodad
                | ObjectClass::Transport
        );
        let skeletal = supports_skeleton && source.skeleton.is_some();
        let transformer = CoordinateTransformer::for_class(class, skeletal, config)
            .map(|t| t.with_pre_scale(properties.pre_scale));

        let procedural = match (&properties.active_doodad, &properties.sprite_list) {
            (Some(settings), _) => {
                let archetype: ActiveDoodadArchetype = settings.archetype.parse()?;
                if skeletal {
                    warn!(
                        "Ignoring active doodad settings on skeletal object '{}'",
                        source.name
                    );
                    ProceduralPlan::None
                } else {
                    ProceduralPlan::ActiveDoodad(archetype)
                }
            }
            (None, Some(_)) => ProceduralPlan::SpriteList {
                is_projectile: class == ObjectClass::SpellProjectile,
            },
            (None, None) => ProceduralPlan::None,
        };

        let collision = match class {
            ObjectClass::ParticleEmitter
            | ObjectClass::SpellProjectile
            | ObjectClass::SoundInstance => CollisionPlan::Skip,
            _ if properties.disable_collision => CollisionPlan::Skip,
            _ => match properties.custom_collision {
                CustomCollisionType::Ladder => CollisionPlan::Ladder,
                CustomCollisionType::None => CollisionPlan::FromSource,
            },
        };

        let min_visibility_box_size = properties.min_visibility_box_size.unwrap_or(if skeletal {
            0.0
        } else {
            config.static_min_visibility_box_size
        });

        Ok(Self {
            class,
            skeletal,
            transformer,
            procedural,
            collision,
            min_visibility_box_size,
            with_attachments: skeletal && class == ObjectClass::EquipmentHeld,
        })
    }
}

/// Builder threading one object through the conversion stages
#[derive(Debug)]
pub struct ModelBuilder<'a> {
    config: &'a ConversionConfig,
    profile: ConversionProfile,
    source: SourceObject,
    model: ObjectModel,
    animated_vertices: Vec<bool>,
}

impl<'a> ModelBuilder<'a> {
    /// Validate the source and resolve the conversion profile
    pub fn new(
        name: String,
        properties: ObjectProperties,
        source: SourceObject,
        config: &'a ConversionConfig,
    ) -> Result<Self> {
        let mesh = &source.mesh;
        if !mesh.is_consistent() {
            return Err(ConversionError::GeometryMismatch {
                name,
                positions: mesh.positions.len(),
                normals: mesh.normals.len(),
                texture_coordinates: mesh.texture_coordinates.len(),
            });
        }
        let profile = ConversionProfile::resolve(&properties, &source, config)?;
        debug!(
            "Converting '{}' as {:?} (skeletal: {}, procedural: {:?}, collision: {:?})",
            name, profile.class, profile.skeletal, profile.procedural, profile.collision
        );

        let mut model = ObjectModel::new(&name, properties);
        model.is_skeletal = profile.skeletal;
        Ok(Self {
            config,
            profile,
            source,
            model,
            animated_vertices: Vec::new(),
        })
    }

    pub fn profile(&self) -> &ConversionProfile {
        &self.profile
    }

    /// Group geometry by material and bring mesh and collision into target space
    #[must_use]
    pub fn transform_geometry(mut self) -> Self {
        self.source.mesh.sort_by_material();
        match &self.profile.transformer {
            Some(transformer) => {
                transformer.transform_mesh(&mut self.source.mesh);
                if let Some(collision) = &mut self.source.collision {
                    transformer.transform_collision(collision);
                }
            }
            None => trace!("'{}' is already in target space", self.model.name),
        }
        self
    }

    /// Split animated materials into frames and duplicate their geometry
    pub fn expand_materials(mut self) -> Result<Self> {
        let expanded = expand_materials(
            &self.source.materials,
            &mut self.source.mesh,
            &self.model.properties,
        )?;
        self.model.materials = expanded.materials;
        self.model.transparency = expanded.transparency;
        self.model.global_loop_sequence_limits = expanded.global_loop_sequence_limits;
        Ok(self)
    }

    /// Create render vertices and the geometry and visibility bounds
    #[must_use]
    pub fn build_vertices(mut self) -> Self {
        let mesh = &self.source.mesh;
        self.model.vertices = (0..mesh.positions.len())
            .map(|i| {
                let mut vertex = ModelVertex::new(
                    mesh.positions[i],
                    mesh.normals[i],
                    mesh.texture_coordinates[i],
                );
                vertex.bone_indices[0] = mesh.bone_indices.get(i).copied().unwrap_or(0);
                vertex
            })
            .collect();
        self.model.triangles = mesh.triangles.clone();
        self.animated_vertices = (0..mesh.positions.len())
            .map(|i| mesh.is_vertex_animated(i))
            .collect();
        correct_texture_coordinates(
            &mut self.model.vertices,
            &self.model.triangles,
            &self.model.materials,
        );

        let geometry_box = BoundingBox::from_points(self.model.vertices.iter().map(|v| v.position));
        let visibility_box = geometry_box.with_min_size(self.profile.min_visibility_box_size);
        self.model.geometry_box = geometry_box;
        self.model.visibility_box = visibility_box;
        self.model.bounding_radius = visibility_box.radius();
        self
    }

    fn build_skeletal(&mut self) -> Result<(BuiltSkeleton, Vec<ModelAnimation>)> {
        let skeleton = self
            .source
            .skeleton
            .as_ref()
            .ok_or_else(|| ConversionError::Skeleton("no source skeleton".to_string()))?;
        let mut built = build_skeleton(
            skeleton,
            &mut self.model.vertices,
            self.profile.with_attachments,
        )?;
        let transformer = self
            .profile
            .transformer
            .unwrap_or(CoordinateTransformer::new(1.0, false));
        let animations = AnimationSynthesizer::new(transformer)
            .with_lift_height(self.model.properties.skeleton_lift_height)
            .with_fidget_time_percent(self.config.fidget_time_percent)
            .with_bounds(self.model.visibility_box, self.model.bounding_radius)
            .synthesize(&mut built.bones, &self.source.animations)?;
        Ok((built, animations))
    }

    fn build_static(&mut self) -> Result<(BuiltSkeleton, Vec<ModelAnimation>)> {
        for vertex in &mut self.model.vertices {
            vertex.bone_indices[0] = 0;
        }
        let mut built = BuiltSkeleton::single_bone();
        let animations = match (self.profile.procedural, &self.model.properties.active_doodad) {
            (ProceduralPlan::ActiveDoodad(archetype), Some(settings)) => generate_active_doodad(
                &mut built.bones[0],
                archetype,
                settings.anim_time_ms,
                settings.distance,
                &self.model.geometry_box,
                self.model.visibility_box,
                self.model.bounding_radius,
            )?,
            _ => {
                built.bones[0].add_sequence();
                vec![
                    ModelAnimation::new(AnimationType::Stand, 0)
                        .with_bounds(self.model.visibility_box, self.model.bounding_radius),
                ]
            }
        };
        Ok((built, animations))
    }

    /// Build the skeleton and its animations.
    ///
    /// A skeletal object whose skeleton or animations cannot be built is
    /// converted as a static object instead.
    pub fn build_skeleton(mut self) -> Result<Self> {
        let skeletal = if self.profile.skeletal {
            match self.build_skeletal() {
                Ok(built) => Some(built),
                Err(err) => {
                    error!(
                        "Failed to build skeleton for '{}', using a single bone: {err}",
                        self.model.name
                    );
                    None
                }
            }
        } else {
            None
        };

        let (built, animations) = match skeletal {
            Some(built) => built,
            None => {
                self.model.is_skeletal = false;
                self.build_static()?
            }
        };
        debug!(
            "'{}' has {} bones and {} animations",
            self.model.name,
            built.bones.len(),
            animations.len()
        );
        self.model.bones = built.bones;
        self.model.key_bone_lookups = built.key_bone_lookups;
        self.model.attachments = built.attachments;
        self.model.events = built.events;
        self.model.animations = animations;
        Ok(self)
    }

    /// Add sprite-list bones and tracks when configured
    pub fn generate_procedural(mut self) -> Result<Self> {
        if let ProceduralPlan::SpriteList { is_projectile } = self.profile.procedural {
            if let Some(settings) = &self.model.properties.sprite_list {
                generate_sprite_list(
                    &mut self.model.bones,
                    &mut self.model.animations,
                    &mut self.model.vertices,
                    settings,
                    is_projectile,
                )?;
            }
        }
        Ok(self)
    }

    /// Fill the animation slot table and per-material bone tables
    #[must_use]
    pub fn build_lookups(mut self) -> Self {
        self.model.animation_lookups = build_animation_lookups(&self.model.animations);
        self.model.bone_lookups =
            build_bone_lookups(&mut self.model.vertices, &self.model.triangles);
        self
    }

    /// Produce collision geometry according to the profile
    #[must_use]
    pub fn build_collision(mut self) -> Self {
        let config = self.config;
        let (positions, triangles) = match self.profile.collision {
            CollisionPlan::Skip => {
                trace!("No collision for '{}'", self.model.name);
                return self;
            }
            CollisionPlan::Ladder => ladder_collision(
                &self.model.geometry_box,
                config.ladder_extend_distance * config.world_scale,
                config.ladder_step_distance * config.world_scale,
            ),
            CollisionPlan::FromSource => match self.source.collision.take() {
                Some(collision) => (collision.positions, collision.triangles),
                None if config.derive_collision => {
                    let stand_sequence = self
                        .model
                        .animations
                        .iter()
                        .position(|a| a.animation_type == AnimationType::Stand);
                    let positions = match stand_sequence {
                        Some(sequence) if self.model.is_skeletal => {
                            pose_positions(&self.model.vertices, &self.model.bones, sequence)
                        }
                        _ => self.model.vertices.iter().map(|v| v.position).collect(),
                    };
                    derive_from_geometry(
                        &positions,
                        &self.model.triangles,
                        &self.model.materials,
                        &self.animated_vertices,
                    )
                }
                None => {
                    trace!("No collision mesh supplied for '{}'", self.model.name);
                    (Vec::new(), Vec::new())
                }
            },
        };
        self.model.collision =
            finalize_collision(positions, triangles, config.collision_boundary_padding);
        self
    }

    /// Locate the portrait camera on skeletal objects
    #[must_use]
    pub fn place_portrait_camera(mut self) -> Self {
        if self.model.is_skeletal {
            self.model.portrait_camera = compute_portrait_camera(
                &self.model.bones,
                &self.model.properties.portrait_camera,
            );
        }
        self
    }

    /// Mark the model loaded and hand it out
    pub fn finish(mut self) -> ObjectModel {
        self.model.is_loaded = true;
        self.model
    }
}

/// Convert `source` into a loaded model
pub fn run(
    name: String,
    properties: ObjectProperties,
    source: SourceObject,
    context: &ConversionContext,
) -> Result<ObjectModel> {
    let model = ModelBuilder::new(name, properties, source, &context.config)?
        .transform_geometry()
        .expand_materials()?
        .build_vertices()
        .build_skeleton()?
        .generate_procedural()?
        .build_lookups()
        .build_collision()
        .place_portrait_camera()
        .finish();
    debug!(
        "Converted '{}': {} vertices, {} triangles, {} materials, {} collision triangles",
        model.name,
        model.vertices.len(),
        model.triangles.len(),
        model.materials.len(),
        model.collision.triangles.len()
    );
    Ok(model)
}
