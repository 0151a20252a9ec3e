//! Engine-wide and per-object conversion settings

use glam::Vec3;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Settings shared by every object converted in one run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ConversionConfig {
    /// Scale applied to world geometry (static doodads, transports, effects)
    pub world_scale: f32,
    /// Scale applied to creature meshes and their animation translations
    pub creature_scale: f32,
    /// Scale applied to held equipment
    pub equipment_scale: f32,
    /// Share of standing time spent in fidget animations, in percent
    pub fidget_time_percent: u8,
    /// How far each ladder step drops from its inner to its outer edge, before world scale
    pub ladder_extend_distance: f32,
    /// Vertical distance between ladder steps, before world scale
    pub ladder_step_distance: f32,
    /// Padding added around collision bounding boxes
    pub collision_boundary_padding: f32,
    /// Minimum visibility box edge for static objects
    pub static_min_visibility_box_size: f32,
    /// Derive collision from the render mesh when none was supplied
    pub derive_collision: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            world_scale: 0.3,
            creature_scale: 0.3,
            equipment_scale: 0.3,
            fidget_time_percent: 20,
            ladder_extend_distance: 0.5,
            ladder_step_distance: 0.25,
            collision_boundary_padding: 0.01,
            static_min_visibility_box_size: 25.0,
            derive_collision: true,
        }
    }
}

/// What kind of object is being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum ObjectClass {
    Creature,
    #[default]
    StaticDoodad,
    Transport,
    EquipmentHeld,
    ParticleEmitter,
    SpellProjectile,
    ZoneModel,
    SoundInstance,
}

/// Procedural collision replacing whatever the mesh would give
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum CustomCollisionType {
    #[default]
    None,
    Ladder,
}

/// Configured motion for an interactive single-bone object
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ActiveDoodadSettings {
    /// Archetype name, e.g. `OnActivateSlideUp`
    pub archetype: String,
    /// Duration of the open and close motions
    pub anim_time_ms: u32,
    /// Slide distance; defaults to the geometry extent along the slide axis
    pub distance: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum SpinDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

/// Sprite-list effect parameters for emitter and projectile objects
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct SpriteListSettings {
    pub sprite_count: u32,
    /// Distance of each sprite from the effect centre
    pub radius: f32,
    /// Full rotations over the whole effect duration, zero for no spin
    pub rotations_per_duration: f32,
    pub spin_direction: SpinDirection,
    /// Extra radial distance reached halfway through the effect
    pub pulse_distance: f32,
    /// Vertical distance travelled over the effect
    pub vertical_drift: f32,
    pub effect_duration_ms: u32,
}

impl Default for SpriteListSettings {
    fn default() -> Self {
        Self {
            sprite_count: 1,
            radius: 0.0,
            rotations_per_duration: 0.0,
            spin_direction: SpinDirection::Clockwise,
            pulse_distance: 0.0,
            vertical_drift: 0.0,
            effect_duration_ms: 1000,
        }
    }
}

/// Colour applied to materials whose texture name contains a substring
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TintOverride {
    pub texture_name_contains: String,
    pub color: [u8; 3],
}

/// Per-race nudges applied to the portrait camera
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct PortraitCameraOffsets {
    pub position: Vec3,
    pub target: Vec3,
}

/// Per-object settings consumed by the conversion pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ObjectProperties {
    pub class: ObjectClass,
    /// Applied per axis before the class scale
    pub pre_scale: Vec3,
    /// Overrides the config's static minimum visibility box size
    pub min_visibility_box_size: Option<f32>,
    /// Added to the Z translation of bones hanging directly off `root`
    pub skeleton_lift_height: f32,
    pub custom_collision: CustomCollisionType,
    pub disable_collision: bool,
    pub active_doodad: Option<ActiveDoodadSettings>,
    pub sprite_list: Option<SpriteListSettings>,
    pub tint_overrides: Vec<TintOverride>,
    pub always_bright_materials: Vec<String>,
    pub alpha_blend_materials: Vec<String>,
    pub portrait_camera: PortraitCameraOffsets,
}

impl Default for ObjectProperties {
    fn default() -> Self {
        Self {
            class: ObjectClass::default(),
            pre_scale: Vec3::ONE,
            min_visibility_box_size: None,
            skeleton_lift_height: 0.0,
            custom_collision: CustomCollisionType::None,
            disable_collision: false,
            active_doodad: None,
            sprite_list: None,
            tint_overrides: Vec::new(),
            always_bright_materials: Vec::new(),
            alpha_blend_materials: Vec::new(),
            portrait_camera: PortraitCameraOffsets::default(),
        }
    }
}

impl ObjectProperties {
    pub fn new(class: ObjectClass) -> Self {
        Self {
            class,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_active_doodad(mut self, archetype: &str, anim_time_ms: u32) -> Self {
        self.active_doodad = Some(ActiveDoodadSettings {
            archetype: archetype.to_string(),
            anim_time_ms,
            distance: None,
        });
        self
    }

    #[must_use]
    pub fn with_sprite_list(mut self, settings: SpriteListSettings) -> Self {
        self.sprite_list = Some(settings);
        self
    }

    #[must_use]
    pub fn with_custom_collision(mut self, collision: CustomCollisionType) -> Self {
        self.custom_collision = collision;
        self
    }

    #[must_use]
    pub fn with_pre_scale(mut self, pre_scale: Vec3) -> Self {
        self.pre_scale = pre_scale;
        self
    }

    #[must_use]
    pub fn with_skeleton_lift_height(mut self, height: f32) -> Self {
        self.skeleton_lift_height = height;
        self
    }

    #[must_use]
    pub fn with_portrait_camera(mut self, offsets: PortraitCameraOffsets) -> Self {
        self.portrait_camera = offsets;
        self
    }
}
