//! Animation sequences of the converted model

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::common::BoundingBox;
use crate::source::SourceAnimationType;

/// Total play frequency shared by sibling animations of one slot
pub const PLAY_FREQUENCY_TOTAL: u16 = 32767;

/// Target animation slots, valued by their animation data id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum AnimationType {
    Stand = 0,
    Death = 1,
    Spell = 2,
    Stop = 3,
    Walk = 4,
    Run = 5,
    Dead = 6,
    Rise = 7,
    StandWound = 8,
    CombatWound = 9,
    CombatCritical = 10,
    ShuffleLeft = 11,
    ShuffleRight = 12,
    Walkbackwards = 13,
    AttackUnarmed = 16,
    Attack1H = 17,
    Attack2H = 18,
    ReadyUnarmed = 25,
    SpellCast = 32,
    Fall = 40,
    SwimIdle = 41,
    Swim = 42,
    SwimLeft = 43,
    SwimRight = 44,
    SwimBackwards = 45,
    Close = 146,
    Closed = 147,
    Open = 148,
    Opened = 149,
}

impl AnimationType {
    pub const fn id(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Stand => "Stand",
            Self::Death => "Death",
            Self::Spell => "Spell",
            Self::Stop => "Stop",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Dead => "Dead",
            Self::Rise => "Rise",
            Self::StandWound => "StandWound",
            Self::CombatWound => "CombatWound",
            Self::CombatCritical => "CombatCritical",
            Self::ShuffleLeft => "ShuffleLeft",
            Self::ShuffleRight => "ShuffleRight",
            Self::Walkbackwards => "Walkbackwards",
            Self::AttackUnarmed => "AttackUnarmed",
            Self::Attack1H => "Attack1H",
            Self::Attack2H => "Attack2H",
            Self::ReadyUnarmed => "ReadyUnarmed",
            Self::SpellCast => "SpellCast",
            Self::Fall => "Fall",
            Self::SwimIdle => "SwimIdle",
            Self::Swim => "Swim",
            Self::SwimLeft => "SwimLeft",
            Self::SwimRight => "SwimRight",
            Self::SwimBackwards => "SwimBackwards",
            Self::Close => "Close",
            Self::Closed => "Closed",
            Self::Open => "Open",
            Self::Opened => "Opened",
        }
    }

    /// Whether the animation plays once and holds its final pose
    pub const fn is_one_shot(self) -> bool {
        matches!(self, Self::Death | Self::Open | Self::Close)
    }
}

bitflags::bitflags! {
    /// Animation flags as defined by the target format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct AnimationFlags: u32 {
        /// Sequence data lives in the model file rather than an external file
        const PRIMARY_BONE_SEQUENCE = 0x20;
        const IS_ALIAS = 0x40;
        const BLENDED_ANIMATION = 0x80;
    }
}

/// One populated animation slot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ModelAnimation {
    pub animation_type: AnimationType,
    /// Variation index among animations sharing a slot
    pub sub_animation_id: u16,
    /// Source clip type this animation was built from, if any
    pub source_type: Option<SourceAnimationType>,
    /// Source clip name this animation was built from, if any
    pub source_name: Option<String>,
    pub duration_ms: u32,
    pub play_frequency: u16,
    pub blend_time_ms: u16,
    pub flags: AnimationFlags,
    pub looping: bool,
    pub bounding_box: BoundingBox,
    pub bounding_radius: f32,
    /// Next animation in a variation chain, -1 for none
    pub next_animation: i16,
    /// Alias target; animations alias themselves
    pub alias_next: u16,
}

impl ModelAnimation {
    pub fn new(animation_type: AnimationType, duration_ms: u32) -> Self {
        Self {
            animation_type,
            sub_animation_id: 0,
            source_type: None,
            source_name: None,
            duration_ms,
            play_frequency: PLAY_FREQUENCY_TOTAL,
            blend_time_ms: 150,
            flags: AnimationFlags::PRIMARY_BONE_SEQUENCE,
            looping: !animation_type.is_one_shot(),
            bounding_box: BoundingBox::default(),
            bounding_radius: 0.0,
            next_animation: -1,
            alias_next: 0,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounding_box: BoundingBox, bounding_radius: f32) -> Self {
        self.bounding_box = bounding_box;
        self.bounding_radius = bounding_radius;
        self
    }
}

/// Map each animation slot id to the index of its first animation, -1 elsewhere
pub fn build_animation_lookups(animations: &[ModelAnimation]) -> Vec<i16> {
    let Some(max_id) = animations.iter().map(|a| a.animation_type.id()).max() else {
        return Vec::new();
    };
    let mut lookups = vec![-1i16; usize::from(max_id) + 1];
    for (index, animation) in animations.iter().enumerate() {
        let slot = &mut lookups[usize::from(animation.animation_type.id())];
        if *slot == -1 {
            *slot = index as i16;
        }
    }
    lookups
}
