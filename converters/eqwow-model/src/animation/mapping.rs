//! Source clip to target slot compatibility table

use std::collections::BTreeMap;

use crate::model::AnimationType;
use crate::source::{SourceAnimation, SourceAnimationType, SourceAnimationType as Src};

/// How a slot takes part in stand/fidget alternation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    Idle,
    Fidget,
    Action,
}

/// One target slot and the source clip types that can fill it, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMapping {
    pub animation_type: AnimationType,
    pub role: SlotRole,
    pub candidates: &'static [SourceAnimationType],
}

const STAND: &[Src] = &[
    Src::P01StandPassive,
    Src::P08StandArmsToSide,
    Src::O02StandArmsToSide,
    Src::PosStandPose,
    Src::DrfStandPose,
];
const FIDGET: &[Src] = &[Src::O01StandIdle, Src::S15LookAround, Src::S17EmoteBlink];
const FIDGET_ALTERNATE: &[Src] = &[Src::S15LookAround, Src::S17EmoteBlink, Src::O01StandIdle];

const fn slot(
    animation_type: AnimationType,
    role: SlotRole,
    candidates: &'static [SourceAnimationType],
) -> SlotMapping {
    SlotMapping {
        animation_type,
        role,
        candidates,
    }
}

/// Slots filled for every skeletal object, in output order
pub const SKELETAL_SLOTS: [SlotMapping; 13] = [
    slot(AnimationType::Stand, SlotRole::Idle, STAND),
    slot(AnimationType::Stand, SlotRole::Idle, STAND),
    slot(AnimationType::Stand, SlotRole::Fidget, FIDGET),
    slot(AnimationType::Stand, SlotRole::Fidget, FIDGET_ALTERNATE),
    slot(
        AnimationType::AttackUnarmed,
        SlotRole::Action,
        &[
            Src::C08AttackUnarmed,
            Src::C01Kick,
            Src::C11RoundhouseKick,
            Src::C10AttackUnderwater,
            Src::C03Attack2H,
            Src::C02AttackPierce,
            Src::C06AttackOff,
        ],
    ),
    slot(AnimationType::Walk, SlotRole::Action, &[Src::L01Walk, Src::L02Run]),
    slot(AnimationType::Run, SlotRole::Action, &[Src::L02Run]),
    slot(
        AnimationType::ShuffleLeft,
        SlotRole::Action,
        &[Src::P03ShuffleFeet],
    ),
    slot(
        AnimationType::ShuffleRight,
        SlotRole::Action,
        &[Src::P03rShuffleFeetReverse, Src::P03ShuffleFeet],
    ),
    slot(
        AnimationType::Swim,
        SlotRole::Action,
        &[Src::P06Swim, Src::L09SwimIdle],
    ),
    slot(AnimationType::Death, SlotRole::Action, &[Src::D05Death]),
    slot(
        AnimationType::CombatWound,
        SlotRole::Action,
        &[Src::D01Damage1, Src::D02Damage2, Src::D03TrapDamage],
    ),
    slot(
        AnimationType::CombatCritical,
        SlotRole::Action,
        &[Src::D02Damage2, Src::D03TrapDamage, Src::D01Damage1],
    ),
];

/// First clip whose type appears in `candidates`, trying candidates in priority order
pub fn find_source_clip<'a>(
    animations: &'a BTreeMap<String, SourceAnimation>,
    candidates: &[SourceAnimationType],
) -> Option<(&'a str, &'a SourceAnimation)> {
    candidates.iter().find_map(|candidate| {
        animations
            .iter()
            .find(|(_, clip)| clip.animation_type == *candidate)
            .map(|(name, clip)| (name.as_str(), clip))
    })
}
