//! Open/close state animations for interactive single-bone objects

use std::f32::consts::{FRAC_PI_2, PI};
use std::str::FromStr;

use glam::{Quat, Vec3};
use log::debug;

use crate::common::BoundingBox;
use crate::error::{ConversionError, Result};
use crate::model::{AnimationType, ModelAnimation, ModelBone};
use crate::track::InterpolationType;

/// Duration used by idle spins when none is configured
const DEFAULT_SPIN_TIME_MS: u32 = 10000;

/// Motions an active doodad can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveDoodadArchetype {
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    RotateAroundZClockwiseQuarter,
    RotateAroundZCounterclockwiseQuarter,
    RotateAroundZHalf,
    RotateUpOpen,
    RotateDownOpen,
    IdleRotateAroundY,
    IdleRotateAroundZ,
}

impl FromStr for ActiveDoodadArchetype {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "OnActivateSlideUp" => Self::SlideUp,
            "OnActivateSlideDown" => Self::SlideDown,
            "OnActivateSlideLeft" => Self::SlideLeft,
            "OnActivateSlideRight" => Self::SlideRight,
            "OnActivateRotateAroundZClockwiseQuarter" => Self::RotateAroundZClockwiseQuarter,
            "OnActivateRotateAroundZCounterclockwiseQuarter" => {
                Self::RotateAroundZCounterclockwiseQuarter
            }
            "OnActivateRotateAroundZHalf" => Self::RotateAroundZHalf,
            "OnActivateRotateUpOpen" => Self::RotateUpOpen,
            "OnActivateRotateDownOpen" => Self::RotateDownOpen,
            "IdleRotateAroundY" => Self::IdleRotateAroundY,
            "IdleRotateAroundZ" => Self::IdleRotateAroundZ,
            other => return Err(ConversionError::UnsupportedActiveDoodad(other.to_string())),
        })
    }
}

enum Motion {
    Slide(Vec3),
    /// Rotation about `axis` by `angle`, with `steps` evenly spaced keys
    Turn { axis: Vec3, angle: f32, steps: u32 },
    Spin(Vec3),
}

impl ActiveDoodadArchetype {
    fn motion(self, distance: Option<f32>, geometry_box: &BoundingBox) -> Motion {
        let extent = geometry_box.extent();
        let along = |axis_extent: f32| distance.unwrap_or(axis_extent);
        match self {
            Self::SlideUp => Motion::Slide(Vec3::new(0.0, 0.0, along(extent.z))),
            Self::SlideDown => Motion::Slide(Vec3::new(0.0, 0.0, -along(extent.z))),
            Self::SlideLeft => Motion::Slide(Vec3::new(0.0, along(extent.y), 0.0)),
            Self::SlideRight => Motion::Slide(Vec3::new(0.0, -along(extent.y), 0.0)),
            Self::RotateAroundZClockwiseQuarter => Motion::Turn {
                axis: Vec3::Z,
                angle: -FRAC_PI_2,
                steps: 1,
            },
            Self::RotateAroundZCounterclockwiseQuarter => Motion::Turn {
                axis: Vec3::Z,
                angle: FRAC_PI_2,
                steps: 1,
            },
            Self::RotateAroundZHalf => Motion::Turn {
                axis: Vec3::Z,
                angle: PI,
                steps: 2,
            },
            Self::RotateUpOpen => Motion::Turn {
                axis: Vec3::Y,
                angle: -FRAC_PI_2,
                steps: 1,
            },
            Self::RotateDownOpen => Motion::Turn {
                axis: Vec3::Y,
                angle: FRAC_PI_2,
                steps: 1,
            },
            Self::IdleRotateAroundY => Motion::Spin(Vec3::Y),
            Self::IdleRotateAroundZ => Motion::Spin(Vec3::Z),
        }
    }
}

/// Which way a state moves between the closed and open poses
#[derive(Clone, Copy)]
enum Phase {
    Opening,
    HeldOpen,
    Closing,
    HeldClosed,
}

const STATES: [(AnimationType, Phase); 5] = [
    (AnimationType::Open, Phase::Opening),
    (AnimationType::Opened, Phase::HeldOpen),
    (AnimationType::Close, Phase::Closing),
    (AnimationType::Closed, Phase::HeldClosed),
    (AnimationType::Stand, Phase::HeldClosed),
];

/// `duration * part / whole`, computed wide so long durations cannot overflow
fn scaled(duration: u32, part: u32, whole: u32) -> u32 {
    (u64::from(duration) * u64::from(part) / u64::from(whole)) as u32
}

/// Build the Open, Opened, Close, Closed and Stand animations on bone 0.
///
/// `bone` is the object's single `main` bone, still without sequences.
pub fn generate_active_doodad(
    bone: &mut ModelBone,
    archetype: ActiveDoodadArchetype,
    anim_time_ms: u32,
    distance: Option<f32>,
    geometry_box: &BoundingBox,
    visibility_box: BoundingBox,
    bounding_radius: f32,
) -> Result<Vec<ModelAnimation>> {
    let motion = archetype.motion(distance, geometry_box);
    let duration = match motion {
        Motion::Spin(_) if anim_time_ms == 0 => DEFAULT_SPIN_TIME_MS,
        _ => anim_time_ms.max(1),
    };

    bone.translation.interpolation_type = InterpolationType::Linear;
    bone.rotation.interpolation_type = InterpolationType::Linear;

    let mut animations = Vec::with_capacity(STATES.len());
    for (animation_type, phase) in STATES {
        let sequence = bone.add_sequence();
        match motion {
            Motion::Slide(delta) => {
                let (start, end) = match phase {
                    Phase::Opening => (Vec3::ZERO, delta),
                    Phase::HeldOpen => (delta, delta),
                    Phase::Closing => (delta, Vec3::ZERO),
                    Phase::HeldClosed => (Vec3::ZERO, Vec3::ZERO),
                };
                bone.translation.add_value(sequence, 0, start)?;
                bone.translation.add_value(sequence, duration, end)?;
            }
            Motion::Turn { axis, angle, steps } => {
                let (from, to) = match phase {
                    Phase::Opening => (0.0, angle),
                    Phase::HeldOpen => (angle, angle),
                    Phase::Closing => (angle, 0.0),
                    Phase::HeldClosed => (0.0, 0.0),
                };
                for step in 0..=steps {
                    let fraction = step as f32 / steps as f32;
                    let timestamp = scaled(duration, step, steps);
                    let rotation = Quat::from_axis_angle(axis, from + (to - from) * fraction);
                    bone.rotation.add_rotation(sequence, timestamp, rotation)?;
                }
            }
            Motion::Spin(axis) => {
                for quarter in 0..=4u32 {
                    let rotation = Quat::from_axis_angle(axis, FRAC_PI_2 * quarter as f32);
                    bone.rotation
                        .add_rotation(sequence, scaled(duration, quarter, 4), rotation)?;
                }
            }
        }

        let mut animation = ModelAnimation::new(animation_type, duration)
            .with_bounds(visibility_box, bounding_radius);
        animation.alias_next = sequence as u16;
        animations.push(animation);
    }

    debug!(
        "Generated {} active doodad animations for {:?} over {} ms",
        animations.len(),
        archetype,
        duration
    );
    Ok(animations)
}
