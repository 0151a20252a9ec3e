//! Keyframe tracks holding one sub-sequence per animation slot

use glam::Quat;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::common::CompQuat;
use crate::error::{ConversionError, Result};

/// Interpolation types used between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum InterpolationType {
    /// No interpolation, values snap at each timestamp
    None = 0,
    /// Linear interpolation
    #[default]
    Linear = 1,
    /// Bezier curve interpolation
    Bezier = 2,
    /// Hermite curve interpolation
    Hermite = 3,
}

/// Keyframes belonging to one animation slot
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct TrackSequence<T> {
    pub timestamps: Vec<u32>,
    pub values: Vec<T>,
}

impl<T> TrackSequence<T> {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first(&self) -> Option<(u32, &T)> {
        Some((*self.timestamps.first()?, self.values.first()?))
    }

    pub fn last(&self) -> Option<(u32, &T)> {
        Some((*self.timestamps.last()?, self.values.last()?))
    }

    fn push(&mut self, timestamp: u32, value: T) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }
}

/// Animated value on a bone or material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Track<T> {
    pub interpolation_type: InterpolationType,
    /// Index into the model's global loop sequences, if this track loops on its own clock
    pub global_sequence: Option<u16>,
    pub sequences: Vec<TrackSequence<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self::new(InterpolationType::default())
    }
}

impl<T> Track<T> {
    pub const fn new(interpolation_type: InterpolationType) -> Self {
        Self {
            interpolation_type,
            global_sequence: None,
            sequences: Vec::new(),
        }
    }

    /// Open a new empty sub-sequence and return its index
    pub fn add_sequence(&mut self) -> usize {
        self.sequences.push(TrackSequence {
            timestamps: Vec::new(),
            values: Vec::new(),
        });
        self.sequences.len() - 1
    }

    pub fn sequence(&self, index: usize) -> Option<&TrackSequence<T>> {
        self.sequences.get(index)
    }

    pub fn add_value(&mut self, sequence: usize, timestamp: u32, value: T) -> Result<()> {
        let count = self.sequences.len();
        let target = self.sequences.get_mut(sequence).ok_or_else(|| {
            ConversionError::ReferenceError(format!(
                "track sequence {sequence} does not exist ({count} sequences)"
            ))
        })?;
        target.push(timestamp, value);
        Ok(())
    }

    pub fn add_value_to_last_sequence(&mut self, timestamp: u32, value: T) -> Result<()> {
        let last = self.sequences.len().checked_sub(1).ok_or_else(|| {
            ConversionError::ReferenceError("track has no sequences".to_string())
        })?;
        self.add_value(last, timestamp, value)
    }

    /// True when any sub-sequence holds a keyframe
    pub fn has_keyframes(&self) -> bool {
        self.sequences.iter().any(|s| !s.is_empty())
    }

    /// First keyframe of the first sub-sequence that has any
    pub fn first_value(&self) -> Option<&T> {
        self.sequences
            .iter()
            .find_map(|s| s.first().map(|(_, value)| value))
    }
}

impl<T: Clone> Track<T> {
    /// Append a closing keyframe at `duration`.
    ///
    /// Looping sequences repeat their first value, others hold their last one.
    /// Sequences with fewer than two keyframes are left alone.
    pub fn close_loop(&mut self, sequence: usize, duration: u32, looping: bool) -> Result<()> {
        let Some(target) = self.sequences.get_mut(sequence) else {
            return Err(ConversionError::ReferenceError(format!(
                "track sequence {sequence} does not exist"
            )));
        };
        if target.len() < 2 {
            return Ok(());
        }
        let closing = if looping {
            target.values[0].clone()
        } else {
            target.values[target.len() - 1].clone()
        };
        target.push(duration, closing);
        Ok(())
    }
}

impl Track<CompQuat> {
    /// Append a rotation, flipped if needed so it lies on the short arc from the previous key
    pub fn add_rotation(&mut self, sequence: usize, timestamp: u32, rotation: Quat) -> Result<()> {
        let mut rotation = if rotation.length_squared() > f32::EPSILON {
            rotation.normalize()
        } else {
            Quat::IDENTITY
        };
        if let Some((_, previous)) = self.sequence(sequence).and_then(TrackSequence::last)
            && previous.to_quat().dot(rotation) < 0.0
        {
            rotation = -rotation;
        }
        self.add_value(sequence, timestamp, CompQuat::from_quat(rotation))
    }
}
