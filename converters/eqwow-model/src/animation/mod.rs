//! Animation synthesis for skeletal objects
//!
//! Source clips are matched to target animation slots through a fixed
//! priority table ([`mapping`]) and turned into per-bone keyframe tracks by
//! the [`synthesizer`].

pub mod mapping;
pub mod synthesizer;

pub use mapping::{SKELETAL_SLOTS, SlotMapping, SlotRole, find_source_clip};
pub use synthesizer::{AnimationSynthesizer, rebalance_stand_frequencies};
