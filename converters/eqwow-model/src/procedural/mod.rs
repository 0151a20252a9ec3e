//! Animations built from configuration when an object has no source clips

pub mod active_doodad;
pub mod sprite_list;

pub use active_doodad::{ActiveDoodadArchetype, generate_active_doodad};
pub use sprite_list::generate_sprite_list;
