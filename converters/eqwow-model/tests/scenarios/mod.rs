//! Level 3: Object scenarios
//!
//! One converted object per test, checked against the expected target layout.

pub mod creature;
pub mod doodad;
pub mod effects;
