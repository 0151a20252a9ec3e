//! Level 2: Pipeline properties
//!
//! Invariants that hold for every converted object.

pub mod cache;
pub mod invariants;
