//! Shared utilities for the eqwow CLI

pub mod io;
pub mod tree;

pub use io::*;
pub use tree::*;
