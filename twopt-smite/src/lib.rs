//! SMITE 1 build optimizer.
//!
//! Picks six items for a god (at most one starter, and an acorn only for
//! Ratatoskr) maximizing a linearized proxy of sustained basic-attack DPS,
//! then reports the exact DPS of the chosen build. Uses the same solver
//! adapter as the Total War optimizer.

pub mod builder;
pub mod god;
pub mod item;

pub use builder::{optimize_build, Build, SmiteError, BUILD_SIZE};
pub use god::{God, Limits};
pub use item::{Item, ItemCategory, Stats};
