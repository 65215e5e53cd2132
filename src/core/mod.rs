//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform determinism.
//! They are the foundation of the replay guarantee.

pub mod fixed;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_HALF, FIXED_ONE, FIXED_SCALE};
pub use hash::{compute_state_hash, StateHash};
