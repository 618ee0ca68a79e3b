//! Test function implementations organized by category
//!
//! - `unimodal`: single-optimum functions (sphere, rosenbrock, ...)
//! - `multimodal`: many-local-minima functions (rastrigin, ackley, ...)

pub mod multimodal;
pub mod unimodal;

// Re-export all functions for easy access
pub use multimodal::*;
pub use unimodal::*;
