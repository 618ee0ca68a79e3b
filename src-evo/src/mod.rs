//! Population-based metaheuristic optimizers in pure Rust using ndarray
//!
//! Six optimizers sharing one generation engine:
//! - Binary-encoded genetic algorithm (`ga`)
//! - Particle swarm, gbest topology (`pso`)
//! - Continuous ant colony (`aco`)
//! - Artificial bee colony (`abc`)
//! - Bacterial foraging (`bfoa`)
//! - Differential evolution (`de`)
//!
//! The engine drives a fixed-length generation loop over a black-box,
//! real-valued objective: sort the population by fitness, record an immutable
//! snapshot of the generation, then delegate to the active strategy for the
//! next population. The run returns the best individual plus the full
//! per-generation history for later analysis.
//!
//! Supported features:
//! - Minimize or maximize mode via a positive fitness/cost transform
//! - Box constraints (explicit per-dimension bounds, always required)
//! - Reproducible runs through an optional RNG seed
//! - Per-generation callback that can stop a run at generation boundaries
//! - Plain-text result logs compatible with external plotting tools

use std::str::FromStr;

use thiserror::Error;

pub mod interval;
pub mod problem;
pub mod recorder;
pub mod selector;
pub mod strategy;

mod distinct_indices;

pub mod engine;

pub mod abc;
pub mod aco;
pub mod bfoa;
pub mod de;
pub mod ga;
pub mod pso;

#[cfg(test)]
mod tests;

pub use abc::ArtificialBeeColony;
pub use aco::ContinuousAntColony;
pub use bfoa::BacterialForaging;
pub use de::DifferentialEvolution;
pub use engine::{
    optimize, CallbackAction, Engine, EvoConfig, EvoConfigBuilder, EvoIntermediate, EvoReport,
};
pub use ga::BinaryGeneticAlgorithm;
pub use interval::Interval;
pub use problem::{Problem, DEFAULT_OFFSET};
pub use pso::ParticleSwarm;
pub use recorder::{Generation, GenerationRecorder};
pub use selector::WeightedSelector;
pub use strategy::EvolutionStrategy;

/// Direction of the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Smaller objective values are better
    #[default]
    Minimize,
    /// Larger objective values are better
    Maximize,
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" | "minimize" => Ok(Mode::Minimize),
            "max" | "maximize" => Ok(Mode::Maximize),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

/// Errors raised by configuration validation and by the selection primitives.
///
/// Every failure aborts the run immediately; there is no retry or partial
/// state to recover.
#[derive(Debug, Error)]
pub enum EvoError {
    /// Interval or bound pair with min > max
    #[error("invalid interval: min {min} > max {max}")]
    InvalidInterval { min: f64, max: f64 },

    /// Lower and upper bound arrays of different lengths
    #[error("bounds length mismatch: {lower} lower vs {upper} upper")]
    BoundsMismatch { lower: usize, upper: usize },

    /// Zero-dimensional problem; bounds are required, there is no implicit
    /// default domain
    #[error("bounds must cover at least one dimension")]
    EmptyBounds,

    /// Population size unusable for the chosen strategy
    #[error("population size {0} is too small for this strategy")]
    InvalidPopulationSize(usize),

    /// Gene length outside the representable range
    #[error("gene length {0} outside supported range 1..=31")]
    InvalidGeneLength(u32),

    /// Strategy or engine parameter out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Selector fed a negative or non-finite weight
    #[error("selector weight must be a non-negative finite number, got {0}")]
    InvalidWeight(f64),

    /// Weighted selection invoked on an empty or zero-total-weight pool
    #[error("selection from an empty or zero-weight pool")]
    SelectionExhausted,

    /// Failure while writing a result log
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
