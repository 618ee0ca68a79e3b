use std::fs::{create_dir_all, File};
use std::io::Write;

use ndarray::Array1;
use serde::Serialize;

use crate::EvoError;

/// Immutable snapshot of one generation: a deep copy of every individual's
/// phenotype position, the best individual and its raw objective value.
///
/// Snapshots are created once, appended to the history and never mutated;
/// external consumers (plotting, analysis) read them without touching the
/// live population.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// Phenotype positions of the whole population, best first
    pub population: Vec<Array1<f64>>,
    /// Position of the generation's best individual
    pub best_x: Array1<f64>,
    /// Raw objective value of the best individual
    pub best_value: f64,
}

/// Append-only per-generation history of an optimization run.
///
/// The history grows by one snapshot per generation and is kept entirely in
/// memory; long runs with large populations grow linearly with the
/// generation budget.
#[derive(Debug, Default)]
pub struct GenerationRecorder {
    generations: Vec<Generation>,
}

impl GenerationRecorder {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
        }
    }

    pub fn record(&mut self, generation: Generation) {
        self.generations.push(generation);
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    pub fn into_generations(self) -> Vec<Generation> {
        self.generations
    }

    /// Save the recorded history as a plain-text result log.
    ///
    /// Format, per generation: one `<generationIndex>, <bestObjectiveValue>`
    /// line, then one comma-separated coordinate line per individual, then a
    /// blank line. Returns the written filename.
    pub fn save_results(&self, output_dir: &str, name: &str) -> Result<String, EvoError> {
        create_dir_all(output_dir)?;

        let filename = format!("{}/{}.txt", output_dir, name);
        let mut file = File::create(&filename)?;

        for (index, generation) in self.generations.iter().enumerate() {
            writeln!(file, "{}, {:.5}", index, generation.best_value)?;
            for individual in &generation.population {
                let coords: Vec<String> = individual.iter().map(|c| format!("{:.5}", c)).collect();
                writeln!(file, "{}", coords.join(", "))?;
            }
            writeln!(file)?;
        }

        Ok(filename)
    }
}
