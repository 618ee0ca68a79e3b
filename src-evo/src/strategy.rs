use ndarray::Array1;
use rand::rngs::StdRng;

use crate::problem::Problem;
use crate::EvoError;

/// The contract shared by all six optimizers: produce the next population
/// from the current, sorted population.
///
/// Each strategy owns its individual representation (real vector, binary
/// chromosome, particle, forager, cell) and maps it to a phenotype position
/// through [`EvolutionStrategy::position`]; the engine only ever sees
/// positions when recording history.
pub trait EvolutionStrategy {
    type Individual: Clone;

    /// Validate strategy parameters against the configured problem.
    /// Runs before any generation; failures abort the run.
    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        Ok(())
    }

    /// Build the initial population (random individuals within bounds).
    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Self::Individual>, EvoError>;

    /// One generation update. `population` arrives sorted best-first and is
    /// consumed; the returned population replaces it wholesale.
    fn evolve(
        &mut self,
        problem: &Problem,
        population: Vec<Self::Individual>,
        rng: &mut StdRng,
    ) -> Result<Vec<Self::Individual>, EvoError>;

    /// Phenotype position of an individual (decoded for encoded
    /// representations).
    fn position(&self, problem: &Problem, individual: &Self::Individual) -> Array1<f64>;

    /// Raw objective value of an individual.
    fn objective(&self, problem: &Problem, individual: &Self::Individual) -> f64 {
        problem.evaluate(&self.position(problem, individual))
    }

    /// Best individual of the sorted population. The head of the population
    /// is the current-generation best; strategies tracking a run-wide best
    /// (bacterial foraging) override this.
    fn best(&self, population: &[Self::Individual]) -> Self::Individual {
        population[0].clone()
    }
}
