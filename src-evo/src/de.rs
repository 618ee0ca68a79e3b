use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use crate::distinct_indices::distinct_indices;
use crate::problem::Problem;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// Differential evolution, rand/1/bin.
///
/// For each index the mutant is `r1 + stepsize * (r2 - r3)` over three
/// distinct random peers, recombined by binomial crossover with one forced
/// dimension, then accepted only if its cost improves on the current
/// individual. Trial positions are not clipped to the bounds. The greedy
/// acceptance makes every slot's cost non-increasing across generations.
#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    population_size: usize,
    crossover_rate: f64,
    stepsize: f64,
}

impl DifferentialEvolution {
    pub fn new() -> Self {
        Self {
            population_size: 40,
            crossover_rate: 0.1,
            stepsize: 0.5,
        }
    }

    pub fn population_size(mut self, v: usize) -> Self {
        self.population_size = v;
        self
    }
    pub fn crossover_rate(mut self, v: f64) -> Self {
        self.crossover_rate = v;
        self
    }
    pub fn stepsize(mut self, v: f64) -> Self {
        self.stepsize = v;
        self
    }
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for DifferentialEvolution {
    type Individual = Array1<f64>;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        // index i plus three distinct peers
        if self.population_size < 4 {
            return Err(EvoError::InvalidPopulationSize(self.population_size));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(EvoError::InvalidParameter(
                "crossover rate must lie in [0, 1]",
            ));
        }
        if !(self.stepsize > 0.0) {
            return Err(EvoError::InvalidParameter("stepsize must be positive"));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Array1<f64>>, EvoError> {
        Ok((0..self.population_size)
            .map(|_| problem.rand_position(rng))
            .collect())
    }

    fn evolve(
        &mut self,
        problem: &Problem,
        population: Vec<Array1<f64>>,
        rng: &mut StdRng,
    ) -> Result<Vec<Array1<f64>>, EvoError> {
        let dimensions = problem.dimensions();

        // peers always come from the incoming generation; accepted trials go
        // into a separate next population
        let mut next = Vec::with_capacity(population.len());
        for (i, current) in population.iter().enumerate() {
            let peers = distinct_indices(i, 3, population.len(), rng);
            if peers.len() < 3 {
                return Err(EvoError::SelectionExhausted);
            }
            let mutant = &population[peers[0]]
                + &((&population[peers[1]] - &population[peers[2]]) * self.stepsize);

            let forced = rng.random_range(0..dimensions);
            let trial = Array1::from_iter((0..dimensions).map(|j| {
                if j == forced || rng.random::<f64>() <= self.crossover_rate {
                    mutant[j]
                } else {
                    current[j]
                }
            }));

            if problem.cost(&trial) < problem.cost(current) {
                next.push(trial);
            } else {
                next.push(current.clone());
            }
        }

        Ok(next)
    }

    fn position(&self, _problem: &Problem, individual: &Array1<f64>) -> Array1<f64> {
        individual.clone()
    }
}
