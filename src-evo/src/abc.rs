use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use crate::distinct_indices::distinct_indices;
use crate::problem::Problem;
use crate::selector::WeightedSelector;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// A food source together with its stagnation counter
#[derive(Debug, Clone)]
pub struct Forager {
    pub position: Array1<f64>,
    pub trials: usize,
}

impl Forager {
    pub(crate) fn new(position: Array1<f64>) -> Self {
        Self {
            position,
            trials: 0,
        }
    }
}

/// Artificial bee colony.
///
/// Half of `population_size` are foragers; every generation runs the three
/// classic phases. Foragers and onlookers perform the same neighborhood
/// search (one coordinate nudged toward or away from a random peer), greedy
/// on fitness; scouts replace any forager whose trial counter passed
/// `population_size * dimensions / 2` with a fresh random one.
///
/// Each phase reads one population state and produces the next; the phases
/// never alias current and next generation state.
#[derive(Debug, Clone)]
pub struct ArtificialBeeColony {
    population_size: usize,
}

impl ArtificialBeeColony {
    pub fn new() -> Self {
        Self {
            population_size: 100,
        }
    }

    pub fn population_size(mut self, v: usize) -> Self {
        self.population_size = v;
        self
    }

    fn forager_count(&self) -> usize {
        self.population_size / 2
    }

    fn stagnation_limit(&self, problem: &Problem) -> usize {
        self.population_size * problem.dimensions() / 2
    }

    /// One neighborhood search around forager `index`: nudge one coordinate
    /// toward or away from a random distinct peer, keep the better position.
    fn search(
        &self,
        problem: &Problem,
        foragers: &[Forager],
        index: usize,
        rng: &mut StdRng,
    ) -> Forager {
        let mut forager = foragers[index].clone();

        // validate guarantees at least two foragers, so a peer always exists
        let peer = distinct_indices(index, 1, foragers.len(), rng)[0];
        let d = rng.random_range(0..problem.dimensions());
        let r = rng.random_range(-1.0..1.0);

        let mut candidate = forager.position.clone();
        candidate[d] += r * (forager.position[d] - foragers[peer].position[d]);

        if problem.fitness(&candidate) > problem.fitness(&forager.position) {
            forager.position = candidate;
            forager.trials = 0;
        } else {
            forager.trials += 1;
        }
        forager
    }
}

impl Default for ArtificialBeeColony {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for ArtificialBeeColony {
    type Individual = Forager;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        // at least two foragers, so a distinct peer always exists
        if self.population_size < 4 {
            return Err(EvoError::InvalidPopulationSize(self.population_size));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Forager>, EvoError> {
        Ok((0..self.forager_count())
            .map(|_| Forager::new(problem.rand_position(rng)))
            .collect())
    }

    fn evolve(
        &mut self,
        problem: &Problem,
        population: Vec<Forager>,
        rng: &mut StdRng,
    ) -> Result<Vec<Forager>, EvoError> {
        let count = population.len();

        // forager phase: every source runs one search against the incoming
        // state
        let mut foragers: Vec<Forager> = (0..count)
            .map(|i| self.search(problem, &population, i, rng))
            .collect();

        // onlooker phase: fitness-proportional draws, with replacement
        let mut selector = WeightedSelector::new();
        for (i, forager) in foragers.iter().enumerate() {
            selector.add(i, problem.fitness(&forager.position))?;
        }
        for _ in 0..count {
            let &chosen = selector.choose(rng)?;
            foragers[chosen] = self.search(problem, &foragers, chosen, rng);
        }

        // scout phase: abandon exhausted sources
        let limit = self.stagnation_limit(problem);
        for forager in &mut foragers {
            if forager.trials > limit {
                *forager = Forager::new(problem.rand_position(rng));
            }
        }

        Ok(foragers)
    }

    fn position(&self, _problem: &Problem, individual: &Forager) -> Array1<f64> {
        individual.position.clone()
    }
}
