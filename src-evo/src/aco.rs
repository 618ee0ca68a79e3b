use ndarray::Array1;
use rand::rngs::StdRng;

use crate::interval::Interval;
use crate::problem::Problem;
use crate::selector::WeightedSelector;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// Continuous ant colony optimization.
///
/// Each dimension of the domain is discretized into `num_intervals`
/// equal-width intervals carrying a pheromone scalar. Ants redraw every
/// coordinate by roulette over the intervals (weight =
/// `pheromone^pheromone_importance`), then uniformly within the chosen
/// interval. Pheromone evaporates by `1 - evaporation_rate` each generation
/// and every ant deposits `deposition_constant / cost` into the intervals it
/// visits; elites deposit too, so good regions keep reinforcing.
#[derive(Debug, Clone)]
pub struct ContinuousAntColony {
    population_size: usize,
    num_elites: usize,
    pheromone_importance: f64,
    evaporation_rate: f64,
    deposition_constant: f64,
    initial_pheromone: f64,
    num_intervals: usize,

    // per-run state, rebuilt by init_population
    intervals: Vec<Vec<Interval>>,
    pheromones: Vec<Vec<f64>>,
}

impl ContinuousAntColony {
    pub fn new() -> Self {
        Self {
            population_size: 100,
            num_elites: 1,
            pheromone_importance: 1.0,
            evaporation_rate: 0.8,
            deposition_constant: 100.0,
            initial_pheromone: 1e-5,
            num_intervals: 40,
            intervals: Vec::new(),
            pheromones: Vec::new(),
        }
    }

    pub fn population_size(mut self, v: usize) -> Self {
        self.population_size = v;
        self
    }
    pub fn num_elites(mut self, v: usize) -> Self {
        self.num_elites = v;
        self
    }
    pub fn pheromone_importance(mut self, v: f64) -> Self {
        self.pheromone_importance = v;
        self
    }
    pub fn evaporation_rate(mut self, v: f64) -> Self {
        self.evaporation_rate = v;
        self
    }
    pub fn deposition_constant(mut self, v: f64) -> Self {
        self.deposition_constant = v;
        self
    }
    pub fn initial_pheromone(mut self, v: f64) -> Self {
        self.initial_pheromone = v;
        self
    }
    pub fn num_intervals(mut self, v: usize) -> Self {
        self.num_intervals = v;
        self
    }

    /// Current pheromone table, `[dimension][interval]`
    pub fn pheromones(&self) -> &[Vec<f64>] {
        &self.pheromones
    }

    /// Divide every dimension of the domain into equal-width intervals
    fn discretize(&mut self, problem: &Problem) -> Result<(), EvoError> {
        let mut intervals = Vec::with_capacity(problem.dimensions());
        for d in 0..problem.dimensions() {
            let lo = problem.lower()[d];
            let step = (problem.upper()[d] - lo) / self.num_intervals as f64;

            let mut row = Vec::with_capacity(self.num_intervals);
            for i in 0..self.num_intervals {
                let start = lo + step * i as f64;
                row.push(Interval::new(start, start + step)?);
            }
            intervals.push(row);
        }
        self.intervals = intervals;
        Ok(())
    }
}

impl Default for ContinuousAntColony {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for ContinuousAntColony {
    type Individual = Array1<f64>;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        if self.population_size == 0 {
            return Err(EvoError::InvalidPopulationSize(0));
        }
        if self.num_elites >= self.population_size {
            return Err(EvoError::InvalidParameter(
                "num_elites must be smaller than the population size",
            ));
        }
        if self.num_intervals == 0 {
            return Err(EvoError::InvalidParameter(
                "num_intervals must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(EvoError::InvalidParameter(
                "evaporation rate must lie in [0, 1]",
            ));
        }
        if self.pheromone_importance < 0.0 {
            return Err(EvoError::InvalidParameter(
                "pheromone importance must be non-negative",
            ));
        }
        if !(self.deposition_constant > 0.0) || !(self.initial_pheromone > 0.0) {
            return Err(EvoError::InvalidParameter(
                "deposition constant and initial pheromone must be positive",
            ));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Array1<f64>>, EvoError> {
        self.discretize(problem)?;
        self.pheromones =
            vec![vec![self.initial_pheromone; self.num_intervals]; problem.dimensions()];

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
        let elite_count = self.num_elites.min(population.len());
        let elites: Vec<Array1<f64>> = population[..elite_count].to_vec();

        // interval roulette per dimension, weighted by pheromone amount
        let mut selectors: Vec<WeightedSelector<usize>> = Vec::with_capacity(dimensions);
        for pheromones in &self.pheromones {
            let mut selector = WeightedSelector::new();
            for (i, &pheromone) in pheromones.iter().enumerate() {
                selector.add(i, pheromone.powf(self.pheromone_importance))?;
            }
            selectors.push(selector);
        }

        let mut colony: Vec<Array1<f64>> = Vec::with_capacity(population.len());
        for _ in elite_count..population.len() {
            let mut ant = Array1::zeros(dimensions);
            for d in 0..dimensions {
                let &index = selectors[d].choose(rng)?;
                ant[d] = self.intervals[d][index].sample_uniform(rng);
            }
            colony.push(ant);
        }

        // elites rejoin before the pheromone update so they deposit too
        colony.extend(elites);

        let deposited: Vec<f64> = colony
            .iter()
            .map(|ant| self.deposition_constant / problem.cost(ant))
            .collect();

        for d in 0..dimensions {
            for i in 0..self.num_intervals {
                self.pheromones[d][i] *= 1.0 - self.evaporation_rate;

                for (ant, &amount) in colony.iter().zip(&deposited) {
                    if self.intervals[d][i].contains_half_open(ant[d]) {
                        self.pheromones[d][i] += amount;
                    }
                }
            }
        }

        Ok(colony)
    }

    fn position(&self, _problem: &Problem, individual: &Array1<f64>) -> Array1<f64> {
        individual.clone()
    }
}
