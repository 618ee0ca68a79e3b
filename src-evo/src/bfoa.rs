use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use crate::problem::Problem;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// One bacterium: position, last effective cost, and the running average of
/// the effective costs seen over the current chemotaxis run (used for
/// reproduction).
#[derive(Debug, Clone)]
pub struct Cell {
    pub position: Array1<f64>,
    pub cost: f64,
    pub health: f64,
    samples: usize,
}

impl Cell {
    pub(crate) fn new(position: Array1<f64>) -> Self {
        Self {
            position,
            cost: f64::INFINITY,
            health: 0.0,
            samples: 0,
        }
    }

    fn observe(&mut self, cost: f64) {
        self.samples += 1;
        self.health += (cost - self.health) / self.samples as f64;
    }
}

/// Bacterial foraging optimization.
///
/// One generation of the engine is one chemotaxis step: every cell tumbles
/// in a random unit direction scaled by `step_size` and swims up to
/// `swim_length` consecutive improving moves, judged on the effective cost
/// (raw cost plus the cell-cell attraction/repulsion sum). The strategy
/// keeps its own counters, so reproduction runs after every
/// `chemotaxis_steps` generations and elimination-dispersal after every
/// `reproduction_steps` reproductions. Run the engine with
/// `max_generations = total_steps()` to execute the full schedule.
///
/// The best effective cost ever observed is tracked across the whole run
/// and reported as the result; the final population's head is not
/// necessarily that best.
#[derive(Debug, Clone)]
pub struct BacterialForaging {
    population_size: usize,
    step_size: f64,
    chemotaxis_steps: usize,
    swim_length: usize,
    reproduction_steps: usize,
    elimination_steps: usize,
    attraction_depth: f64,
    attraction_width: f64,
    repulsion_depth: f64,
    repulsion_width: f64,
    elimination_probability: f64,

    // per-run state, reset by init_population
    chemotaxis_count: usize,
    reproduction_count: usize,
    best_position: Option<Array1<f64>>,
    best_cost: f64,
    best_cost_trace: Vec<f64>,
}

impl BacterialForaging {
    pub fn new() -> Self {
        Self {
            population_size: 50,
            step_size: 0.2,
            chemotaxis_steps: 100,
            swim_length: 4,
            reproduction_steps: 4,
            elimination_steps: 2,
            attraction_depth: 1.0,
            attraction_width: 0.2,
            repulsion_depth: 1.0,
            repulsion_width: 10.0,
            elimination_probability: 0.25,
            chemotaxis_count: 0,
            reproduction_count: 0,
            best_position: None,
            best_cost: f64::INFINITY,
            best_cost_trace: Vec::new(),
        }
    }

    pub fn population_size(mut self, v: usize) -> Self {
        self.population_size = v;
        self
    }
    pub fn step_size(mut self, v: f64) -> Self {
        self.step_size = v;
        self
    }
    pub fn chemotaxis_steps(mut self, v: usize) -> Self {
        self.chemotaxis_steps = v;
        self
    }
    pub fn swim_length(mut self, v: usize) -> Self {
        self.swim_length = v;
        self
    }
    pub fn reproduction_steps(mut self, v: usize) -> Self {
        self.reproduction_steps = v;
        self
    }
    pub fn elimination_steps(mut self, v: usize) -> Self {
        self.elimination_steps = v;
        self
    }
    pub fn attraction_depth(mut self, v: f64) -> Self {
        self.attraction_depth = v;
        self
    }
    pub fn attraction_width(mut self, v: f64) -> Self {
        self.attraction_width = v;
        self
    }
    pub fn repulsion_depth(mut self, v: f64) -> Self {
        self.repulsion_depth = v;
        self
    }
    pub fn repulsion_width(mut self, v: f64) -> Self {
        self.repulsion_width = v;
        self
    }
    pub fn elimination_probability(mut self, v: f64) -> Self {
        self.elimination_probability = v;
        self
    }

    /// Generations needed for the full chemotaxis/reproduction/elimination
    /// schedule
    pub fn total_steps(&self) -> usize {
        self.elimination_steps * self.reproduction_steps * self.chemotaxis_steps
    }

    /// Tracked global best effective cost after each chemotaxis step,
    /// non-increasing by construction
    pub fn best_cost_trace(&self) -> &[f64] {
        &self.best_cost_trace
    }

    /// Attraction/repulsion contribution of the rest of the swarm at
    /// `position`, cell `index` excluded
    fn interaction(&self, cells: &[Cell], index: usize, position: &Array1<f64>) -> f64 {
        cells
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, other)| {
                let diff = position - &other.position;
                let d2 = diff.dot(&diff);
                self.repulsion_depth * (-self.repulsion_width * d2).exp()
                    - self.attraction_depth * (-self.attraction_width * d2).exp()
            })
            .sum()
    }

    fn effective_cost(
        &self,
        problem: &Problem,
        cells: &[Cell],
        index: usize,
        position: &Array1<f64>,
    ) -> f64 {
        problem.cost(position) + self.interaction(cells, index, position)
    }

    fn track_best(&mut self, position: &Array1<f64>, cost: f64) {
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best_position = Some(position.clone());
        }
    }

    fn rand_unit_vector(dimensions: usize, rng: &mut StdRng) -> Array1<f64> {
        loop {
            let v: Array1<f64> =
                Array1::from_iter((0..dimensions).map(|_| rng.random_range(-1.0..1.0)));
            let norm = v.dot(&v).sqrt();
            if norm > 1e-12 {
                return v / norm;
            }
        }
    }

    /// Keep the healthier half (lowest average effective cost), refill with
    /// copies of it, reset the averages
    fn reproduce(&self, cells: &mut Vec<Cell>) {
        cells.sort_by(|a, b| a.health.total_cmp(&b.health));
        cells.truncate(self.population_size / 2);
        let survivors = cells.clone();
        cells.extend(survivors);
        for cell in cells.iter_mut() {
            cell.health = 0.0;
            cell.samples = 0;
        }
    }

    fn eliminate(&self, problem: &Problem, cells: &mut [Cell], rng: &mut StdRng) {
        for cell in cells.iter_mut() {
            if rng.random::<f64>() < self.elimination_probability {
                *cell = Cell::new(problem.rand_position(rng));
            }
        }
    }
}

impl Default for BacterialForaging {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for BacterialForaging {
    type Individual = Cell;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(EvoError::InvalidPopulationSize(self.population_size));
        }
        if !(self.step_size > 0.0) {
            return Err(EvoError::InvalidParameter("step_size must be positive"));
        }
        if self.chemotaxis_steps == 0 || self.reproduction_steps == 0 || self.elimination_steps == 0
        {
            return Err(EvoError::InvalidParameter(
                "chemotaxis, reproduction and elimination steps must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.elimination_probability) {
            return Err(EvoError::InvalidParameter(
                "elimination probability must lie in [0, 1]",
            ));
        }
        if self.attraction_depth < 0.0
            || self.attraction_width < 0.0
            || self.repulsion_depth < 0.0
            || self.repulsion_width < 0.0
        {
            return Err(EvoError::InvalidParameter(
                "attraction/repulsion parameters must be non-negative",
            ));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Cell>, EvoError> {
        self.chemotaxis_count = 0;
        self.reproduction_count = 0;
        self.best_position = None;
        self.best_cost = f64::INFINITY;
        self.best_cost_trace.clear();

        let mut cells: Vec<Cell> = (0..self.population_size)
            .map(|_| Cell::new(problem.rand_position(rng)))
            .collect();
        for i in 0..cells.len() {
            let cost = self.effective_cost(problem, &cells, i, &cells[i].position);
            cells[i].cost = cost;
            let position = cells[i].position.clone();
            self.track_best(&position, cost);
        }
        Ok(cells)
    }

    fn evolve(
        &mut self,
        problem: &Problem,
        population: Vec<Cell>,
        rng: &mut StdRng,
    ) -> Result<Vec<Cell>, EvoError> {
        let mut cells = population;

        // one chemotaxis step: tumble, then swim while improving
        for i in 0..cells.len() {
            let mut cell = cells[i].clone();
            cell.cost = self.effective_cost(problem, &cells, i, &cell.position);
            cell.observe(cell.cost);
            let position = cell.position.clone();
            self.track_best(&position, cell.cost);

            let direction =
                Self::rand_unit_vector(problem.dimensions(), rng) * self.step_size;
            let mut next = &cell.position + &direction;
            for _ in 0..self.swim_length {
                let next_cost = self.effective_cost(problem, &cells, i, &next);
                if next_cost >= cell.cost {
                    break;
                }
                cell.position = next;
                cell.cost = next_cost;
                cell.observe(next_cost);
                let position = cell.position.clone();
                self.track_best(&position, next_cost);
                next = &cell.position + &direction;
            }

            cells[i] = cell;
        }

        self.chemotaxis_count += 1;
        self.best_cost_trace.push(self.best_cost);

        if self.chemotaxis_count % self.chemotaxis_steps == 0 {
            self.reproduce(&mut cells);
            self.reproduction_count += 1;

            if self.reproduction_count % self.reproduction_steps == 0 {
                self.eliminate(problem, &mut cells, rng);
            }
        }

        Ok(cells)
    }

    fn position(&self, _problem: &Problem, individual: &Cell) -> Array1<f64> {
        individual.position.clone()
    }

    fn best(&self, population: &[Cell]) -> Cell {
        match &self.best_position {
            Some(position) => Cell {
                position: position.clone(),
                cost: self.best_cost,
                health: 0.0,
                samples: 0,
            },
            None => population[0].clone(),
        }
    }
}
