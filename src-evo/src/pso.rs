use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use crate::problem::Problem;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// One particle: position, velocity and the remembered personal best
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Array1<f64>,
    pub velocity: Array1<f64>,
    pub best_position: Array1<f64>,
}

impl Particle {
    pub(crate) fn new(position: Array1<f64>) -> Self {
        let velocity = Array1::zeros(position.len());
        let best_position = position.clone();
        Self {
            position,
            velocity,
            best_position,
        }
    }
}

/// Particle swarm optimization with a gbest (global best) topology.
///
/// The top `num_elites` particles of each generation are frozen and carried
/// over unmodified; every other particle accelerates toward the global best
/// and its own personal best with per-particle scalar rates drawn uniformly
/// in `[0, max_rate]`. Velocity magnitude is clamped to `max_velocity`,
/// rescaling while preserving direction.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    population_size: usize,
    num_elites: usize,
    max_cognition_rate: f64,
    max_social_rate: f64,
    max_velocity: f64,
}

impl ParticleSwarm {
    pub fn new() -> Self {
        Self {
            population_size: 100,
            num_elites: 2,
            max_cognition_rate: 2.05,
            max_social_rate: 2.05,
            max_velocity: 20.0,
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
    pub fn max_cognition_rate(mut self, v: f64) -> Self {
        self.max_cognition_rate = v;
        self
    }
    pub fn max_social_rate(mut self, v: f64) -> Self {
        self.max_social_rate = v;
        self
    }
    pub fn max_velocity(mut self, v: f64) -> Self {
        self.max_velocity = v;
        self
    }

    fn rand_rate(max: f64, rng: &mut StdRng) -> f64 {
        if max > 0.0 {
            rng.random_range(0.0..max)
        } else {
            0.0
        }
    }
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for ParticleSwarm {
    type Individual = Particle;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        if self.population_size == 0 {
            return Err(EvoError::InvalidPopulationSize(0));
        }
        if self.num_elites >= self.population_size {
            return Err(EvoError::InvalidParameter(
                "num_elites must be smaller than the population size",
            ));
        }
        if self.max_cognition_rate < 0.0 || self.max_social_rate < 0.0 {
            return Err(EvoError::InvalidParameter(
                "cognition and social rates must be non-negative",
            ));
        }
        if !(self.max_velocity > 0.0) {
            return Err(EvoError::InvalidParameter("max_velocity must be positive"));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Particle>, EvoError> {
        Ok((0..self.population_size)
            .map(|_| Particle::new(problem.rand_position(rng)))
            .collect())
    }

    fn evolve(
        &mut self,
        problem: &Problem,
        mut population: Vec<Particle>,
        rng: &mut StdRng,
    ) -> Result<Vec<Particle>, EvoError> {
        let global_best = population[0].position.clone();

        let elite_count = self.num_elites.min(population.len());
        let mut moved = population.split_off(elite_count);
        let elites = population;

        for particle in &mut moved {
            let cognition_rate = Self::rand_rate(self.max_cognition_rate, rng);
            let social_rate = Self::rand_rate(self.max_social_rate, rng);

            let social_pull = (&global_best - &particle.position) * social_rate;
            let cognitive_pull = (&particle.best_position - &particle.position) * cognition_rate;
            particle.velocity = &particle.velocity + &(social_pull + cognitive_pull);

            // velocity limiting: rescale, keep direction
            let magnitude = particle.velocity.dot(&particle.velocity).sqrt();
            if magnitude > self.max_velocity {
                let scale = self.max_velocity / magnitude;
                particle.velocity.mapv_inplace(|v| v * scale);
            }

            particle.position = &particle.position + &particle.velocity;

            if problem.fitness(&particle.position) > problem.fitness(&particle.best_position) {
                particle.best_position = particle.position.clone();
            }
        }

        // frozen elites rejoin unchanged
        moved.extend(elites);
        Ok(moved)
    }

    fn position(&self, _problem: &Problem, individual: &Particle) -> Array1<f64> {
        individual.position.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mode, DEFAULT_OFFSET};
    use rand::SeedableRng;

    fn sphere(x: &Array1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    #[test]
    fn velocity_magnitude_never_exceeds_maximum() {
        let max_velocity = 1.5;
        let mut pso = ParticleSwarm::new()
            .population_size(6)
            .num_elites(1)
            .max_velocity(max_velocity);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-100.0, 100.0), (-100.0, 100.0)], Mode::Minimize, DEFAULT_OFFSET)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        let mut population = pso.init_population(&problem, &mut rng).unwrap();
        // seed one particle with an absurd velocity; the update must clamp it
        population[3].velocity = Array1::from(vec![500.0, -250.0]);

        for _ in 0..20 {
            population = pso.evolve(&problem, population, &mut rng).unwrap();
            for particle in &population {
                let magnitude = particle.velocity.dot(&particle.velocity).sqrt();
                assert!(
                    magnitude <= max_velocity + 1e-9,
                    "velocity magnitude {} exceeds {}",
                    magnitude,
                    max_velocity
                );
            }
        }
    }

    #[test]
    fn elites_survive_unchanged() {
        let mut pso = ParticleSwarm::new().population_size(5).num_elites(2);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-10.0, 10.0), (-10.0, 10.0)], Mode::Minimize, DEFAULT_OFFSET)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(22);

        let population = pso.init_population(&problem, &mut rng).unwrap();
        let first = population[0].position.clone();
        let second = population[1].position.clone();

        let next = pso.evolve(&problem, population, &mut rng).unwrap();
        assert_eq!(next.len(), 5);
        // elites are appended after the moved particles
        assert_eq!(next[3].position, first);
        assert_eq!(next[4].position, second);
    }

    #[test]
    fn personal_best_only_improves() {
        let mut pso = ParticleSwarm::new()
            .population_size(8)
            .num_elites(0)
            .max_velocity(2.0);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-10.0, 10.0), (-10.0, 10.0)], Mode::Minimize, DEFAULT_OFFSET)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(23);

        let mut population = pso.init_population(&problem, &mut rng).unwrap();
        let mut best_fitness: Vec<f64> = population
            .iter()
            .map(|p| problem.fitness(&p.best_position))
            .collect();

        for _ in 0..15 {
            population = pso.evolve(&problem, population, &mut rng).unwrap();
            for (particle, previous) in population.iter().zip(best_fitness.iter_mut()) {
                let current = problem.fitness(&particle.best_position);
                assert!(current >= *previous - 1e-9);
                *previous = current;
            }
        }
    }
}
