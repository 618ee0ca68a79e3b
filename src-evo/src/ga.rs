use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use crate::problem::Problem;
use crate::selector::WeightedSelector;
use crate::strategy::EvolutionStrategy;
use crate::EvoError;

/// Binary-encoded genetic algorithm with elitism, fitness-proportional
/// parent selection, single-point crossover and per-bit mutation.
///
/// Each individual is one genotype per dimension, an integer in
/// `[0, 2^gene_length)`. The phenotype is
/// `lower[d] + genotype * resolution[d]` with
/// `resolution[d] = (upper[d] - lower[d]) / (2^gene_length - 1)`.
#[derive(Debug, Clone)]
pub struct BinaryGeneticAlgorithm {
    population_size: usize,
    mutation_probability: f64,
    num_elites: usize,
    gene_length: u32,
}

impl BinaryGeneticAlgorithm {
    pub fn new() -> Self {
        Self {
            population_size: 50,
            mutation_probability: 0.01,
            num_elites: 2,
            gene_length: 15,
        }
    }

    pub fn population_size(mut self, v: usize) -> Self {
        self.population_size = v;
        self
    }
    pub fn mutation_probability(mut self, v: f64) -> Self {
        self.mutation_probability = v;
        self
    }
    pub fn num_elites(mut self, v: usize) -> Self {
        self.num_elites = v;
        self
    }
    pub fn gene_length(mut self, v: u32) -> Self {
        self.gene_length = v;
        self
    }

    /// Number of representable genotype values, `2^gene_length`
    pub fn genotype_size(&self) -> u64 {
        1u64 << self.gene_length
    }

    fn resolution(&self, problem: &Problem, d: usize) -> f64 {
        (problem.upper()[d] - problem.lower()[d]) / (self.genotype_size() - 1) as f64
    }

    /// Concatenated bit chromosome, MSB-first per gene
    pub(crate) fn encode(&self, individual: &[u32]) -> Vec<bool> {
        let mut bits = Vec::with_capacity(individual.len() * self.gene_length as usize);
        for &gene in individual {
            for bit in (0..self.gene_length).rev() {
                bits.push(gene >> bit & 1 == 1);
            }
        }
        bits
    }

    pub(crate) fn decode(&self, chromosome: &[bool]) -> Vec<u32> {
        chromosome
            .chunks(self.gene_length as usize)
            .map(|bits| bits.iter().fold(0u32, |value, &bit| value << 1 | bit as u32))
            .collect()
    }

    /// Single-point crossover at a uniform point in `[1, len - 1]`.
    /// Chromosomes shorter than two bits have no valid cross point; the
    /// children are plain copies of the parents.
    fn crossover(&self, a: &[bool], b: &[bool], rng: &mut StdRng) -> (Vec<bool>, Vec<bool>) {
        if a.len() < 2 {
            return (a.to_vec(), b.to_vec());
        }
        let point = rng.random_range(1..a.len());

        let mut child_a = a[..point].to_vec();
        child_a.extend_from_slice(&b[point..]);
        let mut child_b = b[..point].to_vec();
        child_b.extend_from_slice(&a[point..]);

        (child_a, child_b)
    }

    fn mutate(&self, chromosome: &mut [bool], rng: &mut StdRng) {
        for bit in chromosome.iter_mut() {
            if rng.random::<f64>() < self.mutation_probability {
                *bit = !*bit;
            }
        }
    }
}

impl Default for BinaryGeneticAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionStrategy for BinaryGeneticAlgorithm {
    type Individual = Vec<u32>;

    fn validate(&self, _problem: &Problem) -> Result<(), EvoError> {
        if self.population_size < 2 {
            return Err(EvoError::InvalidPopulationSize(self.population_size));
        }
        if !(1..=31).contains(&self.gene_length) {
            return Err(EvoError::InvalidGeneLength(self.gene_length));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(EvoError::InvalidParameter(
                "mutation probability must lie in [0, 1]",
            ));
        }
        if self.num_elites >= self.population_size {
            return Err(EvoError::InvalidParameter(
                "num_elites must be smaller than the population size",
            ));
        }
        Ok(())
    }

    fn init_population(
        &mut self,
        problem: &Problem,
        rng: &mut StdRng,
    ) -> Result<Vec<Vec<u32>>, EvoError> {
        let size = self.genotype_size();
        Ok((0..self.population_size)
            .map(|_| {
                (0..problem.dimensions())
                    .map(|_| rng.random_range(0..size) as u32)
                    .collect()
            })
            .collect())
    }

    fn evolve(
        &mut self,
        problem: &Problem,
        population: Vec<Vec<u32>>,
        rng: &mut StdRng,
    ) -> Result<Vec<Vec<u32>>, EvoError> {
        let mut selector = WeightedSelector::new();
        for individual in &population {
            let fitness = problem.fitness(&self.position(problem, individual));
            selector.add(individual.clone(), fitness)?;
        }

        // preserve the best individuals unchanged
        let elite_count = self.num_elites.min(population.len());
        let mut children: Vec<Vec<u32>> = population[..elite_count].to_vec();

        while children.len() < self.population_size {
            // parents are drawn without replacement within a pair, so the
            // two are always distinct pool entries
            let parents = selector.sample(2, rng)?;
            if parents.len() < 2 {
                return Err(EvoError::SelectionExhausted);
            }

            let father = self.encode(&parents[0]);
            let mother = self.encode(&parents[1]);

            let (mut child_a, mut child_b) = self.crossover(&father, &mother, rng);
            self.mutate(&mut child_a, rng);
            self.mutate(&mut child_b, rng);

            children.push(self.decode(&child_a));
            if children.len() < self.population_size {
                children.push(self.decode(&child_b));
            }
        }

        Ok(children)
    }

    fn position(&self, problem: &Problem, individual: &Vec<u32>) -> Array1<f64> {
        Array1::from_iter(
            individual
                .iter()
                .enumerate()
                .map(|(d, &gene)| problem.lower()[d] + gene as f64 * self.resolution(problem, d)),
        )
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
    fn encode_decode_round_trip() {
        let ga = BinaryGeneticAlgorithm::new().gene_length(8);
        for genotype in 0..ga.genotype_size() as u32 {
            let individual = vec![genotype, genotype ^ 0xAF];
            assert_eq!(ga.decode(&ga.encode(&individual)), individual);
        }
    }

    #[test]
    fn phenotype_spans_the_domain() {
        let ga = BinaryGeneticAlgorithm::new().gene_length(10);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-10.0, 10.0), (0.0, 4.0)], Mode::Minimize, DEFAULT_OFFSET)
                .unwrap();

        let lowest = ga.position(&problem, &vec![0, 0]);
        assert_eq!(lowest[0], -10.0);
        assert_eq!(lowest[1], 0.0);

        let top = (ga.genotype_size() - 1) as u32;
        let highest = ga.position(&problem, &vec![top, top]);
        assert!((highest[0] - 10.0).abs() < 1e-9);
        assert!((highest[1] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_gene_length() {
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-1.0, 1.0)], Mode::Minimize, DEFAULT_OFFSET).unwrap();
        assert!(matches!(
            BinaryGeneticAlgorithm::new().gene_length(0).validate(&problem),
            Err(EvoError::InvalidGeneLength(0))
        ));
        assert!(matches!(
            BinaryGeneticAlgorithm::new().gene_length(32).validate(&problem),
            Err(EvoError::InvalidGeneLength(32))
        ));
    }

    #[test]
    fn single_bit_chromosome_guards_crossover() {
        let mut ga = BinaryGeneticAlgorithm::new().gene_length(1).population_size(4);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(0.0, 1.0)], Mode::Minimize, DEFAULT_OFFSET).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // one dimension, one bit: no valid cross point exists
        let population = vec![vec![0], vec![1], vec![0], vec![1]];
        let next = ga.evolve(&problem, population, &mut rng).unwrap();
        assert_eq!(next.len(), 4);
        for individual in &next {
            assert!(individual[0] <= 1);
        }
    }

    #[test]
    fn evolve_keeps_population_size_and_elites() {
        let mut ga = BinaryGeneticAlgorithm::new()
            .population_size(10)
            .num_elites(2)
            .gene_length(6);
        let func = |x: &Array1<f64>| sphere(x);
        let problem =
            Problem::new(&func, &[(-5.0, 5.0), (-5.0, 5.0)], Mode::Minimize, DEFAULT_OFFSET)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let population = ga.init_population(&problem, &mut rng).unwrap();
        let next = ga.evolve(&problem, population.clone(), &mut rng).unwrap();

        assert_eq!(next.len(), 10);
        // the first two individuals survive unchanged
        assert_eq!(next[0], population[0]);
        assert_eq!(next[1], population[1]);
    }
}
