use std::fmt;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::problem::{Problem, DEFAULT_OFFSET};
use crate::recorder::{Generation, GenerationRecorder};
use crate::strategy::EvolutionStrategy;
use crate::{EvoError, Mode};

/// Information passed to the per-generation callback
pub struct EvoIntermediate {
    /// Best position of the current generation
    pub x: Array1<f64>,
    /// Raw objective value at `x`
    pub fun: f64,
    /// Generation index (0 is the initial sorted population)
    pub iter: usize,
}

/// Action returned by the callback; `Stop` ends the run at the next
/// generation boundary
pub enum CallbackAction {
    Continue,
    Stop,
}

/// Configuration shared by all optimizers
pub struct EvoConfig {
    /// Minimize or maximize the objective
    pub mode: Mode,
    /// Fixed generation budget; the run always executes exactly this many
    /// updates unless the callback stops it earlier
    pub max_generations: usize,
    /// Additive offset of the fitness/cost transform
    pub offset: f64,
    /// RNG seed; seeded runs are fully reproducible
    pub seed: Option<u64>,
    /// Print the best objective value at each generation
    pub disp: bool,
    /// Optional per-generation callback (may stop the run early)
    pub callback: Option<Box<dyn FnMut(&EvoIntermediate) -> CallbackAction>>,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Minimize,
            max_generations: 100,
            offset: DEFAULT_OFFSET,
            seed: None,
            disp: false,
            callback: None,
        }
    }
}

/// Fluent builder for `EvoConfig`
pub struct EvoConfigBuilder {
    cfg: EvoConfig,
}

impl EvoConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: EvoConfig::default(),
        }
    }
    pub fn mode(mut self, v: Mode) -> Self {
        self.cfg.mode = v;
        self
    }
    pub fn max_generations(mut self, v: usize) -> Self {
        self.cfg.max_generations = v;
        self
    }
    pub fn offset(mut self, v: f64) -> Self {
        self.cfg.offset = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    pub fn callback(mut self, cb: Box<dyn FnMut(&EvoIntermediate) -> CallbackAction>) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    pub fn build(self) -> EvoConfig {
        self.cfg
    }
}

impl Default for EvoConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an optimization run
#[derive(Clone)]
pub struct EvoReport {
    /// Best position found
    pub x: Array1<f64>,
    /// Raw objective value at `x`
    pub fun: f64,
    /// Number of generation updates executed
    pub nit: usize,
    /// Number of objective evaluations
    pub nfev: usize,
    /// Human-readable termination description
    pub message: String,
    /// Full per-generation history, `nit + 1` snapshots for an uninterrupted
    /// run (generation 0 is the initial sorted population)
    pub generations: Vec<Generation>,
}

impl fmt::Debug for EvoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvoReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field("message", &self.message)
            .field("generations", &format!("len={}", self.generations.len()))
            .finish()
    }
}

/// The shared generation engine.
///
/// Drives the fixed-length loop `Initialized -> {Sorted -> Recorded ->
/// Evolved}* -> Terminated`: sort the population by fitness (mode-aware),
/// record a pre-evolution snapshot, then delegate to the strategy for the
/// next population. History therefore holds `max_generations + 1` entries.
pub struct Engine<'a, S: EvolutionStrategy> {
    problem: Problem<'a>,
    strategy: S,
    config: EvoConfig,
}

impl<'a, S: EvolutionStrategy> Engine<'a, S> {
    /// Create an engine; validates the problem and the strategy parameters
    /// before any generation runs.
    pub fn new<F>(
        func: &'a F,
        bounds: &[(f64, f64)],
        strategy: S,
        config: EvoConfig,
    ) -> Result<Self, EvoError>
    where
        F: Fn(&Array1<f64>) -> f64,
    {
        let problem = Problem::new(func, bounds, config.mode, config.offset)?;
        strategy.validate(&problem)?;
        Ok(Self {
            problem,
            strategy,
            config,
        })
    }

    pub fn problem(&self) -> &Problem<'a> {
        &self.problem
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run the optimization and return the best individual plus the full
    /// generation history.
    pub fn solve(&mut self) -> Result<EvoReport, EvoError> {
        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        if self.config.disp {
            eprintln!(
                "evo init: {} dimensions, max_generations={}",
                self.problem.dimensions(),
                self.config.max_generations
            );
        }

        let mut population = self.strategy.init_population(&self.problem, &mut rng)?;
        if population.is_empty() {
            return Err(EvoError::InvalidPopulationSize(0));
        }

        let mut recorder = GenerationRecorder::new();
        let mut message = format!("completed {} generations", self.config.max_generations);

        let mut best_x = Array1::<f64>::zeros(self.problem.dimensions());
        let mut best_f = f64::INFINITY;
        let mut nit = 0;

        for iter in 0..=self.config.max_generations {
            nit = iter;
            self.sort_population(&mut population);

            let best = self.strategy.best(&population);
            best_x = self.strategy.position(&self.problem, &best);
            best_f = self.problem.evaluate(&best_x);

            let snapshot: Vec<Array1<f64>> = population
                .iter()
                .map(|individual| self.strategy.position(&self.problem, individual))
                .collect();
            recorder.record(Generation {
                population: snapshot,
                best_x: best_x.clone(),
                best_value: best_f,
            });

            if self.config.disp {
                eprintln!("evo iter {:4}  best_f={:.6e}", iter, best_f);
            }

            if let Some(ref mut cb) = self.config.callback {
                let intermediate = EvoIntermediate {
                    x: best_x.clone(),
                    fun: best_f,
                    iter,
                };
                if matches!(cb(&intermediate), CallbackAction::Stop) {
                    message = "optimization stopped by callback".to_string();
                    break;
                }
            }

            if iter == self.config.max_generations {
                break;
            }
            population = self.strategy.evolve(&self.problem, population, &mut rng)?;
        }

        if self.config.disp {
            eprintln!("evo finished: {}", message);
        }

        Ok(EvoReport {
            x: best_x,
            fun: best_f,
            nit,
            nfev: self.problem.nfev(),
            message,
            generations: recorder.into_generations(),
        })
    }

    /// Mode-aware sort: after this, the head of the population is the
    /// current-generation best.
    fn sort_population(&self, population: &mut Vec<S::Individual>) {
        let mut keyed: Vec<(f64, S::Individual)> = population
            .drain(..)
            .map(|individual| {
                let value = self.strategy.objective(&self.problem, &individual);
                (value, individual)
            })
            .collect();

        match self.problem.mode() {
            Mode::Minimize => keyed.sort_by(|a, b| a.0.total_cmp(&b.0)),
            Mode::Maximize => keyed.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }

        population.extend(keyed.into_iter().map(|(_, individual)| individual));
    }
}

/// Convenience entry point: configure an engine, run it, return the report.
pub fn optimize<F, S>(
    func: &F,
    bounds: &[(f64, f64)],
    strategy: S,
    config: EvoConfig,
) -> Result<EvoReport, EvoError>
where
    F: Fn(&Array1<f64>) -> f64,
    S: EvolutionStrategy,
{
    Engine::new(func, bounds, strategy, config)?.solve()
}
