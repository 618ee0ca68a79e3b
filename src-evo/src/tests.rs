//! End-to-end runs of every optimizer on the benchmark functions.

use ndarray::Array1;

use evoswarm_testfunctions::{rastrigin, sphere};

use crate::{
    optimize, ArtificialBeeColony, BacterialForaging, BinaryGeneticAlgorithm, CallbackAction,
    ContinuousAntColony, DifferentialEvolution, EvoConfigBuilder, EvoReport, GenerationRecorder,
    Mode, ParticleSwarm,
};

const SPHERE_BOUNDS: [(f64, f64); 2] = [(-10.0, 10.0), (-10.0, 10.0)];

fn assert_minimized(report: &EvoReport, tolerance: f64) {
    let initial_best = report.generations[0].best_value;
    assert!(
        report.fun < tolerance,
        "final value {} not below {}",
        report.fun,
        tolerance
    );
    assert!(
        report.fun <= initial_best,
        "final value {} worse than initial best {}",
        report.fun,
        initial_best
    );
    assert!(report.nfev > 0);
}

#[test]
fn genetic_algorithm_minimizes_sphere() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(101).build();
    let ga = BinaryGeneticAlgorithm::new().population_size(100);
    let report = optimize(&sphere, &SPHERE_BOUNDS, ga, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn particle_swarm_minimizes_sphere() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(102).build();
    let pso = ParticleSwarm::new().max_velocity(2.0);
    let report = optimize(&sphere, &SPHERE_BOUNDS, pso, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn ant_colony_minimizes_sphere() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(103).build();
    let aco = ContinuousAntColony::new();
    let report = optimize(&sphere, &SPHERE_BOUNDS, aco, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn bee_colony_minimizes_sphere() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(104).build();
    let abc = ArtificialBeeColony::new();
    let report = optimize(&sphere, &SPHERE_BOUNDS, abc, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn bacterial_foraging_minimizes_sphere() {
    let bfoa = BacterialForaging::new()
        .chemotaxis_steps(25)
        .reproduction_steps(2)
        .elimination_steps(2)
        .attraction_depth(0.1)
        .repulsion_depth(0.1);
    let config = EvoConfigBuilder::new()
        .max_generations(bfoa.total_steps())
        .seed(105)
        .build();
    let report = optimize(&sphere, &SPHERE_BOUNDS, bfoa, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn differential_evolution_minimizes_sphere() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(106).build();
    let de = DifferentialEvolution::new();
    let report = optimize(&sphere, &SPHERE_BOUNDS, de, config).unwrap();
    assert_minimized(&report, 1.0);
}

#[test]
fn genetic_algorithm_handles_rastrigin() {
    let config = EvoConfigBuilder::new().max_generations(100).seed(107).build();
    let ga = BinaryGeneticAlgorithm::new()
        .population_size(100)
        .gene_length(12);
    let bounds = [(-5.12, 5.12), (-5.12, 5.12)];
    let report = optimize(&rastrigin, &bounds, ga, config).unwrap();
    // multimodal, so only ask for the neighborhood of the global minimum
    assert_minimized(&report, 2.0);
}

#[test]
fn maximize_mode_climbs_the_objective() {
    let negated = |x: &Array1<f64>| -sphere(x);
    let config = EvoConfigBuilder::new()
        .mode(Mode::Maximize)
        .max_generations(80)
        .seed(108)
        .build();
    let pso = ParticleSwarm::new().population_size(50).max_velocity(2.0);
    let report = optimize(&negated, &SPHERE_BOUNDS, pso, config).unwrap();

    assert!(report.fun > -1.0, "final value {} too low", report.fun);
    assert!(report.fun >= report.generations[0].best_value);
}

#[test]
fn history_holds_one_snapshot_per_generation_plus_initial() {
    let config = EvoConfigBuilder::new().max_generations(10).seed(109).build();
    let de = DifferentialEvolution::new().population_size(8);
    let report = optimize(&sphere, &SPHERE_BOUNDS, de, config).unwrap();

    assert_eq!(report.nit, 10);
    assert_eq!(report.generations.len(), 11);
    for generation in &report.generations {
        assert_eq!(generation.population.len(), 8);
        assert_eq!(generation.best_x.len(), 2);
    }
}

#[test]
fn callback_stops_the_run_at_a_generation_boundary() {
    let config = EvoConfigBuilder::new()
        .max_generations(50)
        .seed(110)
        .callback(Box::new(|intermediate| {
            if intermediate.iter >= 4 {
                CallbackAction::Stop
            } else {
                CallbackAction::Continue
            }
        }))
        .build();
    let de = DifferentialEvolution::new().population_size(8);
    let report = optimize(&sphere, &SPHERE_BOUNDS, de, config).unwrap();

    assert_eq!(report.nit, 4);
    assert_eq!(report.generations.len(), 5);
    assert!(report.message.contains("stopped"));
}

#[test]
fn callback_observes_every_generation() {
    use std::cell::Cell;
    use std::rc::Rc;

    let seen = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&seen);
    let config = EvoConfigBuilder::new()
        .max_generations(6)
        .seed(111)
        .callback(Box::new(move |intermediate| {
            assert_eq!(intermediate.iter, counter.get());
            assert_eq!(intermediate.x.len(), 2);
            counter.set(counter.get() + 1);
            CallbackAction::Continue
        }))
        .build();
    let pso = ParticleSwarm::new().population_size(10);
    optimize(&sphere, &SPHERE_BOUNDS, pso, config).unwrap();

    assert_eq!(seen.get(), 7);
}

#[test]
fn report_history_saves_as_result_log() {
    let config = EvoConfigBuilder::new().max_generations(3).seed(112).build();
    let de = DifferentialEvolution::new().population_size(5);
    let report = optimize(&sphere, &SPHERE_BOUNDS, de, config).unwrap();

    let mut recorder = GenerationRecorder::new();
    for generation in report.generations {
        recorder.record(generation);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = recorder
        .save_results(dir.path().to_str().unwrap(), "sphere_de")
        .unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    let blocks: Vec<&str> = content.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 4);
    for (index, block) in blocks.iter().enumerate() {
        let lines: Vec<&str> = block.lines().collect();
        // one header line plus one line per individual
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with(&format!("{}, ", index)));
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let config = EvoConfigBuilder::new().max_generations(20).seed(113).build();
        let de = DifferentialEvolution::new().population_size(10);
        optimize(&sphere, &SPHERE_BOUNDS, de, config).unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.fun, second.fun);
    assert_eq!(first.x, second.x);
    assert_eq!(first.nfev, second.nfev);
}
