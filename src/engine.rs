//! The population manager and generation loop.
//!
//! [`Engine`] owns the primitive set, the configuration, and the two
//! caller callbacks (fitness and progress). [`find_best_solution`]
//! executes the full evolutionary loop:
//!
//! `Initializing → Evaluating → Reporting → (Terminated |
//! AdvancingGeneration) → Evaluating → …`
//!
//! The loop itself is single-threaded and strictly sequential; the only
//! parallel region is fitness evaluation inside a generation, where each
//! candidate owns its problem state and variable map so no locking is
//! needed. Aggregation (average, best-of-generation, best-ever) happens
//! after all evaluations complete, never incrementally from worker
//! threads.
//!
//! [`find_best_solution`]: Engine::find_best_solution

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;

use crate::candidate::Candidate;
use crate::config::EngineConfig;
use crate::error::GpError;
use crate::operators::crossover;
use crate::primitives::PrimitiveSet;
use crate::random::create_rng;
use crate::selection::rank_order;

/// Per-generation progress record passed to the progress callback.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineProgress {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Average fitness across the population this generation.
    pub avg_fitness_this_gen: f64,
    /// Best fitness observed this generation.
    pub best_fitness_this_gen: f64,
    /// Best fitness observed across all generations so far.
    pub best_fitness_ever: f64,
    /// Generation in which the best-ever candidate was found.
    pub best_ever_generation: usize,
    /// Wall-clock time spent on this generation (evaluation included).
    pub elapsed: Duration,
}

/// Caller-supplied fitness function.
///
/// Receives a candidate with its own problem state and variable map ready
/// to be written; typically sets variables, calls
/// [`Candidate::evaluate`], and scores the result. May run concurrently
/// with other candidates' evaluations, so it must not mutate anything
/// outside the candidate it was handed.
pub type FitnessFn<T, S> = Box<dyn Fn(&mut Candidate<T, S>) -> f64 + Send + Sync>;

/// Caller-supplied progress callback, invoked once per completed
/// generation. Returning `false` halts the run at this generation
/// boundary; in-flight work is never interrupted mid-generation.
pub type ProgressFn = Box<dyn FnMut(&EngineProgress) -> bool>;

/// Tree-based genetic programming engine, generic over the expression
/// result type `T` and the per-candidate problem-state type `S`.
///
/// # Usage
///
/// ```
/// use treegp::{Engine, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_population_size(30)
///     .with_min_generations(1)
///     .with_max_generations(5)
///     .with_depth_bounds(2, 4)
///     .with_seed(42);
///
/// let mut engine: Engine<f64, ()> = Engine::new(config);
/// engine.add_constant(1.0);
/// engine.add_variable("x");
/// engine.add_binary("add", |a, b| a + b);
/// engine.add_binary("mul", |a, b| a * b);
///
/// // fitness: distance from f(x) = x * x over a few sample points
/// engine.set_fitness_function(|cand| {
///     let mut error = 0.0;
///     for i in 0..5 {
///         let x = i as f64;
///         cand.set_variable("x", x);
///         let y = cand.evaluate().expect("x is set");
///         error += (y - x * x).abs();
///     }
///     error
/// });
/// engine.set_progress_function(|_progress| true);
///
/// let best = engine.find_best_solution().unwrap();
/// assert!(best.fitness.is_finite());
/// ```
pub struct Engine<T, S> {
    config: EngineConfig,
    primitives: PrimitiveSet<T, S>,
    fitness_fn: Option<FitnessFn<T, S>>,
    progress_fn: Option<ProgressFn>,
}

impl<T, S> Engine<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Default + Send + 'static,
{
    /// Creates an engine with the given configuration and an empty
    /// primitive set.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            primitives: PrimitiveSet::new(),
            fitness_fn: None,
            progress_fn: None,
        }
    }

    /// The registered primitive set.
    pub fn primitives(&self) -> &PrimitiveSet<T, S> {
        &self.primitives
    }

    /// Registers a constant leaf value.
    pub fn add_constant(&mut self, value: T) {
        self.primitives.add_constant(value);
    }

    /// Registers a named variable.
    pub fn add_variable(&mut self, name: &str) {
        self.primitives.add_variable(name);
    }

    /// Registers a one-operand function.
    pub fn add_unary(&mut self, name: &str, f: impl Fn(T) -> T + Send + Sync + 'static) {
        self.primitives.add_unary(name, f);
    }

    /// Registers a two-operand function.
    pub fn add_binary(&mut self, name: &str, f: impl Fn(T, T) -> T + Send + Sync + 'static) {
        self.primitives.add_binary(name, f);
    }

    /// Registers a three-operand function.
    pub fn add_ternary(&mut self, name: &str, f: impl Fn(T, T, T) -> T + Send + Sync + 'static) {
        self.primitives.add_ternary(name, f);
    }

    /// Registers a one-operand function that also receives problem state.
    pub fn add_unary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.primitives.add_unary_stateful(name, f);
    }

    /// Registers a two-operand function that also receives problem state.
    pub fn add_binary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.primitives.add_binary_stateful(name, f);
    }

    /// Registers a three-operand function that also receives problem
    /// state.
    pub fn add_ternary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, T, T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.primitives.add_ternary_stateful(name, f);
    }

    /// Registers a zero-arity terminal function over problem state.
    pub fn add_terminal_function(
        &mut self,
        name: &str,
        f: impl Fn(&mut S) -> T + Send + Sync + 'static,
    ) {
        self.primitives.add_terminal_function(name, f);
    }

    /// Provides the fitness function. Required before the run starts.
    pub fn set_fitness_function(
        &mut self,
        f: impl Fn(&mut Candidate<T, S>) -> f64 + Send + Sync + 'static,
    ) {
        self.fitness_fn = Some(Box::new(f));
    }

    /// Provides the progress callback. Required before the run starts.
    pub fn set_progress_function(&mut self, f: impl FnMut(&EngineProgress) -> bool + 'static) {
        self.progress_fn = Some(Box::new(f));
    }

    /// Runs the evolutionary search, blocking until termination, and
    /// returns the best candidate observed across all generations.
    ///
    /// Terminates when the progress callback returns `false`, or — once
    /// `min_generations` have completed — when the best average fitness
    /// has not improved for `stagnation_limit` generations or
    /// `max_generations` is reached.
    ///
    /// # Errors
    /// Configuration errors (invalid parameters, a primitive set unable
    /// to synthesize a tree, missing callbacks) are returned before the
    /// first generation runs. Panics raised inside the caller's fitness
    /// or progress callbacks are not caught; they abort the run.
    pub fn find_best_solution(&mut self) -> Result<Candidate<T, S>, GpError> {
        self.config.validate()?;
        self.primitives.validate(self.config.max_depth)?;
        let fitness_fn = self
            .fitness_fn
            .as_ref()
            .ok_or(GpError::MissingFitnessFunction)?;
        let progress_fn = self
            .progress_fn
            .as_mut()
            .ok_or(GpError::MissingProgressFunction)?;

        let config = &self.config;
        let primitives = &self.primitives;
        let lower = config.lower_is_better;
        let worst = if lower { f64::INFINITY } else { f64::NEG_INFINITY };
        let better = |a: f64, b: f64| if lower { a < b } else { a > b };

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        // Initializing
        let mut population: Vec<Candidate<T, S>> = (0..config.population_size)
            .map(|_| Candidate::random(primitives, config.min_depth, config.max_depth, &mut rng))
            .collect();

        let mut best_ever: Option<Candidate<T, S>> = None;
        let mut best_ever_fitness = worst;
        let mut best_ever_generation = 1usize;
        let mut best_avg_fitness = worst;
        let mut best_avg_generation = 1usize;

        let mut generation = 1usize;
        loop {
            let gen_start = Instant::now();

            // Evaluating: the only parallel region. Each candidate owns
            // its state and variables, so evaluations are independent.
            if config.parallel {
                population.par_iter_mut().for_each(|cand| {
                    cand.fitness = fitness_fn(cand);
                });
            } else {
                for cand in population.iter_mut() {
                    cand.fitness = fitness_fn(cand);
                }
            }

            // Aggregation happens after the parallel phase completes.
            let fitness_values: Vec<f64> = population.iter().map(|c| c.fitness).collect();
            let avg_fitness =
                fitness_values.iter().sum::<f64>() / fitness_values.len() as f64;
            let mut best_idx = 0;
            for (i, &f) in fitness_values.iter().enumerate() {
                if better(f, fitness_values[best_idx]) {
                    best_idx = i;
                }
            }
            let best_this_gen = fitness_values[best_idx];

            if best_ever.is_none() || better(best_this_gen, best_ever_fitness) {
                best_ever_fitness = best_this_gen;
                best_ever = Some(population[best_idx].clone());
                best_ever_generation = generation;
            }
            if generation == 1 || better(avg_fitness, best_avg_fitness) {
                best_avg_fitness = avg_fitness;
                best_avg_generation = generation;
            }

            debug!(
                "generation {generation}: avg {avg_fitness:.6}, best {best_this_gen:.6}, best ever {best_ever_fitness:.6}"
            );

            // Reporting: the progress callback is also the cooperative
            // cancellation point.
            let progress = EngineProgress {
                generation,
                avg_fitness_this_gen: avg_fitness,
                best_fitness_this_gen: best_this_gen,
                best_fitness_ever: best_ever_fitness,
                best_ever_generation,
                elapsed: gen_start.elapsed(),
            };
            if !progress_fn(&progress) {
                info!("halted by progress callback at generation {generation}");
                break;
            }

            // Termination check
            if generation >= config.min_generations {
                if generation - best_avg_generation >= config.stagnation_limit {
                    info!(
                        "stagnated: no average-fitness improvement since generation {best_avg_generation}"
                    );
                    break;
                }
                if generation >= config.max_generations {
                    info!("reached max_generations ({})", config.max_generations);
                    break;
                }
            }

            // AdvancingGeneration
            let elite_count =
                (config.population_size as f64 * config.elitism_rate) as usize;
            let mut next_gen: Vec<Candidate<T, S>> =
                Vec::with_capacity(config.population_size + 1);
            if elite_count > 0 {
                let order = rank_order(&fitness_values, lower);
                for &idx in order.iter().rev().take(elite_count) {
                    next_gen.push(population[idx].clone());
                }
            }

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&fitness_values, lower, &mut rng);
                let p2 = config.selection.select(&fitness_values, lower, &mut rng);
                let (mut child1, mut child2) = crossover(
                    &population[p1],
                    &population[p2],
                    config.crossover_rate,
                    &mut rng,
                );
                if rng.random_range(0.0..1.0) < config.mutation_rate {
                    child1.mutate(primitives, &mut rng);
                }
                if rng.random_range(0.0..1.0) < config.mutation_rate {
                    child2.mutate(primitives, &mut rng);
                }
                next_gen.push(child1);
                next_gen.push(child2);
            }
            // pair-wise reproduction may overshoot an odd population by one
            next_gen.truncate(config.population_size);

            population = next_gen;
            generation += 1;
        }

        Ok(best_ever.expect("at least one generation was evaluated"))
    }
}
