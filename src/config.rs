//! Engine configuration.
//!
//! [`EngineConfig`] holds every parameter of the evolutionary loop, with
//! defaults suitable for small symbolic problems. All builder methods are
//! chainable; rates are clamped into `[0, 1]`.

use crate::error::GpError;
use crate::selection::Selection;

/// Configuration for the GP engine.
///
/// # Defaults
///
/// ```
/// use treegp::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.max_depth, 6);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use treegp::{EngineConfig, Selection};
///
/// let config = EngineConfig::default()
///     .with_population_size(500)
///     .with_selection(Selection::Ranked)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of candidates in the population.
    pub population_size: usize,

    /// Tournament size when [`Selection::Tournament`] is used via
    /// [`with_tournament_size`](EngineConfig::with_tournament_size).
    pub tournament_size: usize,

    /// Fraction of the population carried unchanged into the next
    /// generation (0.0–1.0).
    pub elitism_rate: f64,

    /// Probability that a parent pair is actually crossed over rather
    /// than copied (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability that each child is mutated (0.0–1.0).
    pub mutation_rate: f64,

    /// Generations that must complete before any termination check.
    pub min_generations: usize,

    /// Hard upper bound on generations.
    pub max_generations: usize,

    /// Generations without best-average-fitness improvement before
    /// stopping (checked only once `min_generations` have run).
    pub stagnation_limit: usize,

    /// Minimum depth of randomly built trees.
    pub min_depth: usize,

    /// Maximum depth of randomly built trees.
    pub max_depth: usize,

    /// Whether lower fitness values are better (minimization).
    pub lower_is_better: bool,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Whether to evaluate candidates in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            tournament_size: 4,
            elitism_rate: 0.10,
            crossover_rate: 0.95,
            mutation_rate: 0.01,
            min_generations: 10,
            max_generations: 500,
            stagnation_limit: 12,
            min_depth: 3,
            max_depth: 6,
            lower_is_better: true,
            selection: Selection::Tournament(4),
            parallel: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the tournament size and switches selection to
    /// [`Selection::Tournament`].
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self.selection = Selection::Tournament(k);
        self
    }

    /// Sets the elitism rate.
    pub fn with_elitism_rate(mut self, rate: f64) -> Self {
        self.elitism_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum number of generations.
    pub fn with_min_generations(mut self, n: usize) -> Self {
        self.min_generations = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the depth bounds for randomly built trees.
    pub fn with_depth_bounds(mut self, min_depth: usize, max_depth: usize) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    /// Sets the fitness direction.
    pub fn with_lower_is_better(mut self, lower: bool) -> Self {
        self.lower_is_better = lower;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), GpError> {
        if self.population_size < 2 {
            return Err(GpError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(GpError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.min_generations > self.max_generations {
            return Err(GpError::InvalidConfig(format!(
                "min_generations ({}) exceeds max_generations ({})",
                self.min_generations, self.max_generations
            )));
        }
        if self.min_depth < 1 {
            return Err(GpError::InvalidConfig("min_depth must be at least 1".into()));
        }
        if self.min_depth > self.max_depth {
            return Err(GpError::InvalidConfig(format!(
                "min_depth ({}) exceeds max_depth ({})",
                self.min_depth, self.max_depth
            )));
        }
        if self.tournament_size == 0 {
            return Err(GpError::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(GpError::InvalidConfig(
                "tournament selection requires size at least 1".into(),
            ));
        }
        let elite_count = (self.population_size as f64 * self.elitism_rate) as usize;
        if elite_count >= self.population_size {
            return Err(GpError::InvalidConfig(
                "elitism_rate too high: elites fill entire population".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.population_size, 200);
        assert_eq!(config.tournament_size, 4);
        assert!((config.elitism_rate - 0.10).abs() < 1e-10);
        assert!((config.crossover_rate - 0.95).abs() < 1e-10);
        assert!((config.mutation_rate - 0.01).abs() < 1e-10);
        assert_eq!(config.min_generations, 10);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.stagnation_limit, 12);
        assert_eq!(config.min_depth, 3);
        assert_eq!(config.max_depth, 6);
        assert!(config.lower_is_better);
        assert_eq!(config.selection, Selection::Tournament(4));
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_population_size(50)
            .with_tournament_size(7)
            .with_elitism_rate(0.2)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.05)
            .with_min_generations(5)
            .with_max_generations(100)
            .with_stagnation_limit(8)
            .with_depth_bounds(2, 4)
            .with_lower_is_better(false)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 50);
        assert_eq!(config.selection, Selection::Tournament(7));
        assert!((config.elitism_rate - 0.2).abs() < 1e-10);
        assert_eq!(config.min_generations, 5);
        assert_eq!(config.max_generations, 100);
        assert_eq!(config.stagnation_limit, 8);
        assert_eq!((config.min_depth, config.max_depth), (2, 4));
        assert!(!config.lower_is_better);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_rates_are_clamped() {
        let config = EngineConfig::default()
            .with_elitism_rate(0.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);
        assert!((config.elitism_rate - 0.5).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_population_too_small() {
        assert!(EngineConfig::default().with_population_size(1).validate().is_err());
    }

    #[test]
    fn test_validate_generation_bounds() {
        assert!(EngineConfig::default().with_max_generations(0).validate().is_err());
        assert!(EngineConfig::default()
            .with_min_generations(100)
            .with_max_generations(10)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_depth_bounds() {
        assert!(EngineConfig::default().with_depth_bounds(0, 4).validate().is_err());
        assert!(EngineConfig::default().with_depth_bounds(5, 3).validate().is_err());
        assert!(EngineConfig::default().with_depth_bounds(3, 3).validate().is_ok());
    }

    #[test]
    fn test_validate_elitism_fills_population() {
        let config = EngineConfig::default()
            .with_population_size(10)
            .with_elitism_rate(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = EngineConfig::default().with_selection(Selection::Tournament(0));
        assert!(config.validate().is_err());
    }
}
