//! Genetic algorithm configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::operators::{CrossoverType, GeneticOperators, MutationType};
use crate::error::{Result, SchedulingError};

/// Configuration parameters for the genetic search loop.
///
/// # Examples
///
/// ```
/// use u_jobshop::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(100)
///     .with_generations(150)
///     .with_crossover_probability(0.7)
///     .with_mutation_probability(0.2)
///     .with_seed(42);
/// assert_eq!(config.population_size, 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of individuals, constant across generations.
    pub population_size: usize,
    /// Probability that a parent pair undergoes crossover.
    pub crossover_probability: f64,
    /// Probability that an offspring is mutated.
    pub mutation_probability: f64,
    /// Generation budget.
    pub generations: usize,
    /// Individuals copied unchanged into the next generation.
    pub elitism_size: usize,
    /// Entrants per selection tournament.
    pub tournament_size: usize,
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
    /// Random seed (None for OS entropy).
    pub seed: Option<u64>,
    /// Wall-clock limit for the whole run (None for no limit).
    pub time_limit: Option<Duration>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            crossover_probability: 0.6,
            mutation_probability: 0.1,
            generations: 100,
            elitism_size: 1,
            tournament_size: 3,
            crossover_type: CrossoverType::SinglePoint,
            mutation_type: MutationType::Scramble,
            seed: None,
            time_limit: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the number of elites.
    pub fn with_elitism_size(mut self, n: usize) -> Self {
        self.elitism_size = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover_type(mut self, crossover_type: CrossoverType) -> Self {
        self.crossover_type = crossover_type;
        self
    }

    /// Sets the mutation strategy.
    pub fn with_mutation_type(mut self, mutation_type: MutationType) -> Self {
        self.mutation_type = mutation_type;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Operators selected by this configuration.
    pub fn operators(&self) -> GeneticOperators {
        GeneticOperators {
            crossover_type: self.crossover_type,
            mutation_type: self.mutation_type,
        }
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    /// [`SchedulingError::InvalidConfig`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SchedulingError::InvalidConfig(
                "population_size must be positive".into(),
            ));
        }
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SchedulingError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.elitism_size > self.population_size {
            return Err(SchedulingError::InvalidConfig(format!(
                "elitism_size ({}) exceeds population_size ({})",
                self.elitism_size, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(SchedulingError::InvalidConfig(
                "tournament_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.operators(), GeneticOperators::default());
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let err = GaConfig::default()
            .with_crossover_probability(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidConfig(_)));

        let nan = GaConfig::default().with_mutation_probability(f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_elitism() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_elitism_size(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_population_and_tournament() {
        assert!(GaConfig::default().with_population_size(0).validate().is_err());
        assert!(GaConfig::default().with_tournament_size(0).validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "population_size": 200,
            "crossover_probability": 0.8,
            "mutation_probability": 0.3,
            "generations": 150,
            "elitism_size": 2,
            "tournament_size": 3,
            "crossover_type": "Uniform",
            "mutation_type": "Scramble",
            "seed": 7,
            "time_limit": null
        }"#;
        let config: GaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.population_size, 200);
        assert_eq!(config.crossover_type, CrossoverType::Uniform);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }
}
