//! Tabu Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Configuration parameters for the tabu refiner.
///
/// # Examples
///
/// ```
/// use u_jobshop::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7)
///     .with_neighborhood_size(20)
///     .with_stagnation_limit(50);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_tenure, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabuConfig {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Number of recently adopted solutions kept as tabu.
    pub tabu_tenure: usize,
    /// Admissible swap moves sampled per iteration.
    pub neighborhood_size: usize,
    /// Consecutive non-improving iterations before stopping.
    pub stagnation_limit: usize,
    /// Random seed (None for OS entropy).
    pub seed: Option<u64>,
    /// Wall-clock limit (None for no limit).
    pub time_limit: Option<Duration>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tabu_tenure: 5,
            neighborhood_size: 10,
            stagnation_limit: 100,
            seed: None,
            time_limit: None,
        }
    }
}

impl TabuConfig {
    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Sets the number of sampled neighbors per iteration.
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
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

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tabu_tenure", self.tabu_tenure),
            ("neighborhood_size", self.neighborhood_size),
            ("stagnation_limit", self.stagnation_limit),
        ] {
            if value == 0 {
                return Err(SchedulingError::InvalidConfig(format!(
                    "{name} must be positive"
                )));
            }
        }
        Ok(())
    }
}
