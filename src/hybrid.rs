//! GA + tabu search pipeline.
//!
//! Runs the genetic search, hands its best chromosome to the tabu refiner
//! and decodes the refined result. The returned [`HybridResult`] is the only
//! output; rendering and persistence consume it outside the search.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::ga::{Chromosome, GaConfig, GaRunner};
use crate::models::{JobShopProblem, Schedule};
use crate::scheduler::{ScheduleEvaluator, ScheduleKpi};
use crate::tabu::{TabuConfig, TabuSearch, TabuTermination};
use crate::validation::ensure_valid;

/// Output of a hybrid run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridResult {
    /// Minimum population fitness per GA generation.
    pub fitness_evolution: Vec<i64>,
    /// Best makespan found by the GA.
    pub ga_makespan: i64,
    /// Makespan after tabu refinement (≤ `ga_makespan`).
    pub refined_makespan: i64,
    /// Refined operation order.
    pub chromosome: Chromosome,
    /// Decoded refined schedule.
    pub schedule: Schedule,
    /// Quality indicators of `schedule`.
    pub kpi: ScheduleKpi,
    /// Why the tabu phase stopped.
    pub tabu_termination: TabuTermination,
}

/// Two-phase optimizer: genetic search followed by tabu refinement.
///
/// # Example
/// ```
/// use u_jobshop::ga::GaConfig;
/// use u_jobshop::hybrid::HybridOptimizer;
/// use u_jobshop::models::JobShopProblem;
/// use u_jobshop::tabu::TabuConfig;
///
/// let problem = JobShopProblem::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// let optimizer = HybridOptimizer::new(
///     GaConfig::default().with_population_size(10).with_generations(10).with_seed(42),
///     TabuConfig::default().with_max_iterations(20),
/// );
/// let result = optimizer.run(&problem).unwrap();
/// assert!(result.refined_makespan <= result.ga_makespan);
/// ```
#[derive(Debug, Clone)]
pub struct HybridOptimizer {
    ga_config: GaConfig,
    tabu_config: TabuConfig,
}

impl HybridOptimizer {
    /// Creates an optimizer from both phase configurations.
    pub fn new(ga_config: GaConfig, tabu_config: TabuConfig) -> Self {
        Self {
            ga_config,
            tabu_config,
        }
    }

    /// GA phase configuration.
    pub fn ga_config(&self) -> &GaConfig {
        &self.ga_config
    }

    /// Tabu phase configuration.
    pub fn tabu_config(&self) -> &TabuConfig {
        &self.tabu_config
    }

    /// Runs with an RNG seeded from the GA seed, else the tabu seed, else
    /// OS entropy.
    pub fn run(&self, problem: &JobShopProblem) -> Result<HybridResult> {
        let mut rng = match self.ga_config.seed.or(self.tabu_config.seed) {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.run_with_rng(problem, &mut rng)
    }

    /// Runs both phases with one injected RNG.
    ///
    /// If `tabu_config.seed` is set, the tabu phase draws from its own RNG
    /// seeded with it instead.
    ///
    /// # Errors
    /// Invalid problem or configuration.
    pub fn run_with_rng<R: Rng>(
        &self,
        problem: &JobShopProblem,
        rng: &mut R,
    ) -> Result<HybridResult> {
        ensure_valid(problem)?;
        self.ga_config.validate()?;
        self.tabu_config.validate()?;

        let ga = GaRunner::run_with_rng(problem, &self.ga_config, rng)?;

        let evaluator = ScheduleEvaluator::new(problem);
        // The tabu phase starts from the decoded order of the GA's best.
        let start = Chromosome::new(
            evaluator
                .evaluate(&ga.best.chromosome.genes)?
                .schedule
                .operation_order(),
        );

        let search = TabuSearch::new(self.tabu_config.clone());
        let tabu = match self.tabu_config.seed {
            Some(_) => search.refine_seeded(problem, &start)?,
            None => search.refine(problem, &start, rng)?,
        };
        let refined = evaluator.evaluate(&tabu.chromosome.genes)?;
        let kpi = ScheduleKpi::calculate(&refined.schedule, problem);

        info!(
            ga_makespan = ga.best_makespan,
            refined_makespan = refined.makespan,
            lower_bound = kpi.lower_bound,
            "hybrid run finished"
        );

        Ok(HybridResult {
            fitness_evolution: ga.fitness_evolution,
            ga_makespan: ga.best_makespan,
            refined_makespan: refined.makespan,
            chromosome: tabu.chromosome,
            schedule: refined.schedule,
            kpi,
            tabu_termination: tabu.termination,
        })
    }
}
