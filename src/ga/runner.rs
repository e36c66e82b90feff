//! Generational GA loop.
//!
//! # Generation Step
//!
//! 1. Elites: best `elitism_size` valid individuals.
//! 2. Tournament-select the remaining slots and clone them.
//! 3. Pairwise crossover with `crossover_probability`.
//! 4. Per-offspring mutation with `mutation_probability`.
//! 5. Evaluate offspring whose fitness is stale.
//! 6. Next population = elites ∪ offspring.
//!
//! The population size never changes. If too few valid elites exist the loop
//! falls back to the best individuals regardless of validity.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::chromosome::{Chromosome, Individual};
use super::config::GaConfig;
use super::operators::{select_elites, tournament_selection};
use crate::error::Result;
use crate::models::JobShopProblem;
use crate::scheduler::ScheduleEvaluator;
use crate::validation::ensure_valid;

/// Outcome of a GA run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaResult {
    /// Best individual of the final population.
    pub best: Individual,
    /// Makespan of `best`.
    pub best_makespan: i64,
    /// Minimum fitness in the population after each generation.
    pub fitness_evolution: Vec<i64>,
    /// Generations completed (less than the budget if the time limit hit).
    pub generations_run: usize,
    /// Generations that had fewer valid elites than requested.
    pub degenerate_generations: usize,
    /// Population after the last generation.
    pub final_population: Vec<Individual>,
}

/// Runs the genetic search loop.
///
/// # Example
/// ```
/// use u_jobshop::ga::{GaConfig, GaRunner};
/// use u_jobshop::models::JobShopProblem;
///
/// let problem = JobShopProblem::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_seed(42);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// assert_eq!(result.fitness_evolution.len(), 5);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs with an RNG seeded from `config.seed` (OS entropy if unset).
    pub fn run(problem: &JobShopProblem, config: &GaConfig) -> Result<GaResult> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs with an injected RNG.
    ///
    /// # Errors
    /// Invalid configuration or problem.
    pub fn run_with_rng<R: Rng>(
        problem: &JobShopProblem,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<GaResult> {
        config.validate()?;
        ensure_valid(problem)?;

        let started = Instant::now();
        let evaluator = ScheduleEvaluator::new(problem);
        let operators = config.operators();

        let mut population = (0..config.population_size)
            .map(|_| {
                let chromosome = Chromosome::random(problem, rng);
                let fitness = evaluator.makespan(&chromosome.genes)?;
                Ok(Individual::evaluated(chromosome, fitness))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut fitness_evolution = Vec::with_capacity(config.generations);
        let mut degenerate_generations = 0;

        for generation in 0..config.generations {
            if config.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                info!(generation, "GA time limit reached");
                break;
            }

            let (mut elites, fallback) = select_elites(&population, config.elitism_size, problem);
            if fallback {
                warn!(
                    generation,
                    requested = config.elitism_size,
                    "too few valid elites, falling back to best available"
                );
                degenerate_generations += 1;
            }

            let mut offspring = tournament_selection(
                &population,
                config.population_size - elites.len(),
                config.tournament_size,
                rng,
            );

            for pair in offspring.chunks_exact_mut(2) {
                if rng.random_bool(config.crossover_probability) {
                    let (c1, c2) =
                        operators.crossover(&pair[0].chromosome, &pair[1].chromosome, problem, rng);
                    pair[0] = Individual::new(c1);
                    pair[1] = Individual::new(c2);
                }
            }

            for mutant in &mut offspring {
                if rng.random_bool(config.mutation_probability) {
                    operators.mutate(&mut mutant.chromosome, rng);
                    mutant.invalidate();
                }
            }

            for ind in offspring.iter_mut().filter(|i| !i.is_evaluated()) {
                debug_assert!(ind.chromosome.is_valid(problem));
                ind.fitness = Some(evaluator.makespan(&ind.chromosome.genes)?);
            }

            elites.extend(offspring);
            population = elites;

            let best = population
                .iter()
                .map(Individual::sort_key)
                .min()
                .unwrap_or(i64::MAX);
            fitness_evolution.push(best);
            debug!(generation, best_makespan = best, "GA generation complete");
        }

        let best = population
            .iter()
            .min_by_key(|ind| ind.sort_key())
            .cloned()
            .unwrap_or_else(|| Individual::new(Chromosome::random(problem, rng)));
        let best_makespan = match best.fitness {
            Some(f) => f,
            None => evaluator.makespan(&best.chromosome.genes)?,
        };

        info!(
            best_makespan,
            generations = fitness_evolution.len(),
            elapsed = ?started.elapsed(),
            "GA finished"
        );

        Ok(GaResult {
            best,
            best_makespan,
            generations_run: fitness_evolution.len(),
            fitness_evolution,
            degenerate_generations,
            final_population: population,
        })
    }
}
