//! Precedence-aware tabu search over operation orders.
//!
//! # Iteration
//!
//! 1. Sample up to `neighborhood_size` admissible swaps of the current order.
//! 2. Drop neighbors that are tabu, unless they beat the best makespan
//!    (aspiration).
//! 3. Move to the best remaining neighbor, even if it is worse than the
//!    current solution.
//! 4. Record the new current solution in the tabu list.
//!
//! If every sampled neighbor is tabu the current solution is kept and the
//! iteration still counts toward the budget and the stagnation counter.
//!
//! Stops on the iteration budget, after `stagnation_limit` iterations
//! without a new best, when no admissible swap exists, or on the time limit.
//!
//! # Reference
//! Glover & Laguna (1997), "Tabu Search"

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::TabuConfig;
use super::memory::TabuList;
use crate::error::Result;
use crate::ga::Chromosome;
use crate::models::{JobShopProblem, OperationId};
use crate::scheduler::ScheduleEvaluator;

/// Why the tabu search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabuTermination {
    /// `max_iterations` completed.
    IterationBudget,
    /// No new best for `stagnation_limit` consecutive iterations.
    Stagnation,
    /// The current order has no admissible swap.
    DegenerateNeighborhood,
    /// Wall-clock limit reached.
    TimeLimit,
}

/// Outcome of a tabu refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabuResult {
    /// Best chromosome found (the input if nothing improved).
    pub chromosome: Chromosome,
    /// Makespan of `chromosome`; never above `initial_makespan`.
    pub makespan: i64,
    /// Makespan of the input chromosome.
    pub initial_makespan: i64,
    /// Iterations performed.
    pub iterations: usize,
    /// Stop reason.
    pub termination: TabuTermination,
    /// Largest tabu list size observed.
    pub peak_tabu_size: usize,
}

/// Tabu search refiner.
#[derive(Debug, Clone)]
pub struct TabuSearch {
    config: TabuConfig,
}

impl TabuSearch {
    /// Creates a refiner.
    pub fn new(config: TabuConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TabuConfig {
        &self.config
    }

    /// Refines with an RNG seeded from the config (OS entropy if unset).
    pub fn refine_seeded(
        &self,
        problem: &JobShopProblem,
        initial: &Chromosome,
    ) -> Result<TabuResult> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.refine(problem, initial, &mut rng)
    }

    /// Refines `initial` with an injected RNG.
    ///
    /// # Errors
    /// [`crate::error::SchedulingError::InvalidChromosome`] if `initial` is
    /// not a valid chromosome for `problem`; `InvalidConfig` for bad
    /// parameters.
    pub fn refine<R: Rng>(
        &self,
        problem: &JobShopProblem,
        initial: &Chromosome,
        rng: &mut R,
    ) -> Result<TabuResult> {
        self.config.validate()?;
        initial.check(problem)?;

        let started = Instant::now();
        let evaluator = ScheduleEvaluator::new(problem);
        let initial_makespan = evaluator.makespan(&initial.genes)?;

        let mut current = initial.genes.clone();
        let mut best = current.clone();
        let mut best_makespan = initial_makespan;
        let mut tabu = TabuList::new(self.config.tabu_tenure);
        let mut stagnation = 0;
        let mut iterations = 0;
        let mut peak_tabu_size = 0;
        let mut termination = TabuTermination::IterationBudget;

        for iteration in 0..self.config.max_iterations {
            if self
                .config
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                termination = TabuTermination::TimeLimit;
                break;
            }

            let moves = self.sample_moves(&current, rng);
            if moves.is_empty() {
                termination = TabuTermination::DegenerateNeighborhood;
                break;
            }

            let mut chosen: Option<(Vec<OperationId>, i64, u64)> = None;
            for (i, j) in moves {
                let mut neighbor = current.clone();
                neighbor.swap(i, j);
                let makespan = evaluator.makespan(&neighbor)?;
                let signature = TabuList::signature(&neighbor);

                if tabu.contains(signature) && makespan >= best_makespan {
                    continue;
                }
                if chosen.as_ref().map_or(true, |(_, m, _)| makespan < *m) {
                    chosen = Some((neighbor, makespan, signature));
                }
            }

            iterations += 1;

            // Every sampled neighbor tabu: stay put and count the iteration.
            let Some((neighbor, makespan, signature)) = chosen else {
                stagnation += 1;
                debug!(iteration, best_makespan, stagnation, "all neighbors tabu");
                if stagnation >= self.config.stagnation_limit {
                    termination = TabuTermination::Stagnation;
                    break;
                }
                continue;
            };

            current = neighbor;
            if makespan < best_makespan {
                best.clone_from(&current);
                best_makespan = makespan;
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            tabu.push(signature);
            peak_tabu_size = peak_tabu_size.max(tabu.len());

            debug!(
                iteration,
                current_makespan = makespan,
                best_makespan,
                stagnation,
                "tabu iteration complete"
            );

            if stagnation >= self.config.stagnation_limit {
                termination = TabuTermination::Stagnation;
                break;
            }
        }

        info!(
            initial_makespan,
            best_makespan,
            iterations,
            ?termination,
            "tabu search finished"
        );

        Ok(TabuResult {
            chromosome: Chromosome::new(best),
            makespan: best_makespan,
            initial_makespan,
            iterations,
            termination,
            peak_tabu_size,
        })
    }

    /// Samples up to `neighborhood_size` distinct admissible swaps.
    fn sample_moves<R: Rng>(&self, genes: &[OperationId], rng: &mut R) -> Vec<(usize, usize)> {
        let moves = admissible_swaps(genes);
        let wanted = self.config.neighborhood_size;
        if moves.len() <= wanted {
            return moves;
        }
        index::sample(rng, moves.len(), wanted)
            .into_iter()
            .map(|k| moves[k])
            .collect()
    }
}

/// Whether swapping positions `i < j` keeps the precedence invariant.
///
/// The genes must belong to different jobs, and neither job may have another
/// operation strictly between the two positions.
pub fn is_admissible_swap(genes: &[OperationId], i: usize, j: usize) -> bool {
    if i >= j || j >= genes.len() {
        return false;
    }
    let (a, b) = (genes[i].job, genes[j].job);
    a != b && !genes[i + 1..j].iter().any(|g| g.job == a || g.job == b)
}

/// All admissible swaps `(i, j)`, `i < j`, in lexicographic order.
///
/// For each `i`, the partners are the first occurrence of every other job
/// before the next operation of `genes[i]`'s job.
pub fn admissible_swaps(genes: &[OperationId]) -> Vec<(usize, usize)> {
    let job_count = genes.iter().map(|g| g.job + 1).max().unwrap_or(0);
    let mut seen = vec![false; job_count];
    let mut touched = Vec::new();
    let mut moves = Vec::new();

    for (i, gi) in genes.iter().enumerate() {
        for (j, gj) in genes.iter().enumerate().skip(i + 1) {
            if gj.job == gi.job {
                break;
            }
            if !seen[gj.job] {
                seen[gj.job] = true;
                touched.push(gj.job);
                moves.push((i, j));
            }
        }
        for job in touched.drain(..) {
            seen[job] = false;
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulingError;

    fn two_by_two() -> JobShopProblem {
        JobShopProblem::from_pairs(2, vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]])
    }

    fn ft06_like() -> JobShopProblem {
        JobShopProblem::from_pairs(
            4,
            vec![
                vec![(0, 3), (1, 2), (2, 2), (3, 4)],
                vec![(1, 2), (0, 5), (3, 1), (2, 3)],
                vec![(2, 4), (3, 3), (0, 2), (1, 1)],
                vec![(3, 2), (2, 1), (1, 4), (0, 3)],
            ],
        )
    }

    fn ids(pairs: &[(usize, usize)]) -> Vec<OperationId> {
        pairs.iter().map(|&(j, o)| OperationId::new(j, o)).collect()
    }

    #[test]
    fn test_admissible_swap_rules() {
        let genes = ids(&[(0, 0), (1, 0), (0, 1), (2, 0), (1, 1)]);
        assert!(is_admissible_swap(&genes, 0, 1));
        assert!(is_admissible_swap(&genes, 2, 3));
        // Same job.
        assert!(!is_admissible_swap(&genes, 0, 2));
        // J0-T0 would land after its successor J0-T1.
        assert!(!is_admissible_swap(&genes, 0, 3));
        // J2-T0 <-> J1-T1 with nothing of jobs 1/2 between.
        assert!(is_admissible_swap(&genes, 3, 4));
        // J1-T0 <-> J2-T0 with J0-T1 between is fine.
        assert!(is_admissible_swap(&genes, 1, 3));
        assert!(!is_admissible_swap(&genes, 3, 1));
        assert!(!is_admissible_swap(&genes, 3, 9));
    }

    #[test]
    fn test_enumeration_matches_predicate() {
        let genes = ids(&[(0, 0), (1, 0), (0, 1), (2, 0), (1, 1)]);
        let expected: Vec<(usize, usize)> = (0..genes.len())
            .flat_map(|i| (i + 1..genes.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| is_admissible_swap(&genes, i, j))
            .collect();
        assert_eq!(admissible_swaps(&genes), expected);
        assert_eq!(expected, vec![(0, 1), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_admissible_swaps_keep_validity() {
        let problem = ft06_like();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = Chromosome::random(&problem, &mut rng);
        for i in 0..ch.len() {
            for j in i + 1..ch.len() {
                if is_admissible_swap(&ch.genes, i, j) {
                    let mut swapped = ch.clone();
                    swapped.genes.swap(i, j);
                    assert!(swapped.is_valid(&problem), "swap ({i}, {j})");
                }
            }
        }
    }

    #[test]
    fn test_finds_optimum_on_two_by_two() {
        let problem = two_by_two();
        let initial = Chromosome::new(ids(&[(0, 0), (0, 1), (1, 0), (1, 1)]));
        let search = TabuSearch::new(
            TabuConfig::default()
                .with_neighborhood_size(20)
                .with_max_iterations(20),
        );
        let mut rng = SmallRng::seed_from_u64(42);
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert_eq!(result.initial_makespan, 10);
        assert_eq!(result.makespan, 6);
        assert!(result.chromosome.is_valid(&problem));
    }

    #[test]
    fn test_stagnation_stops_search() {
        let problem = two_by_two();
        let initial = Chromosome::new(ids(&[(0, 0), (0, 1), (1, 0), (1, 1)]));
        let search = TabuSearch::new(
            TabuConfig::default()
                .with_tabu_tenure(1)
                .with_neighborhood_size(20)
                .with_stagnation_limit(3)
                .with_max_iterations(100),
        );
        let mut rng = SmallRng::seed_from_u64(42);
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert_eq!(result.termination, TabuTermination::Stagnation);
        // One improving move, then three without a new best.
        assert_eq!(result.iterations, 4);
        assert_eq!(result.makespan, 6);
    }

    #[test]
    fn test_single_job_is_degenerate() {
        let problem = JobShopProblem::from_pairs(2, vec![vec![(0, 2), (1, 3), (0, 1)]]);
        let initial = Chromosome::new(ids(&[(0, 0), (0, 1), (0, 2)]));
        let search = TabuSearch::new(TabuConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert_eq!(result.termination, TabuTermination::DegenerateNeighborhood);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.makespan, 6);
        assert_eq!(result.chromosome, initial);
    }

    #[test]
    fn test_all_tabu_neighborhood_keeps_searching() {
        // One admissible swap; both orders become tabu after two moves.
        let problem = JobShopProblem::from_pairs(2, vec![vec![(0, 3)], vec![(1, 4)]]);
        let initial = Chromosome::new(ids(&[(0, 0), (1, 0)]));
        let search = TabuSearch::new(
            TabuConfig::default()
                .with_tabu_tenure(5)
                .with_max_iterations(50)
                .with_stagnation_limit(100),
        );
        let mut rng = SmallRng::seed_from_u64(42);
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert_eq!(result.termination, TabuTermination::IterationBudget);
        assert_eq!(result.iterations, 50);
        assert_eq!(result.peak_tabu_size, 2);
        assert_eq!(result.makespan, 4);
    }

    #[test]
    fn test_all_tabu_iterations_count_as_stagnation() {
        let problem = JobShopProblem::from_pairs(2, vec![vec![(0, 3)], vec![(1, 4)]]);
        let initial = Chromosome::new(ids(&[(0, 0), (1, 0)]));
        let search = TabuSearch::new(
            TabuConfig::default()
                .with_tabu_tenure(5)
                .with_max_iterations(50)
                .with_stagnation_limit(10),
        );
        let mut rng = SmallRng::seed_from_u64(42);
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert_eq!(result.termination, TabuTermination::Stagnation);
        assert_eq!(result.iterations, 10);
        assert_eq!(result.chromosome, initial);
    }

    #[test]
    fn test_never_regresses() {
        let problem = ft06_like();
        let mut rng = SmallRng::seed_from_u64(42);
        let search = TabuSearch::new(TabuConfig::default().with_max_iterations(50));
        for _ in 0..10 {
            let initial = Chromosome::random(&problem, &mut rng);
            let result = search.refine(&problem, &initial, &mut rng).unwrap();
            assert!(result.makespan <= result.initial_makespan);
            assert!(result.chromosome.is_valid(&problem));
            let evaluator = ScheduleEvaluator::new(&problem);
            assert_eq!(evaluator.makespan(&result.chromosome.genes).unwrap(), result.makespan);
        }
    }

    #[test]
    fn test_tabu_list_bounded_by_tenure() {
        let problem = ft06_like();
        let mut rng = SmallRng::seed_from_u64(7);
        let initial = Chromosome::random(&problem, &mut rng);
        let search = TabuSearch::new(
            TabuConfig::default()
                .with_tabu_tenure(3)
                .with_max_iterations(60),
        );
        let result = search.refine(&problem, &initial, &mut rng).unwrap();
        assert!(result.iterations > 3);
        assert!(result.peak_tabu_size <= 3);
        assert_eq!(result.peak_tabu_size, 3);
    }

    #[test]
    fn test_rejects_invalid_start() {
        let problem = two_by_two();
        let initial = Chromosome::new(ids(&[(0, 1), (0, 0), (1, 0), (1, 1)]));
        let search = TabuSearch::new(TabuConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let err = search.refine(&problem, &initial, &mut rng).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidChromosome(_)));
    }

    #[test]
    fn test_seeded_refine_is_reproducible() {
        let problem = ft06_like();
        let mut rng = SmallRng::seed_from_u64(1);
        let initial = Chromosome::random(&problem, &mut rng);
        let search = TabuSearch::new(TabuConfig::default().with_seed(99));
        let a = search.refine_seeded(&problem, &initial).unwrap();
        let b = search.refine_seeded(&problem, &initial).unwrap();
        assert_eq!(a.chromosome, b.chromosome);
        assert_eq!(a.iterations, b.iterations);
    }
}
