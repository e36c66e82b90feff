//! Configurable genetic operators for job-shop chromosomes.
//!
//! Provides runtime-selectable crossover and mutation strategies via
//! [`GeneticOperators`], plus elitism and tournament selection.
//!
//! Every operator returns chromosomes that satisfy the precedence invariant
//! and cover every operation exactly once.
//!
//! # Usage
//!
//! ```
//! use u_jobshop::ga::operators::{CrossoverType, GeneticOperators, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::SinglePoint);
//! assert_eq!(ops.mutation_type, MutationType::Scramble);
//! ```

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{repair_or_regenerate, Chromosome, Individual};
use crate::models::{JobShopProblem, OperationId};

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Splice both parents at one random cut point.
    SinglePoint,
    /// Exchange donors per position with probability 0.5.
    Uniform,
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Re-sort a random segment by job, ascending operation index.
    Scramble,
    /// Swap one random adjacent pair of operations from different jobs.
    AdjacentSwap,
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_jobshop::ga::operators::{CrossoverType, GeneticOperators, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::Uniform,
///     mutation_type: MutationType::AdjacentSwap,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::SinglePoint,
            mutation_type: MutationType::Scramble,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Chromosome,
        p2: &Chromosome,
        problem: &JobShopProblem,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        match self.crossover_type {
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, problem, rng),
            CrossoverType::Uniform => uniform_crossover(p1, p2, problem, rng),
        }
    }

    /// Performs mutation using the configured strategy.
    pub fn mutate<R: Rng>(&self, chromosome: &mut Chromosome, rng: &mut R) {
        match self.mutation_type {
            MutationType::Scramble => scramble_mutation(chromosome, rng),
            MutationType::AdjacentSwap => adjacent_swap_mutation(chromosome, rng),
        }
    }
}

// ======================== Crossover operators ========================

/// Single-point crossover.
///
/// Picks a cut in `1..len`; child 1 = `p1[..cut] ++ p2[cut..]`, child 2 =
/// `p2[..cut] ++ p1[cut..]`. Child k is repaired against parent k.
pub fn single_point_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    problem: &JobShopProblem,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..len);

    let raw1: Vec<OperationId> = p1.genes[..cut].iter().chain(&p2.genes[cut..]).copied().collect();
    let raw2: Vec<OperationId> = p2.genes[..cut].iter().chain(&p1.genes[cut..]).copied().collect();

    (
        repair_or_regenerate(&raw1, &p1.genes, problem, rng),
        repair_or_regenerate(&raw2, &p2.genes, problem, rng),
    )
}

/// Uniform crossover.
///
/// For each position, child 1 takes parent 1's gene and child 2 parent 2's
/// with probability 0.5, otherwise the donors are exchanged.
pub fn uniform_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    problem: &JobShopProblem,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return (p1.clone(), p2.clone());
    }

    let mut raw1 = Vec::with_capacity(len);
    let mut raw2 = Vec::with_capacity(len);
    for (&a, &b) in p1.genes.iter().zip(&p2.genes) {
        if rng.random_bool(0.5) {
            raw1.push(a);
            raw2.push(b);
        } else {
            raw1.push(b);
            raw2.push(a);
        }
    }

    (
        repair_or_regenerate(&raw1, &p1.genes, problem, rng),
        repair_or_regenerate(&raw2, &p2.genes, problem, rng),
    )
}

// ======================== Mutation operators ========================

/// Scramble mutation.
///
/// Picks two distinct positions `start < end` and rewrites `[start, end)`
/// grouped by job (ascending job index), each job's operations in ascending
/// index. Every job's operations inside a segment form a contiguous run of
/// its sequence, so the invariant survives.
pub fn scramble_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let len = chromosome.len();
    if len < 2 {
        return;
    }
    let picked = index::sample(rng, len, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    let (start, end) = if a < b { (a, b) } else { (b, a) };

    let segment = &mut chromosome.genes[start..end];
    segment.sort_unstable();
}

/// Adjacent swap mutation.
///
/// Swaps a random neighboring pair whose operations belong to different
/// jobs. No-op if every neighboring pair shares a job.
pub fn adjacent_swap_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let candidates: Vec<usize> = chromosome
        .genes
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].job != w[1].job)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }
    let i = candidates[rng.random_range(0..candidates.len())];
    chromosome.genes.swap(i, i + 1);
}

// ======================== Elitism & selection ========================

/// Returns up to `elitism_size` best individuals, ascending by fitness.
///
/// With `require_valid`, individuals whose chromosome breaks coverage or
/// precedence are skipped. The result is never padded, so it may be shorter
/// than `elitism_size`.
pub fn apply_elitism(
    population: &[Individual],
    elitism_size: usize,
    problem: &JobShopProblem,
    require_valid: bool,
) -> Vec<Individual> {
    let mut ranked: Vec<&Individual> = population.iter().collect();
    ranked.sort_by_key(|ind| ind.sort_key());

    ranked
        .into_iter()
        .filter(|ind| !require_valid || ind.chromosome.is_valid(problem))
        .take(elitism_size)
        .cloned()
        .collect()
}

/// Elites for the next generation.
///
/// Prefers valid individuals. If fewer than `elitism_size` valid ones exist,
/// falls back to the best `elitism_size` regardless of validity and reports
/// `true` as the second value.
pub fn select_elites(
    population: &[Individual],
    elitism_size: usize,
    problem: &JobShopProblem,
) -> (Vec<Individual>, bool) {
    let elites = apply_elitism(population, elitism_size, problem, true);
    if elites.len() >= elitism_size.min(population.len()) {
        return (elites, false);
    }
    (apply_elitism(population, elitism_size, problem, false), true)
}

/// Tournament selection.
///
/// Runs `count` independent tournaments. Each samples
/// `min(tournament_size, len)` distinct members and keeps the one with the
/// lowest fitness. Returns clones.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }
    let k = tournament_size.clamp(1, population.len());

    (0..count)
        .filter_map(|_| {
            index::sample(rng, population.len(), k)
                .into_iter()
                .map(|i| &population[i])
                .min_by_key(|ind| ind.sort_key())
                .cloned()
        })
        .collect()
}
