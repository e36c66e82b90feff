//! Operation-order chromosome for job-shop scheduling.
//!
//! # Encoding
//!
//! A chromosome is a permutation of every `(job, operation)` pair. For every
//! job, its operations appear in ascending operation-index order (precedence
//! invariant). Decoding walks the permutation left to right; see
//! [`crate::scheduler::ScheduleEvaluator`].
//!
//! Crossover can break both coverage and order, so children pass through
//! [`repair`] and, if that under-produces, are replaced by a fresh random
//! chromosome ([`repair_or_regenerate`]).
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::models::{JobShopProblem, OperationId};

/// Precedence-respecting operation permutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chromosome {
    /// Operations in dispatch order.
    pub genes: Vec<OperationId>,
}

impl Chromosome {
    /// Wraps a gene sequence without checking it.
    pub fn new(genes: Vec<OperationId>) -> Self {
        Self { genes }
    }

    /// Creates a random valid chromosome.
    ///
    /// Shuffles the order of jobs and concatenates each job's operations in
    /// index order, so the result is valid by construction.
    pub fn random<R: Rng>(problem: &JobShopProblem, rng: &mut R) -> Self {
        let mut job_order: Vec<usize> = (0..problem.job_count()).collect();
        job_order.shuffle(rng);

        let mut genes = Vec::with_capacity(problem.operation_count());
        for job in job_order {
            let count = problem.jobs[job].operations.len();
            genes.extend((0..count).map(|op| OperationId::new(job, op)));
        }
        Self { genes }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Checks coverage and precedence against `problem`.
    ///
    /// # Errors
    /// [`SchedulingError::InvalidChromosome`] describing the first defect.
    pub fn check(&self, problem: &JobShopProblem) -> Result<()> {
        let mut next = vec![0usize; problem.job_count()];

        for &id in &self.genes {
            let Some(expected) = next.get_mut(id.job) else {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "unknown job in {id}"
                )));
            };
            if id.op != *expected {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "{id} found where J{}-T{} was expected",
                    id.job, *expected
                )));
            }
            *expected += 1;
        }

        for (job, (&seen, j)) in next.iter().zip(&problem.jobs).enumerate() {
            if seen != j.operations.len() {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "job {job} has {seen} of {} operations",
                    j.operations.len()
                )));
            }
        }
        Ok(())
    }

    /// Whether the chromosome is an exact, precedence-respecting cover.
    pub fn is_valid(&self, problem: &JobShopProblem) -> bool {
        self.check(problem).is_ok()
    }
}

/// A chromosome with its cached makespan.
///
/// `fitness` is `None` until evaluated and is reset whenever the chromosome
/// changes. Lower is better.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Encoded solution.
    pub chromosome: Chromosome,
    /// Cached makespan; `None` = not evaluated / stale.
    pub fitness: Option<i64>,
}

impl Individual {
    /// Creates an unevaluated individual.
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    /// Creates an individual with a known fitness.
    pub fn evaluated(chromosome: Chromosome, fitness: i64) -> Self {
        Self {
            chromosome,
            fitness: Some(fitness),
        }
    }

    /// Marks the cached fitness as stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Whether fitness is current.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness for ordering; unevaluated individuals sort last.
    #[inline]
    pub fn sort_key(&self) -> i64 {
        self.fitness.unwrap_or(i64::MAX)
    }
}

/// Repairs a child against a valid reference parent.
///
/// For each job, the reference gives the expected operation order. Walking
/// the child, a gene is kept only if it is the next expected operation of
/// its job. This removes duplicates and out-of-order genes; it can also drop
/// operations, so the result may be shorter than the reference.
pub fn repair(child: &[OperationId], reference: &[OperationId]) -> Chromosome {
    let mut expected: HashMap<usize, Vec<usize>> = HashMap::new();
    for id in reference {
        expected.entry(id.job).or_default().push(id.op);
    }

    let mut cursor: HashMap<usize, usize> = HashMap::with_capacity(expected.len());
    let mut genes = Vec::with_capacity(child.len());

    for &id in child {
        let Some(order) = expected.get(&id.job) else {
            continue;
        };
        let pos = cursor.entry(id.job).or_insert(0);
        if order.get(*pos) == Some(&id.op) {
            genes.push(id);
            *pos += 1;
        }
    }

    Chromosome { genes }
}

/// Repairs `child`, falling back to a fresh random chromosome when the repaired
/// result does not cover `problem`.
pub fn repair_or_regenerate<R: Rng>(
    child: &[OperationId],
    reference: &[OperationId],
    problem: &JobShopProblem,
    rng: &mut R,
) -> Chromosome {
    let repaired = repair(child, reference);
    match repaired.check(problem) {
        Ok(()) => repaired,
        Err(e) => {
            tracing::trace!(reason = %e, "repair under-produced, regenerating chromosome");
            Chromosome::random(problem, rng)
        }
    }
}
