//! Job and operation model.
//!
//! A job is a fixed sequence of operations. Each operation runs on exactly
//! one machine for a fixed duration, and the operations of a job must be
//! processed in index order.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an operation: (job index, operation index within the job).
///
/// This is the gene type of the permutation encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId {
    /// Job index (0-based).
    pub job: usize,
    /// Operation index within the job (0-based).
    pub op: usize,
}

impl OperationId {
    /// Creates an operation identifier.
    #[inline]
    pub fn new(job: usize, op: usize) -> Self {
        Self { job, op }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}-T{}", self.job, self.op)
    }
}

/// A single processing step of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Machine that must process this operation (0-based).
    pub machine: usize,
    /// Processing time (time units).
    pub duration: i64,
}

impl Operation {
    /// Creates an operation.
    pub fn new(machine: usize, duration: i64) -> Self {
        Self { machine, duration }
    }
}

/// A job: an ordered sequence of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Operations in processing order.
    pub operations: Vec<Operation>,
}

impl Job {
    /// Creates an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn with_operation(mut self, machine: usize, duration: i64) -> Self {
        self.operations.push(Operation::new(machine, duration));
        self
    }

    /// Total processing time across all operations.
    pub fn total_duration(&self) -> i64 {
        self.operations.iter().map(|o| o.duration).sum()
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

/// Static description of a job-shop instance.
///
/// Consumed read-only by every search component.
///
/// # Example
/// ```
/// use u_jobshop::models::JobShopProblem;
///
/// let problem = JobShopProblem::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// assert_eq!(problem.job_count(), 2);
/// assert_eq!(problem.operation_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobShopProblem {
    /// Number of machines; valid machine ids are `0..num_machines`.
    pub num_machines: usize,
    /// Jobs in index order.
    pub jobs: Vec<Job>,
}

impl JobShopProblem {
    /// Creates a problem from jobs.
    pub fn new(num_machines: usize, jobs: Vec<Job>) -> Self {
        Self { num_machines, jobs }
    }

    /// Creates a problem from per-job `(machine, duration)` lists.
    pub fn from_pairs(num_machines: usize, jobs: Vec<Vec<(usize, i64)>>) -> Self {
        let jobs = jobs
            .into_iter()
            .map(|pairs| Job {
                operations: pairs
                    .into_iter()
                    .map(|(machine, duration)| Operation::new(machine, duration))
                    .collect(),
            })
            .collect();
        Self { num_machines, jobs }
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Total number of operations across all jobs.
    pub fn operation_count(&self) -> usize {
        self.jobs.iter().map(Job::operation_count).sum()
    }

    /// Looks up an operation.
    #[inline]
    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.jobs.get(id.job).and_then(|j| j.operations.get(id.op))
    }

    /// All operation ids in job-major order.
    pub fn operation_ids(&self) -> Vec<OperationId> {
        self.jobs
            .iter()
            .enumerate()
            .flat_map(|(job, j)| (0..j.operations.len()).map(move |op| OperationId::new(job, op)))
            .collect()
    }

    /// Total processing time per machine.
    pub fn machine_loads(&self) -> Vec<i64> {
        let mut loads = vec![0; self.num_machines];
        for op in self.jobs.iter().flat_map(|j| &j.operations) {
            if let Some(load) = loads.get_mut(op.machine) {
                *load += op.duration;
            }
        }
        loads
    }

    /// Trivial makespan lower bound: max of longest job and most-loaded machine.
    pub fn lower_bound(&self) -> i64 {
        let job_bound = self.jobs.iter().map(Job::total_duration).max().unwrap_or(0);
        let machine_bound = self.machine_loads().into_iter().max().unwrap_or(0);
        job_bound.max(machine_bound)
    }
}
