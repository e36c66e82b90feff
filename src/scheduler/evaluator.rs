//! Makespan evaluator (list-scheduling decoder).
//!
//! # Algorithm
//!
//! Walks the operation order once, keeping the time each job's next
//! operation may start and the time each machine becomes free. Every
//! operation starts at `max(job ready, machine free)`.
//!
//! The decoder trusts the per-job ordering of the input; it only checks that
//! every operation appears exactly once. Ordering is enforced by the encoding
//! layer ([`crate::ga::Chromosome`]).
//!
//! # Complexity
//! O(n) in the number of operations.

use crate::error::{Result, SchedulingError};
use crate::models::{Assignment, JobShopProblem, OperationId, Schedule};

/// Result of decoding an operation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Latest end time across all operations.
    pub makespan: i64,
    /// Timed schedule, one assignment per operation in decoding order.
    pub schedule: Schedule,
}

/// Decodes operation orders into schedules for one problem.
#[derive(Debug, Clone)]
pub struct ScheduleEvaluator<'a> {
    problem: &'a JobShopProblem,
    /// Flat index of each job's first operation.
    offsets: Vec<usize>,
    total: usize,
}

impl<'a> ScheduleEvaluator<'a> {
    /// Creates an evaluator bound to `problem`.
    pub fn new(problem: &'a JobShopProblem) -> Self {
        let mut offsets = Vec::with_capacity(problem.jobs.len());
        let mut total = 0;
        for job in &problem.jobs {
            offsets.push(total);
            total += job.operations.len();
        }
        Self {
            problem,
            offsets,
            total,
        }
    }

    /// The problem this evaluator decodes against.
    pub fn problem(&self) -> &'a JobShopProblem {
        self.problem
    }

    /// Decodes `order` into a schedule and its makespan.
    ///
    /// # Errors
    /// [`SchedulingError::InvalidChromosome`] if `order` is not an exact
    /// cover of the problem's operations.
    pub fn evaluate(&self, order: &[OperationId]) -> Result<Evaluation> {
        let mut schedule = Schedule::with_capacity(order.len());
        let makespan = self.simulate(order, |a| schedule.add_assignment(a))?;
        Ok(Evaluation { makespan, schedule })
    }

    /// Makespan only; skips building the schedule.
    pub fn makespan(&self, order: &[OperationId]) -> Result<i64> {
        self.simulate(order, |_| {})
    }

    fn simulate<F>(&self, order: &[OperationId], mut record: F) -> Result<i64>
    where
        F: FnMut(Assignment),
    {
        self.check_coverage(order)?;

        let mut job_ready = vec![0i64; self.problem.jobs.len()];
        let mut machine_free = vec![0i64; self.problem.num_machines];
        let mut makespan = 0;

        for &id in order {
            // Coverage check guarantees the lookup succeeds.
            let Some(op) = self.problem.operation(id) else {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "unknown operation {id}"
                )));
            };
            let Some(free) = machine_free.get_mut(op.machine) else {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "operation {id} references machine {} outside 0..{}",
                    op.machine, self.problem.num_machines
                )));
            };

            let start = job_ready[id.job].max(*free);
            let Some(end) = start.checked_add(op.duration) else {
                return Err(SchedulingError::InvalidProblem(format!(
                    "end time of {id} overflows i64"
                )));
            };
            job_ready[id.job] = end;
            *free = end;
            makespan = makespan.max(end);

            record(Assignment::new(id, op.machine, start, end));
        }

        Ok(makespan)
    }

    fn check_coverage(&self, order: &[OperationId]) -> Result<()> {
        if order.len() != self.total {
            return Err(SchedulingError::InvalidChromosome(format!(
                "expected {} operations, found {}",
                self.total,
                order.len()
            )));
        }

        let mut seen = vec![false; self.total];
        for &id in order {
            let in_range = self
                .problem
                .jobs
                .get(id.job)
                .is_some_and(|j| id.op < j.operations.len());
            if !in_range {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "unknown operation {id}"
                )));
            }
            let flat = self.offsets[id.job] + id.op;
            if std::mem::replace(&mut seen[flat], true) {
                return Err(SchedulingError::InvalidChromosome(format!(
                    "operation {id} appears more than once"
                )));
            }
        }
        Ok(())
    }
}
