//! Schedule (solution) model.
//!
//! A schedule is the timed result of decoding a chromosome: one assignment
//! per operation. Schedules are recomputed from the encoding whenever they are
//! needed and are never the source of truth.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::OperationId;

/// A complete timed schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in decoding order.
    pub assignments: Vec<Assignment>,
}

/// An operation-machine-time assignment (task-schedule entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub operation: usize,
    /// Machine processing the operation.
    pub machine: usize,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
}

/// A defect found when verifying a schedule against its problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Operation the violation refers to.
    pub operation: OperationId,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Operation started before its job predecessor finished.
    PrecedenceViolation,
    /// Two operations overlap on the same machine.
    MachineOverlap,
    /// An operation of the problem has no assignment.
    MissingOperation,
    /// An operation is assigned more than once, or does not exist.
    UnknownOrDuplicate,
    /// Assignment length or machine differs from the problem's operation.
    OperationMismatch,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(id: OperationId, machine: usize, start: i64, end: i64) -> Self {
        Self {
            job: id.job,
            operation: id.op,
            machine,
            start,
            end,
        }
    }

    /// Operation identity of this assignment.
    #[inline]
    pub fn operation_id(&self) -> OperationId {
        OperationId::new(self.job, self.operation)
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        operation: OperationId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            operation,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty schedule with room for `n` assignments.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            assignments: Vec::with_capacity(n),
        }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Makespan: latest end time across all assignments.
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Operation order encoded by this schedule (machine/start/end dropped).
    pub fn operation_order(&self) -> Vec<OperationId> {
        self.assignments.iter().map(Assignment::operation_id).collect()
    }

    /// Finds the assignment for an operation.
    pub fn assignment_for(&self, id: OperationId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.operation_id() == id)
    }

    /// All assignments of a job, in decoding order.
    pub fn assignments_for_job(&self, job: usize) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.job == job).collect()
    }

    /// All assignments on a machine, in decoding order.
    pub fn assignments_for_machine(&self, machine: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.machine == machine)
            .collect()
    }

    /// Busy time / horizon for one machine.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn machine_utilization(&self, machine: usize, horizon: i64) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments_for_machine(machine)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Utilization for every machine that has assignments, over the makespan.
    pub fn all_utilizations(&self) -> HashMap<usize, f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return HashMap::new();
        }

        let mut busy: HashMap<usize, i64> = HashMap::new();
        for a in &self.assignments {
            *busy.entry(a.machine).or_insert(0) += a.duration();
        }

        busy.into_iter()
            .map(|(m, b)| (m, b as f64 / horizon as f64))
            .collect()
    }

    /// Completion time of a job (latest end of its assignments).
    pub fn job_completion_time(&self, job: usize) -> Option<i64> {
        self.assignments
            .iter()
            .filter(|a| a.job == job)
            .map(|a| a.end)
            .max()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(OperationId::new(0, 0), 0, 0, 5));
        s.add_assignment(Assignment::new(OperationId::new(0, 1), 1, 5, 8));
        s.add_assignment(Assignment::new(OperationId::new(1, 0), 0, 5, 8));
        s
    }

    #[test]
    fn test_schedule_makespan() {
        assert_eq!(sample_schedule().makespan(), 8);
        assert_eq!(Schedule::new().makespan(), 0);
    }

    #[test]
    fn test_operation_order() {
        let s = sample_schedule();
        assert_eq!(
            s.operation_order(),
            vec![
                OperationId::new(0, 0),
                OperationId::new(0, 1),
                OperationId::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_lookup_by_job_and_machine() {
        let s = sample_schedule();
        assert_eq!(s.assignments_for_job(0).len(), 2);
        assert_eq!(s.assignments_for_machine(0).len(), 2);
        assert_eq!(s.assignment_for(OperationId::new(1, 0)).map(|a| a.start), Some(5));
        assert!(s.assignment_for(OperationId::new(9, 9)).is_none());
    }

    #[test]
    fn test_machine_utilization() {
        let s = sample_schedule();
        // m0 busy 5 + 3 = 8 over 8
        let u0 = s.machine_utilization(0, 8).unwrap();
        assert!((u0 - 1.0).abs() < 1e-10);
        let u1 = s.machine_utilization(1, 8).unwrap();
        assert!((u1 - 0.375).abs() < 1e-10);
        assert!(s.machine_utilization(0, 0).is_none());

        let all = s.all_utilizations();
        assert!((all[&1] - 0.375).abs() < 1e-10);
    }

    #[test]
    fn test_job_completion_time() {
        let s = sample_schedule();
        assert_eq!(s.job_completion_time(0), Some(8));
        assert_eq!(s.job_completion_time(1), Some(8));
        assert_eq!(s.job_completion_time(7), None);
    }
}
