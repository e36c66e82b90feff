//! Input validation and schedule verification.
//!
//! [`validate_problem`] checks structural integrity of a problem before
//! searching:
//! - At least one job
//! - No job without operations
//! - Machine references within `0..num_machines`
//! - Non-negative durations
//! - Total processing time representable as `i64`
//!
//! [`verify_schedule`] re-checks a decoded schedule after the search:
//! every operation assigned exactly once, job order respected, no machine
//! processing two operations at the same time.

use std::collections::HashSet;

use crate::error::{Result, SchedulingError};
use crate::models::{JobShopProblem, OperationId, Schedule, Violation, ViolationType};

/// Validation result.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The problem has no jobs.
    EmptyProblem,
    /// A job has no operations.
    EmptyJob,
    /// An operation references a machine that doesn't exist.
    InvalidMachineReference,
    /// An operation has a negative duration.
    NegativeDuration,
    /// The sum of all durations exceeds `i64::MAX`.
    DurationOverflow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem definition.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_problem(problem: &JobShopProblem) -> ValidationResult {
    let mut errors = Vec::new();

    if problem.jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyProblem,
            "Problem has no jobs",
        ));
    }

    for (j, job) in problem.jobs.iter().enumerate() {
        if job.operations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("Job {j} has no operations"),
            ));
        }

        for (o, op) in job.operations.iter().enumerate() {
            let id = OperationId::new(j, o);
            if op.machine >= problem.num_machines {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMachineReference,
                    format!(
                        "Operation {id} references machine {} but only {} exist",
                        op.machine, problem.num_machines
                    ),
                ));
            }
            if op.duration < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDuration,
                    format!("Operation {id} has negative duration {}", op.duration),
                ));
            }
        }
    }

    // Every start and end time is bounded by the total processing time.
    let total = problem
        .jobs
        .iter()
        .flat_map(|j| &j.operations)
        .filter(|op| op.duration > 0)
        .try_fold(0i64, |acc, op| acc.checked_add(op.duration));
    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            "Total processing time overflows i64",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// [`validate_problem`] folded into a [`SchedulingError::InvalidProblem`].
pub fn ensure_valid(problem: &JobShopProblem) -> Result<()> {
    validate_problem(problem).map_err(|errors| {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        SchedulingError::InvalidProblem(messages.join("; "))
    })
}

/// Verifies a decoded schedule against its problem.
///
/// Returns every violation found; an empty list means the schedule is
/// feasible.
pub fn verify_schedule(problem: &JobShopProblem, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for a in &schedule.assignments {
        let id = a.operation_id();
        let Some(op) = problem.operation(id) else {
            violations.push(Violation::new(
                ViolationType::UnknownOrDuplicate,
                id,
                format!("{id} is not an operation of the problem"),
            ));
            continue;
        };
        if !seen.insert(id) {
            violations.push(Violation::new(
                ViolationType::UnknownOrDuplicate,
                id,
                format!("{id} is assigned more than once"),
            ));
        }
        if a.machine != op.machine || a.duration() != op.duration {
            violations.push(Violation::new(
                ViolationType::OperationMismatch,
                id,
                format!(
                    "{id} runs on m{} for {} but requires m{} for {}",
                    a.machine,
                    a.duration(),
                    op.machine,
                    op.duration
                ),
            ));
        }
    }

    for id in problem.operation_ids() {
        if !seen.contains(&id) {
            violations.push(Violation::new(
                ViolationType::MissingOperation,
                id,
                format!("{id} is not scheduled"),
            ));
        }
    }

    // Job order: each operation starts no earlier than its predecessor ends.
    for job in 0..problem.job_count() {
        let mut ops = schedule.assignments_for_job(job);
        ops.sort_by_key(|a| a.operation);
        for w in ops.windows(2) {
            if w[1].start < w[0].end {
                violations.push(Violation::new(
                    ViolationType::PrecedenceViolation,
                    w[1].operation_id(),
                    format!(
                        "{} starts at {} before {} ends at {}",
                        w[1].operation_id(),
                        w[1].start,
                        w[0].operation_id(),
                        w[0].end
                    ),
                ));
            }
        }
    }

    // Machine capacity: intervals on one machine must not overlap.
    for machine in 0..problem.num_machines {
        let mut ops = schedule.assignments_for_machine(machine);
        ops.sort_by_key(|a| (a.start, a.end));
        for w in ops.windows(2) {
            if w[1].start < w[0].end {
                violations.push(Violation::new(
                    ViolationType::MachineOverlap,
                    w[1].operation_id(),
                    format!(
                        "{} overlaps {} on m{machine}",
                        w[1].operation_id(),
                        w[0].operation_id()
                    ),
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn two_by_two() -> JobShopProblem {
        JobShopProblem::from_pairs(2, vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]])
    }

    fn feasible_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(OperationId::new(0, 0), 0, 0, 3));
        s.add_assignment(Assignment::new(OperationId::new(1, 0), 1, 0, 4));
        s.add_assignment(Assignment::new(OperationId::new(0, 1), 1, 4, 6));
        s.add_assignment(Assignment::new(OperationId::new(1, 1), 0, 4, 5));
        s
    }

    #[test]
    fn test_valid_problem() {
        assert!(validate_problem(&two_by_two()).is_ok());
        assert!(ensure_valid(&two_by_two()).is_ok());
    }

    #[test]
    fn test_empty_problem() {
        let errors = validate_problem(&JobShopProblem::new(2, Vec::new())).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyProblem);
    }

    #[test]
    fn test_empty_job() {
        let problem = JobShopProblem::from_pairs(2, vec![vec![(0, 1)], vec![]]);
        let errors = validate_problem(&problem).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyJob));
    }

    #[test]
    fn test_machine_out_of_range_and_negative_duration() {
        let problem = JobShopProblem::from_pairs(2, vec![vec![(2, 1), (0, -3)]]);
        let errors = validate_problem(&problem).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidMachineReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NegativeDuration));

        let err = ensure_valid(&problem).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidProblem(_)));
    }

    #[test]
    fn test_total_duration_overflow_rejected() {
        let problem = JobShopProblem::from_pairs(1, vec![vec![(0, i64::MAX), (0, 1)]]);
        let errors = validate_problem(&problem).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DurationOverflow);

        let at_limit = JobShopProblem::from_pairs(1, vec![vec![(0, i64::MAX - 1), (0, 1)]]);
        assert!(validate_problem(&at_limit).is_ok());
    }

    #[test]
    fn test_verify_feasible_schedule() {
        assert!(verify_schedule(&two_by_two(), &feasible_schedule()).is_empty());
    }

    #[test]
    fn test_verify_detects_precedence_violation() {
        let mut s = feasible_schedule();
        // J0-T1 moved to start before J0-T0 ends.
        s.assignments[2] = Assignment::new(OperationId::new(0, 1), 1, 2, 4);
        let violations = verify_schedule(&two_by_two(), &s);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::PrecedenceViolation));
    }

    #[test]
    fn test_verify_detects_machine_overlap() {
        let mut s = feasible_schedule();
        // J1-T1 on m0 overlaps J0-T0.
        s.assignments[3] = Assignment::new(OperationId::new(1, 1), 0, 2, 3);
        let violations = verify_schedule(&two_by_two(), &s);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::MachineOverlap));
    }

    #[test]
    fn test_verify_detects_missing_and_duplicate() {
        let mut s = feasible_schedule();
        s.assignments[3] = s.assignments[0];
        let violations = verify_schedule(&two_by_two(), &s);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::MissingOperation
                && v.operation == OperationId::new(1, 1)));
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::UnknownOrDuplicate));
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let mut s = feasible_schedule();
        s.assignments[0] = Assignment::new(OperationId::new(0, 0), 1, 0, 3);
        let violations = verify_schedule(&two_by_two(), &s);
        assert!(violations
            .iter()
            .any(|v| v.violation_type == ViolationType::OperationMismatch));
    }
}
