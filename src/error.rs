//! Error types for the job-shop optimizer.

use thiserror::Error;

/// Errors raised by the optimizer and its input layers.
///
/// Search termination modes (stagnation, degenerate neighborhoods) are not
/// errors; see [`crate::tabu::TabuTermination`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// Chromosome does not cover every operation exactly once, or breaks
    /// per-job operation order.
    #[error("Invalid chromosome: {0}")]
    InvalidChromosome(String),
    /// Problem definition failed structural validation.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
    /// A configuration parameter is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Problem text could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Result alias for fallible optimizer operations.
pub type Result<T> = std::result::Result<T, SchedulingError>;
