//! Text-table problem loader.
//!
//! # Format
//!
//! ```text
//! num_jobs num_machines
//! m d m d m d ...     (job 0: machine/duration pairs in processing order)
//! m d m d m d ...     (job 1)
//! ```
//!
//! Values are separated by whitespace or commas. Blank lines and lines that
//! contain non-integer tokens are skipped (with a warning), which lets
//! benchmark files carry comments after the job table.

use std::str::FromStr;

use tracing::warn;

use crate::error::{Result, SchedulingError};
use crate::models::{Job, JobShopProblem};
use crate::validation::ensure_valid;

/// Parses a problem from the text-table format.
///
/// # Errors
/// [`SchedulingError::Parse`] for a malformed header or an odd number of
/// values on a job line; [`SchedulingError::InvalidProblem`] if the job count
/// differs from the header or the problem fails validation.
///
/// # Example
/// ```
/// use u_jobshop::loader::parse_problem;
///
/// let problem = parse_problem("2 2\n0 3 1 2\n1 4 0 1\n").unwrap();
/// assert_eq!(problem.job_count(), 2);
/// assert_eq!(problem.jobs[1].operations[0].duration, 4);
/// ```
pub fn parse_problem(text: &str) -> Result<JobShopProblem> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(SchedulingError::Parse {
            line: 1,
            message: "missing header".into(),
        });
    };
    let header_values = parse_integers(header).ok_or_else(|| SchedulingError::Parse {
        line: header_line,
        message: format!("header is not numeric: '{header}'"),
    })?;
    let [num_jobs, num_machines] = header_values[..] else {
        return Err(SchedulingError::Parse {
            line: header_line,
            message: format!(
                "header needs 'num_jobs num_machines', found {} values",
                header_values.len()
            ),
        });
    };
    let num_jobs = to_usize(num_jobs, header_line)?;
    let num_machines = to_usize(num_machines, header_line)?;

    let mut jobs = Vec::with_capacity(num_jobs);
    for (line, content) in lines {
        let Some(values) = parse_integers(content) else {
            warn!(line, "skipping non-numeric line");
            continue;
        };
        if values.len() % 2 != 0 {
            return Err(SchedulingError::Parse {
                line,
                message: format!(
                    "expected machine/duration pairs, found {} values",
                    values.len()
                ),
            });
        }

        let mut job = Job::new();
        for pair in values.chunks_exact(2) {
            job = job.with_operation(to_usize(pair[0], line)?, pair[1]);
        }
        jobs.push(job);
    }

    if jobs.len() != num_jobs {
        return Err(SchedulingError::InvalidProblem(format!(
            "header declares {num_jobs} jobs, found {}",
            jobs.len()
        )));
    }

    let problem = JobShopProblem::new(num_machines, jobs);
    ensure_valid(&problem)?;
    Ok(problem)
}

impl FromStr for JobShopProblem {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        parse_problem(s)
    }
}

fn parse_integers(line: &str) -> Option<Vec<i64>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse().ok())
        .collect()
}

fn to_usize(value: i64, line: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| SchedulingError::Parse {
        line,
        message: format!("expected a non-negative integer, found {value}"),
    })
}
