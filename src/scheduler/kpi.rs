//! Schedule quality metrics (KPIs).
//!
//! Computes standard performance indicators from a decoded schedule and
//! its problem.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Lower Bound | max(longest job, most-loaded machine) |
//! | Gap | (C_max - LB) / LB |
//! | Avg Utilization | Mean machine busyness over C_max |
//! | Total Idle | Sum over machines of (C_max - busy time) |
//! | Avg Flow Time | Mean job completion time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{JobShopProblem, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: i64,
    /// Trivial makespan lower bound of the problem.
    pub lower_bound: i64,
    /// Relative gap to the lower bound (0.0 when optimal w.r.t. the bound).
    pub gap: f64,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-machine utilization, keyed by machine id.
    pub utilization_by_machine: BTreeMap<usize, f64>,
    /// Sum of machine idle time within [0, makespan).
    pub total_idle: i64,
    /// Mean job completion time.
    pub avg_flow_time: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for `schedule`.
    ///
    /// Machines without any assignment count with zero utilization.
    pub fn calculate(schedule: &Schedule, problem: &JobShopProblem) -> Self {
        let makespan = schedule.makespan();
        let lower_bound = problem.lower_bound();

        let mut busy = vec![0i64; problem.num_machines];
        for a in &schedule.assignments {
            if let Some(b) = busy.get_mut(a.machine) {
                *b += a.duration();
            }
        }

        let utilization_by_machine: BTreeMap<usize, f64> = busy
            .iter()
            .enumerate()
            .map(|(m, &b)| {
                let u = if makespan > 0 {
                    b as f64 / makespan as f64
                } else {
                    0.0
                };
                (m, u)
            })
            .collect();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.values().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let total_idle = busy
            .iter()
            .fold(0i64, |acc, &b| acc.saturating_add(makespan - b));

        let completions: Vec<i64> = (0..problem.job_count())
            .filter_map(|j| schedule.job_completion_time(j))
            .collect();
        let avg_flow_time = if completions.is_empty() {
            0.0
        } else {
            completions.iter().map(|&c| c as f64).sum::<f64>() / completions.len() as f64
        };

        let gap = if lower_bound > 0 {
            (makespan - lower_bound) as f64 / lower_bound as f64
        } else {
            0.0
        };

        Self {
            makespan,
            lower_bound,
            gap,
            avg_utilization,
            utilization_by_machine,
            total_idle,
            avg_flow_time,
        }
    }

    /// Whether the makespan meets the lower bound.
    pub fn is_provably_optimal(&self) -> bool {
        self.makespan == self.lower_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, OperationId};

    fn two_by_two() -> JobShopProblem {
        JobShopProblem::from_pairs(2, vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]])
    }

    fn interleaved() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(OperationId::new(0, 0), 0, 0, 3));
        s.add_assignment(Assignment::new(OperationId::new(1, 0), 1, 0, 4));
        s.add_assignment(Assignment::new(OperationId::new(0, 1), 1, 4, 6));
        s.add_assignment(Assignment::new(OperationId::new(1, 1), 0, 4, 5));
        s
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = ScheduleKpi::calculate(&interleaved(), &two_by_two());
        assert_eq!(kpi.makespan, 6);
        assert_eq!(kpi.lower_bound, 6);
        assert!(kpi.is_provably_optimal());
        assert!(kpi.gap.abs() < 1e-10);
    }

    #[test]
    fn test_kpi_utilization_and_idle() {
        let kpi = ScheduleKpi::calculate(&interleaved(), &two_by_two());
        // m0 busy 4/6, m1 busy 6/6
        assert!((kpi.utilization_by_machine[&0] - 4.0 / 6.0).abs() < 1e-10);
        assert!((kpi.utilization_by_machine[&1] - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 5.0 / 6.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle, 2);
    }

    #[test]
    fn test_kpi_flow_time() {
        let kpi = ScheduleKpi::calculate(&interleaved(), &two_by_two());
        // job0 completes at 6, job1 at 5
        assert!((kpi.avg_flow_time - 5.5).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_gap() {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(OperationId::new(0, 0), 0, 0, 3));
        s.add_assignment(Assignment::new(OperationId::new(0, 1), 1, 3, 5));
        s.add_assignment(Assignment::new(OperationId::new(1, 0), 1, 5, 9));
        s.add_assignment(Assignment::new(OperationId::new(1, 1), 0, 9, 10));
        let kpi = ScheduleKpi::calculate(&s, &two_by_two());
        assert_eq!(kpi.makespan, 10);
        assert!((kpi.gap - 4.0 / 6.0).abs() < 1e-10);
        assert!(!kpi.is_provably_optimal());
    }

    #[test]
    fn test_kpi_empty() {
        let problem = JobShopProblem::new(0, Vec::new());
        let kpi = ScheduleKpi::calculate(&Schedule::new(), &problem);
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.total_idle, 0);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
        assert!((kpi.avg_flow_time - 0.0).abs() < 1e-10);
    }
}
