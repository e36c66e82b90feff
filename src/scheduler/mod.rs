//! Schedule decoding and KPI evaluation.
//!
//! # Evaluator
//!
//! `ScheduleEvaluator` turns an operation order into a timed schedule with a
//! greedy list-scheduling simulation. Every search component calls it.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, lower-bound gap, utilization, idle
//! time and flow time for a decoded schedule.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod evaluator;
mod kpi;

pub use evaluator::{Evaluation, ScheduleEvaluator};
pub use kpi::ScheduleKpi;
