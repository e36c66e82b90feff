//! Hybrid job-shop scheduling optimizer.
//!
//! Searches low-makespan schedules for the Job-Shop Scheduling Problem with a
//! genetic algorithm over precedence-respecting operation permutations,
//! followed by tabu-search refinement of the best individual.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `JobShopProblem`, `Job`, `Operation`,
//!   `OperationId`, `Schedule`, `Assignment`, `Violation`
//! - **`scheduler`**: Makespan evaluator (list-scheduling decoder) and KPIs
//! - **`ga`**: Chromosome encoding, repair, operators, generational loop
//! - **`tabu`**: Tabu search refiner with FIFO short-term memory
//! - **`hybrid`**: GA → tabu pipeline returning the final schedule
//! - **`loader`**: Text-table problem parser
//! - **`validation`**: Problem integrity checks and schedule verification
//!
//! # Architecture
//!
//! The search core is synchronous and performs no I/O. Randomness is injected
//! (`R: rand::Rng`) or seeded from configuration; progress is reported only
//! through `tracing` events.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Glover & Laguna (1997), "Tabu Search"

pub mod error;
pub mod ga;
pub mod hybrid;
pub mod loader;
pub mod models;
pub mod scheduler;
pub mod tabu;
pub mod validation;

pub use error::{Result, SchedulingError};
