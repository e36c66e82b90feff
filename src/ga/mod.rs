//! GA-based job-shop optimization.
//!
//! Implements the permutation encoding, genetic operators and the
//! generational search loop.
//!
//! # Encoding
//!
//! A chromosome is a permutation of `(job, operation)` pairs in which each
//! job's operations appear in index order. Operators that disturb order
//! (crossover) repair their children; if repair loses an operation the child
//! is replaced by a fresh random chromosome.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation, elitism,
//!   tournament selection
//!
//! # Reference
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

mod chromosome;
mod config;
pub mod operators;
mod runner;

pub use chromosome::{repair, repair_or_regenerate, Chromosome, Individual};
pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
