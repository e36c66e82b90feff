//! Tabu search refinement of a single chromosome.
//!
//! Polishes the GA's best solution with precedence-safe swap moves,
//! short-term memory and an aspiration criterion.
//!
//! # Key Components
//!
//! - [`TabuSearch`]: the refiner
//! - [`TabuList`]: bounded FIFO of recently adopted solution signatures
//! - [`TabuConfig`]: iteration budget, tenure, neighborhood size, stagnation limit
//!
//! # References
//!
//! - Glover (1989), "Tabu Search — Part I", ORSA Journal on Computing 1(3)
//! - Nowicki & Smutnicki (1996), "A Fast Taboo Search Algorithm for the Job Shop Problem"

mod config;
mod memory;
mod search;

pub use config::TabuConfig;
pub use memory::TabuList;
pub use search::{
    admissible_swaps, is_admissible_swap, TabuResult, TabuSearch, TabuTermination,
};
