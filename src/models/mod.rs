//! Job-shop domain models.
//!
//! Provides the static problem description and the timed schedule produced
//! by decoding an encoded solution.
//!
//! # Domain Mappings
//!
//! | u-jobshop | Manufacturing | Computing |
//! |-----------|--------------|-----------|
//! | Job | Order / Routing | Pipeline |
//! | Operation | Process step | Stage |
//! | Machine | Work center | Processor |
//! | Schedule | Production plan | Execution plan |

mod job;
mod schedule;

pub use job::{Job, JobShopProblem, Operation, OperationId};
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
