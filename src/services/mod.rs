//! Service layer for problem records.
//!
//! Sits on top of the acquisition engine and decides what a sentinel result
//! means for callers.

mod problem;
mod store;

pub use problem::{ProblemService, STALE_AFTER_DAYS};
pub use store::{InMemoryProblemStore, ProblemStore};
