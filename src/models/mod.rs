//! Data models for problem acquisition.

mod problem;

pub use problem::{Difficulty, Problem, ProblemDetails, SENTINEL_TITLE};
