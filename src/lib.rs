//! problem-acquire - turns problem-page URLs into normalized problem details.
//!
//! Requests pass through a TTL cache and a single rate-limited worker that
//! runs an ordered chain of acquisition strategies (structured query, page
//! markup, headless browser). Callers always get a value: when every
//! strategy fails they receive the sentinel [`ProblemDetails`].

#![allow(clippy::should_implement_trait)]

mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod models;
mod queue;
pub mod scrapers;
pub mod services;

pub use config::EngineConfig;
pub use error::{ConfigError, FetchError, ServiceError};
pub use fetcher::ProblemFetcher;
pub use locator::ProblemIdentity;
pub use models::{Difficulty, Problem, ProblemDetails, SENTINEL_TITLE};
pub use services::{InMemoryProblemStore, ProblemService, ProblemStore};
