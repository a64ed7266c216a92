//! Concrete census sources.
//!
//! [`CensusReporterClient`] talks to the census reporter HTTP API.
//! [`CachedApi`] wraps any [`CensusApi`](crate::services::census_api::CensusApi)
//! with a durable on-disk response cache.

pub mod cache;
pub mod censusreporter;

pub use cache::{CachedApi, ResponseCache};
pub use censusreporter::CensusReporterClient;
