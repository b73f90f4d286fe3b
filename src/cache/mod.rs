//! Result caching for the analysis pipeline.
//!
//! - [`key`]: deterministic content+language digest
//! - [`result_cache`]: TTL-checked result store
//! - [`in_flight`]: one computation per key at a time

pub mod in_flight;
pub mod key;
pub mod result_cache;

pub use in_flight::{Flight, FlightFollower, FlightLeader, InFlight};
pub use key::cache_key;
pub use result_cache::{CacheEntry, CacheStats, ResultCache, DEFAULT_TTL};
