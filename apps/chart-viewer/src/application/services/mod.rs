//! Application Services
//!
//! Shared state used by several use cases.

mod series_cache;

pub use series_cache::{SeriesCache, SeriesSource};
