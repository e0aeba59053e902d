//! Persistence Adapters
//!
//! Implementations of `SeriesStorePort`.

mod file_store;

pub use file_store::FileSeriesStore;
