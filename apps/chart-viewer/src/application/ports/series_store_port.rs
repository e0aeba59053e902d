//! Series Store Port (Driven Port)
//!
//! Interface for persisting downloaded series across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::market_data::{CacheKey, TimeSeries};

/// Series store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("Series store I/O error: {message}")]
    Io {
        /// Error details.
        message: String,
    },

    /// Stored entry could not be encoded or decoded.
    #[error("Series store serialization error: {message}")]
    Serialization {
        /// Error details.
        message: String,
    },
}

/// Port for the persistent tier of the series cache.
#[async_trait]
pub trait SeriesStorePort: Send + Sync {
    /// Load the series stored under `key`, if any.
    async fn load(&self, key: &CacheKey) -> Result<Option<TimeSeries>, StoreError>;

    /// Store `series` under `key`, replacing any previous entry.
    async fn save(&self, key: &CacheKey, series: &TimeSeries) -> Result<(), StoreError>;
}

/// In-memory implementation for testing.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    entries: RwLock<HashMap<CacheKey, TimeSeries>>,
}

impl InMemorySeriesStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SeriesStorePort for InMemorySeriesStore {
    async fn load(&self, key: &CacheKey) -> Result<Option<TimeSeries>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn save(&self, key: &CacheKey, series: &TimeSeries) -> Result<(), StoreError> {
        self.entries.write().insert(key.clone(), series.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::market_data::series::test_support::daily_series;
    use crate::domain::market_data::{IntervalMode, Query};

    #[tokio::test]
    async fn in_memory_store_round_trip() {
        let store = InMemorySeriesStore::new();
        let key = Query::new(
            "TEST",
            IntervalMode::Daily,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        )
        .cache_key();

        assert!(store.load(&key).await.unwrap().is_none());
        let series = daily_series(&[1.0, 2.0]);
        store.save(&key, &series).await.unwrap();
        assert_eq!(store.load(&key).await.unwrap(), Some(series));
        assert_eq!(store.len(), 1);
    }
}
