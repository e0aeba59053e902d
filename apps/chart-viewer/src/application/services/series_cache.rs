//! Series Cache Service
//!
//! Memoizes downloaded series by their full query tuple. Lookups check
//! process memory first, then the optional persistent store; a persistent
//! hit is promoted into memory. Entries never expire.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::application::ports::SeriesStorePort;
use crate::domain::market_data::{CacheKey, TimeSeries};
use crate::observability::{record_cache_lookup, record_cache_store_failure};

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSource {
    /// In-process cache.
    Memory,
    /// On-disk cache.
    Persistent,
    /// Fresh provider download.
    Provider,
}

impl SeriesSource {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Persistent => "persistent",
            Self::Provider => "provider",
        }
    }

    /// Whether the provider was skipped.
    #[must_use]
    pub const fn is_cached(self) -> bool {
        !matches!(self, Self::Provider)
    }
}

impl fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-tier series cache.
#[derive(Default)]
pub struct SeriesCache {
    memory: RwLock<HashMap<CacheKey, Arc<TimeSeries>>>,
    store: Option<Arc<dyn SeriesStorePort>>,
}

impl fmt::Debug for SeriesCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesCache")
            .field("entries", &self.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl SeriesCache {
    /// Memory-only cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache backed by a persistent store.
    #[must_use]
    pub fn with_store(store: Arc<dyn SeriesStorePort>) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store: Some(store),
        }
    }

    /// Find the series for `key`.
    ///
    /// Store read failures are logged and treated as a miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<(Arc<TimeSeries>, SeriesSource)> {
        let cached = self.memory.read().get(key).cloned();
        record_cache_lookup(SeriesSource::Memory.as_str(), cached.is_some());
        if let Some(series) = cached {
            tracing::debug!(key = %key, "Series cache hit (memory)");
            return Some((series, SeriesSource::Memory));
        }

        let store = self.store.as_ref()?;
        match store.load(key).await {
            Ok(Some(series)) => {
                record_cache_lookup(SeriesSource::Persistent.as_str(), true);
                tracing::debug!(key = %key, rows = series.len(), "Series cache hit (persistent)");
                let series = Arc::new(series);
                self.memory.write().insert(key.clone(), Arc::clone(&series));
                Some((series, SeriesSource::Persistent))
            }
            Ok(None) => {
                record_cache_lookup(SeriesSource::Persistent.as_str(), false);
                None
            }
            Err(e) => {
                record_cache_lookup(SeriesSource::Persistent.as_str(), false);
                tracing::warn!(key = %key, error = %e, "Failed to read persisted series");
                None
            }
        }
    }

    /// Insert `series` under `key` in every tier.
    ///
    /// Store write failures are logged; the memory tier is always updated.
    pub async fn populate(&self, key: CacheKey, series: TimeSeries) -> Arc<TimeSeries> {
        let series = Arc::new(series);
        self.memory.write().insert(key.clone(), Arc::clone(&series));

        if let Some(store) = &self.store
            && let Err(e) = store.save(&key, &series).await
        {
            record_cache_store_failure();
            tracing::warn!(key = %key, error = %e, "Failed to persist series");
        }

        series
    }

    /// Whether `key` is held in memory.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.memory.read().contains_key(key)
    }

    /// Number of entries held in memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memory.read().len()
    }

    /// Whether memory holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory.read().is_empty()
    }
}
