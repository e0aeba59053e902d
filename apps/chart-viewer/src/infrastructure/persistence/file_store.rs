//! JSON file store for downloaded series.
//!
//! One file per cache key under a single directory. Writes go to a temporary
//! file that is then renamed, so a crash never leaves a partial entry behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{SeriesStorePort, StoreError};
use crate::domain::market_data::{CacheKey, TimeSeries};

/// Series store backed by JSON files.
#[derive(Debug, Clone)]
pub struct FileSeriesStore {
    directory: PathBuf,
}

impl FileSeriesStore {
    /// Create a store rooted at `directory`. The directory is created lazily.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Root directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File holding the entry for `key`.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(format!("{}.json", key.file_stem()))
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> StoreError {
    StoreError::Io {
        message: format!("{}: {e}", path.display()),
    }
}

#[async_trait]
impl SeriesStorePort for FileSeriesStore {
    async fn load(&self, key: &CacheKey) -> Result<Option<TimeSeries>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, &e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                message: format!("{}: {e}", path.display()),
            })
    }

    async fn save(&self, key: &CacheKey, series: &TimeSeries) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| io_error(&self.directory, &e))?;

        let bytes = serde_json::to_vec(series).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| io_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, &e))?;

        tracing::debug!(path = %path.display(), rows = series.len(), "Series persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::market_data::series::test_support::daily_series;
    use crate::domain::market_data::{IntervalMode, Query};

    fn key(symbol: &str) -> CacheKey {
        Query::new(
            symbol,
            IntervalMode::Daily,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        )
        .cache_key()
    }

    #[tokio::test]
    async fn missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeriesStore::new(dir.path());
        assert!(store.load(&key("AAPL")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeriesStore::new(dir.path().join("nested"));
        let series = daily_series(&[10.0, 11.0, 12.0]);

        store.save(&key("AAPL"), &series).await.unwrap();
        assert!(store.path_for(&key("AAPL")).exists());
        assert_eq!(store.load(&key("AAPL")).await.unwrap(), Some(series));
    }

    #[tokio::test]
    async fn survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileSeriesStore::new(dir.path())
            .save(&key("MSFT"), &daily_series(&[1.0]))
            .await
            .unwrap();

        let reopened = FileSeriesStore::new(dir.path());
        assert!(reopened.load(&key("MSFT")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeriesStore::new(dir.path());
        std::fs::write(store.path_for(&key("AAPL")), b"{not json").unwrap();
        assert!(matches!(
            store.load(&key("AAPL")).await,
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn similar_symbols_use_distinct_files() {
        let store = FileSeriesStore::new("/tmp/x");
        assert_ne!(store.path_for(&key("BRK-B")), store.path_for(&key("BRK.B")));
    }
}
