//! Series cache configuration.

use serde::{Deserialize, Serialize};

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Persist downloaded series to disk so they survive restarts.
    #[serde(default = "default_persist")]
    pub persist: bool,
    /// Directory holding persisted series.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            directory: default_directory(),
        }
    }
}

const fn default_persist() -> bool {
    true
}

fn default_directory() -> String {
    "./data/series-cache".to_string()
}
