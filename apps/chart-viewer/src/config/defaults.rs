//! Form defaults.

use serde::{Deserialize, Serialize};

use crate::domain::market_data::DEFAULT_SYMBOL;

/// Values pre-filled in the input form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Ticker used when the symbol field is empty.
    #[serde(default = "default_symbol")]
    pub symbol: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
        }
    }
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}
