//! Collect Input Use Case
//!
//! Turns raw form values into a [`Query`], filling defaults and applying
//! the intraday lookback clamp. Corrections are reported as notices.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::ports::ClockPort;
use crate::domain::market_data::{
    IntervalMode, Notice, Query, clamp_start_date, default_start_date,
};
use crate::domain::shared::{DomainError, Symbol};

/// Raw form values; `None` means the field was left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InputForm {
    /// Ticker text.
    pub symbol: Option<String>,
    /// Interval selection.
    pub interval_mode: Option<IntervalMode>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

/// Outcome of input collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedInput {
    /// Query to fetch.
    pub query: Query,
    /// Corrections and warnings to show next to the form.
    pub notices: Vec<Notice>,
    /// Date the defaults and the clamp were computed against.
    pub today: NaiveDate,
}

/// Use case for collecting download parameters.
pub struct CollectInputUseCase<C>
where
    C: ClockPort,
{
    clock: Arc<C>,
    default_symbol: Symbol,
}

impl<C> CollectInputUseCase<C>
where
    C: ClockPort,
{
    /// Create a new `CollectInputUseCase`.
    pub fn new(clock: Arc<C>, default_symbol: impl Into<Symbol>) -> Self {
        Self {
            clock,
            default_symbol: default_symbol.into(),
        }
    }

    /// Ticker used when the form's symbol is empty.
    #[must_use]
    pub const fn default_symbol(&self) -> &Symbol {
        &self.default_symbol
    }

    /// Build the query for `form`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the symbol contains characters a ticker
    /// cannot carry.
    pub fn execute(&self, form: &InputForm) -> Result<CollectedInput, DomainError> {
        let today = self.clock.today();
        let mut notices = Vec::new();

        let symbol = form
            .symbol
            .as_deref()
            .map(Symbol::new)
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| self.default_symbol.clone());
        symbol.validate()?;

        let interval_mode = form.interval_mode.unwrap_or_default();
        let end_date = form.end_date.unwrap_or(today);
        let requested_start = form
            .start_date
            .unwrap_or_else(|| default_start_date(interval_mode, today));

        let (start_date, correction) = clamp_start_date(interval_mode, requested_start, today);
        if let Some(correction) = correction {
            tracing::info!(
                symbol = %symbol,
                requested = %correction.requested,
                corrected = %correction.corrected,
                "Intraday start date clamped"
            );
            notices.push(Notice::error(
                "Only maximum of past 60 days data can be downloaded",
            ));
            notices.push(Notice::info(format!(
                "Setting the start date as: {}",
                correction.corrected.format("%Y/%m/%d")
            )));
        }

        if start_date > end_date {
            tracing::warn!(%start_date, %end_date, "Start date is after end date");
            notices.push(Notice::warning(format!(
                "Start date {start_date} is after end date {end_date}; the provider may return no data"
            )));
        }

        Ok(CollectedInput {
            query: Query::new(symbol, interval_mode, start_date, end_date),
            notices,
            today,
        })
    }
}
