//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! The infrastructure layer provides the adapters.

mod clock_port;
mod figure_encoder_port;
mod historical_data_port;
mod series_store_port;

pub use clock_port::{ClockPort, FixedClock, SystemClock};
pub use figure_encoder_port::FigureEncoderPort;
pub use historical_data_port::{HistoricalBarsRequest, HistoricalDataPort, MarketDataError};
pub use series_store_port::{InMemorySeriesStore, SeriesStorePort, StoreError};
