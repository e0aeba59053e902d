//! Infrastructure Layer
//!
//! Adapters implementing the application ports, plus the inbound HTTP
//! adapter.
//!
//! - `http`: Axum page, chart and JSON endpoints
//! - `marketdata`: Yahoo Finance chart API client
//! - `persistence`: On-disk series store
//! - `render`: SVG figure encoder

pub mod http;
pub mod marketdata;
pub mod persistence;
pub mod render;
