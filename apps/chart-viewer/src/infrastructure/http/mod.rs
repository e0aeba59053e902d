//! HTTP adapter.
//!
//! Inbound adapter serving the page, the chart document and the JSON
//! endpoints.

mod controller;
mod page;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use page::{DownloadView, FormFields, PageView, render_page};
pub use request::*;
pub use response::*;
