//! Application Use Cases
//!
//! The three pipeline stages, each runnable on its own.

mod collect_input;
mod get_data;
mod render_chart;

pub use collect_input::{CollectInputUseCase, CollectedInput, InputForm};
pub use get_data::{FetchOutcome, GetDataUseCase};
pub use render_chart::{RenderChartUseCase, RenderedChart};
