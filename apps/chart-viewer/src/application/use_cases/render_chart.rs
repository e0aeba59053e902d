//! Render Chart Use Case

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::FigureEncoderPort;
use crate::domain::charting::{ChartOptions, Figure, RenderError, build_figure};
use crate::domain::market_data::TimeSeries;
use crate::observability::record_render;

/// An encoded chart.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    /// Figure model the document was produced from.
    pub figure: Figure,
    /// Encoded document.
    pub document: String,
    /// MIME type of `document`.
    pub content_type: &'static str,
}

/// Use case for rendering a series.
pub struct RenderChartUseCase<E>
where
    E: FigureEncoderPort,
{
    encoder: Arc<E>,
}

impl<E> RenderChartUseCase<E>
where
    E: FigureEncoderPort,
{
    /// Create a new `RenderChartUseCase`.
    pub const fn new(encoder: Arc<E>) -> Self {
        Self { encoder }
    }

    /// Lay out and encode `series`.
    ///
    /// # Errors
    ///
    /// Returns `EmptySeries` for a series with no rows and `Encoding` when
    /// the encoder fails.
    pub fn execute(
        &self,
        series: &TimeSeries,
        options: &ChartOptions,
        title: &str,
    ) -> Result<RenderedChart, RenderError> {
        let started = Instant::now();
        let result = build_figure(series, options, title).and_then(|figure| {
            let document = self.encoder.encode(&figure)?;
            Ok(RenderedChart {
                figure,
                document,
                content_type: self.encoder.content_type(),
            })
        });

        let elapsed = started.elapsed().as_secs_f64();
        record_render(options.chart_type.as_str(), result.is_ok(), elapsed);
        match &result {
            Ok(chart) => tracing::debug!(
                symbol = %series.symbol(),
                chart_type = %options.chart_type,
                style = %options.style,
                bytes = chart.document.len(),
                "Chart rendered"
            ),
            Err(e) => tracing::warn!(symbol = %series.symbol(), error = %e, "Chart render failed"),
        }
        result
    }
}
