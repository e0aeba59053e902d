//! HTTP Controller (Driver Adapter)
//!
//! Axum routes that run the input → data → render pipeline once per request.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::ports::{ClockPort, FigureEncoderPort, HistoricalDataPort};
use crate::application::use_cases::{
    CollectInputUseCase, CollectedInput, FetchOutcome, GetDataUseCase, RenderChartUseCase,
    RenderedChart,
};
use crate::domain::charting::ChartOptions;
use crate::domain::market_data::COLUMNS;
use crate::error::AppError;

use super::page::{DownloadView, FormFields, PageView, render_page};
use super::request::ChartPageParams;
use super::response::{HealthResponse, SeriesResponse};

/// Application state shared across handlers.
pub struct AppState<P, C, E>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    /// Use case for reading the input form.
    pub collect_input: Arc<CollectInputUseCase<C>>,
    /// Use case for obtaining series.
    pub get_data: Arc<GetDataUseCase<P>>,
    /// Use case for rendering charts.
    pub render_chart: Arc<RenderChartUseCase<E>>,
    /// Provider named on the page.
    pub provider_name: &'static str,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
    /// Application version.
    pub version: String,
}

impl<P, C, E> Clone for AppState<P, C, E>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    fn clone(&self) -> Self {
        Self {
            collect_input: Arc::clone(&self.collect_input),
            get_data: Arc::clone(&self.get_data),
            render_chart: Arc::clone(&self.render_chart),
            provider_name: self.provider_name,
            metrics: self.metrics.clone(),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<P, C, E>(state: AppState<P, C, E>) -> Router
where
    P: HistoricalDataPort + 'static,
    C: ClockPort + 'static,
    E: FigureEncoderPort + 'static,
{
    Router::new()
        .route("/", get(index_page))
        .route("/chart.svg", get(chart_document))
        .route("/api/v1/series", get(get_series))
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<P, C, E>(State(state): State<AppState<P, C, E>>) -> impl IntoResponse
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Prometheus scrape endpoint.
async fn prometheus_metrics<P, C, E>(State(state): State<AppState<P, C, E>>) -> Response
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// Series endpoint: collected query, notices and the bars as JSON.
async fn get_series<P, C, E>(
    State(state): State<AppState<P, C, E>>,
    Query(params): Query<ChartPageParams>,
) -> Result<Json<SeriesResponse>, AppError>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    let collected = collect(&state, &params)?;
    let outcome = state.get_data.execute(&collected.query).await?;
    Ok(Json(SeriesResponse {
        query: collected.query,
        notices: collected.notices,
        source: outcome.source,
        status: outcome.status,
        columns: COLUMNS.to_vec(),
        rows: outcome.series.bars().to_vec(),
    }))
}

/// Chart endpoint: the encoded figure alone.
async fn chart_document<P, C, E>(
    State(state): State<AppState<P, C, E>>,
    Query(params): Query<ChartPageParams>,
) -> Result<Response, AppError>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    let collected = collect(&state, &params)?;
    let options = params.chart_options()?;
    let (_, chart) = download_and_render(&state, &collected, &options).await?;
    Ok(([(header::CONTENT_TYPE, chart.content_type)], chart.document).into_response())
}

/// Page endpoint.
///
/// Failures are shown inside the page; the status code still reflects them.
async fn index_page<P, C, E>(
    State(state): State<AppState<P, C, E>>,
    Query(params): Query<ChartPageParams>,
) -> Response
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    let collected = collect(&state, &params);
    let options = params.chart_options();

    let fields = match &collected {
        Ok(collected) => FormFields::from_query(&collected.query),
        Err(_) => FormFields {
            symbol: params
                .symbol
                .clone()
                .unwrap_or_else(|| state.collect_input.default_symbol().to_string()),
            interval_mode: params
                .interval
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            start_date: None,
            end_date: None,
        },
    };
    let notices = collected
        .as_ref()
        .map(|c| c.notices.clone())
        .unwrap_or_default();
    let form_options = options.as_ref().copied().unwrap_or_default();

    let result: Result<Option<DownloadView>, AppError> = async {
        let collected = collected?;
        let options = options?;
        if !params.download_requested() {
            return Ok(None);
        }
        let (outcome, chart) = download_and_render(&state, &collected, &options).await?;
        Ok(Some(DownloadView {
            status: outcome.status,
            source: outcome.source,
            chart: chart.document,
            series: outcome.series,
        }))
    }
    .await;

    let (status, download, error) = match result {
        Ok(download) => (StatusCode::OK, download, None),
        Err(e) => {
            tracing::warn!(code = %e.code(), error = %e.message(), "Page request failed");
            (e.code().status(), None, Some(e))
        }
    };

    let view = PageView {
        provider: state.provider_name,
        fields,
        options: form_options,
        notices,
        download,
        error: error.as_ref(),
    };
    match render_page(&view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => AppError::internal(format!("Failed to render page: {e}")).into_response(),
    }
}

fn collect<P, C, E>(
    state: &AppState<P, C, E>,
    params: &ChartPageParams,
) -> Result<CollectedInput, AppError>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    let form = params.input_form()?;
    Ok(state.collect_input.execute(&form)?)
}

async fn download_and_render<P, C, E>(
    state: &AppState<P, C, E>,
    collected: &CollectedInput,
    options: &ChartOptions,
) -> Result<(FetchOutcome, RenderedChart), AppError>
where
    P: HistoricalDataPort,
    C: ClockPort,
    E: FigureEncoderPort,
{
    let outcome = state.get_data.execute(&collected.query).await?;
    let chart = state
        .render_chart
        .execute(&outcome.series, options, &collected.query.title())?;
    Ok((outcome, chart))
}
