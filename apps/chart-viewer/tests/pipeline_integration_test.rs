//! Pipeline Integration Tests
//!
//! Input collection → cached download from a mocked chart API → rendering.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use wiremock::MockServer;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use chart_viewer::application::ports::{FixedClock, MarketDataError};
use chart_viewer::application::services::{SeriesCache, SeriesSource};
use chart_viewer::application::use_cases::{
    CollectInputUseCase, GetDataUseCase, InputForm, RenderChartUseCase,
};
use chart_viewer::domain::charting::{ChartOptions, ChartType, PanelKind};
use chart_viewer::domain::market_data::{IntervalMode, NoticeLevel, Query};
use chart_viewer::infrastructure::marketdata::{YahooConfig, YahooMarketDataAdapter};
use chart_viewer::infrastructure::persistence::FileSeriesStore;
use chart_viewer::infrastructure::render::SvgFigureEncoder;

fn adapter(server: &MockServer) -> Arc<YahooMarketDataAdapter> {
    let config = YahooConfig::default().with_base_url(server.uri());
    Arc::new(YahooMarketDataAdapter::new(&config).unwrap())
}

fn aapl_query() -> Query {
    Query::new(
        "AAPL",
        IntervalMode::Daily,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
    )
}

#[tokio::test]
async fn aapl_daily_has_business_days_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .and(query_param("interval", "1d"))
        .and(query_param("period1", "1672531200"))
        .and(query_param("period2", "1673308800"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::aapl_daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let get_data = GetDataUseCase::new(adapter(&server), Arc::new(SeriesCache::new()));
    let outcome = get_data.execute(&aapl_query()).await.unwrap();

    let series = &outcome.series;
    assert_eq!(series.len(), 5);
    for bar in series.bars() {
        assert!(!matches!(bar.timestamp.weekday(), Weekday::Sat | Weekday::Sun));
        assert!(bar.values().iter().all(|v| v.is_finite()));
    }
    assert!(
        series
            .bars()
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp)
    );
    assert_eq!(series.bars()[0].adj_close, 124.05);
    assert_eq!(series.bars()[4].volume, 70_790_800.0);
    assert_eq!(
        outcome.status.last().map(String::as_str),
        Some("Number of candles downloaded: 30")
    );
}

#[tokio::test]
async fn identical_query_downloads_once() {
    let server = MockServer::start().await;
    common::mount_aapl(&server, 1).await;

    let get_data = GetDataUseCase::new(adapter(&server), Arc::new(SeriesCache::new()));
    let first = get_data.execute(&aapl_query()).await.unwrap();
    let second = get_data.execute(&aapl_query()).await.unwrap();

    assert_eq!(first.source, SeriesSource::Provider);
    assert_eq!(second.source, SeriesSource::Memory);
    assert_eq!(*first.series, *second.series);
}

#[tokio::test]
async fn persisted_series_survive_restart() {
    let server = MockServer::start().await;
    common::mount_aapl(&server, 1).await;
    let dir = tempfile::tempdir().unwrap();

    let before = GetDataUseCase::new(
        adapter(&server),
        Arc::new(SeriesCache::with_store(Arc::new(FileSeriesStore::new(dir.path())))),
    );
    let downloaded = before.execute(&aapl_query()).await.unwrap();

    let after = GetDataUseCase::new(
        adapter(&server),
        Arc::new(SeriesCache::with_store(Arc::new(FileSeriesStore::new(dir.path())))),
    );
    let restored = after.execute(&aapl_query()).await.unwrap();

    assert_eq!(restored.source, SeriesSource::Persistent);
    assert_eq!(*restored.series, *downloaded.series);
}

#[tokio::test]
async fn unknown_symbol_propagates() {
    let server = MockServer::start().await;
    common::mount_not_found(&server, "NOPE").await;

    let get_data = GetDataUseCase::new(adapter(&server), Arc::new(SeriesCache::new()));
    let mut query = aapl_query();
    query.symbol = "NOPE".into();

    let err = get_data.execute(&query).await.unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound { .. }));
    assert!(get_data.cache().is_empty());
}

#[test]
fn intraday_start_ninety_days_back_is_clamped() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let collect = CollectInputUseCase::new(Arc::new(FixedClock(today)), "RELIANCE.NS");

    let collected = collect
        .execute(&InputForm {
            interval_mode: Some(IntervalMode::Intraday),
            start_date: Some(today - Duration::days(90)),
            ..InputForm::default()
        })
        .unwrap();

    let expected = today - Duration::days(59);
    assert_eq!(collected.query.start_date, expected);
    assert_eq!(collected.query.symbol.as_str(), "RELIANCE.NS");
    assert_eq!(collected.notices.len(), 2);
    assert_eq!(collected.notices[0].level, NoticeLevel::Error);
    assert_eq!(
        collected.notices[1].message,
        format!("Setting the start date as: {}", expected.format("%Y/%m/%d"))
    );
}

#[tokio::test]
async fn line_chart_has_two_panels_and_three_averages() {
    let server = MockServer::start().await;
    common::mount_aapl(&server, 1).await;

    let get_data = GetDataUseCase::new(adapter(&server), Arc::new(SeriesCache::new()));
    let outcome = get_data.execute(&aapl_query()).await.unwrap();

    let render = RenderChartUseCase::new(Arc::new(SvgFigureEncoder::new()));
    let options = ChartOptions {
        chart_type: ChartType::Line,
        ..ChartOptions::default()
    };
    let chart = render
        .execute(&outcome.series, &options, &aapl_query().title())
        .unwrap();

    assert_eq!(chart.figure.panels.len(), 2);
    assert!(chart.figure.panel(PanelKind::Volume).is_some());
    assert_eq!(chart.figure.moving_average_count(), 3);
    assert_eq!(chart.figure.title, "AAPL, 2023-01-01");
    assert_eq!(chart.content_type, "image/svg+xml");
    assert!(chart.document.starts_with("<svg"));
}
