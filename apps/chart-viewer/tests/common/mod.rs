//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bar open times of AAPL's five sessions between 2023-01-01 and 2023-01-10
/// (09:30 New York time).
pub const AAPL_TIMESTAMPS: [i64; 5] = [
    1_672_756_200,
    1_672_842_600,
    1_672_929_000,
    1_673_015_400,
    1_673_274_600,
];

/// Chart API body for AAPL daily bars, 2023-01-01..2023-01-10.
pub fn aapl_daily_body() -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "gmtoffset": -18000,
                    "exchangeTimezoneName": "America/New_York",
                    "dataGranularity": "1d"
                },
                "timestamp": AAPL_TIMESTAMPS,
                "indicators": {
                    "quote": [{
                        "open": [130.28, 126.89, 127.13, 126.01, 130.47],
                        "high": [130.90, 128.66, 127.77, 130.29, 133.41],
                        "low": [124.17, 125.08, 124.76, 124.89, 129.89],
                        "close": [125.07, 126.36, 125.02, 129.62, 130.15],
                        "volume": [112_117_500, 89_113_600, 80_962_700, 87_754_700, 70_790_800]
                    }],
                    "adjclose": [{
                        "adjclose": [124.05, 125.33, 124.00, 128.56, 129.09]
                    }]
                }
            }],
            "error": null
        }
    })
}

/// Chart API body for an unknown symbol.
pub fn not_found_body() -> Value {
    json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    })
}

/// Mount the AAPL response, expecting exactly `calls` requests.
pub async fn mount_aapl(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aapl_daily_body()))
        .expect(calls)
        .mount(server)
        .await;
}

/// Mount a 404 for `symbol`.
pub async fn mount_not_found(server: &MockServer, symbol: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{symbol}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
        .mount(server)
        .await;
}
