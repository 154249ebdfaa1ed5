#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use countryfx_api::config::{LogFormat, ServerConfig};
use countryfx_api::router::build_app_router;
use countryfx_api::state::AppState;
use countryfx_core::country::{DataSource, RateTable, RawCountry};
use countryfx_core::gdp::fixed_multiplier_factory;
use countryfx_core::summary::PngSummaryRenderer;
use countryfx_sources::{DataSources, SourceConfig, SourceError};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

/// Multiplier installed in every test app, so GDP values are exact.
pub const TEST_MULTIPLIER: f64 = 1500.0;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(summary_image_path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        database_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sources: SourceConfig::default(),
        summary_image_path: summary_image_path.to_path_buf(),
        log_format: LogFormat::Pretty,
    }
}

/// A pool that never connects unless a query is actually issued.
///
/// For tests whose request must fail before touching the database.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://countryfx@127.0.0.1:1/countryfx")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Stub upstream
// ---------------------------------------------------------------------------

/// In-memory [`DataSources`]. `None` makes that feed answer HTTP 500.
#[derive(Clone, Default)]
pub struct StubSources {
    pub countries: Option<Vec<RawCountry>>,
    pub rates: Option<RateTable>,
}

impl StubSources {
    pub fn new(countries: serde_json::Value, rates: serde_json::Value) -> Self {
        Self {
            countries: Some(serde_json::from_value(countries).unwrap()),
            rates: Some(serde_json::from_value(rates).unwrap()),
        }
    }
}

#[async_trait]
impl DataSources for StubSources {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        self.countries.clone().ok_or(SourceError::Status {
            data_source: DataSource::Countries,
            status: 500,
        })
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        self.rates.clone().ok_or(SourceError::Status {
            data_source: DataSource::ExchangeRates,
            status: 500,
        })
    }
}

/// Three countries covering the currency rules: matched rate, unmatched
/// code, and no currency at all.
pub fn sample_sources() -> StubSources {
    StubSources::new(
        serde_json::json!([
            {
                "name": "Nigeria",
                "capital": "Abuja",
                "region": "Africa",
                "population": 200_000,
                "flag": "https://flagcdn.com/ng.svg",
                "currencies": [{"code": "NGN", "name": "Nigerian naira", "symbol": "₦"}]
            },
            {
                "name": "Ghana",
                "capital": "Accra",
                "region": "Africa",
                "population": 30_000,
                "flag": "https://flagcdn.com/gh.svg",
                "currencies": [{"code": "GHS", "name": "Ghanaian cedi", "symbol": "₵"}]
            },
            {
                "name": "Switzerland",
                "capital": "Bern",
                "region": "Europe",
                "population": 8_000,
                "flag": "https://flagcdn.com/ch.svg",
                "currencies": [
                    {"code": "CHF", "name": "Swiss franc", "symbol": "Fr"},
                    {"code": "EUR", "name": "Euro", "symbol": "€"}
                ]
            },
            {
                "name": "Antarctica",
                "region": "Polar",
                "population": 1_000,
                "currencies": []
            }
        ]),
        serde_json::json!({"NGN": 1500.0, "CHF": 0.5, "EUR": 0.9}),
    )
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with a fixed multiplier.
pub fn build_test_app(
    pool: PgPool,
    sources: impl DataSources + 'static,
    summary_image_path: &Path,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config(summary_image_path)),
        sources: Arc::new(sources),
        multiplier: fixed_multiplier_factory(TEST_MULTIPLIER),
        renderer: Arc::new(PngSummaryRenderer),
    };
    build_app_router(state)
}

/// Image path inside a fresh temp dir. Keep the `TempDir` alive for the test.
pub fn temp_image_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("summary.png");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
