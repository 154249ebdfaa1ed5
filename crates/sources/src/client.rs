//! REST clients for the countries and exchange-rate APIs.

use std::time::Duration;

use async_trait::async_trait;
use countryfx_core::country::{DataSource, RateTable, RatesPayload, RawCountry};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Default upstream for the country list.
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

/// Default upstream for USD-based exchange rates.
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Default per-request timeout for upstream calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoints and timeout for [`HttpSources`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub countries_url: String,
    pub rates_url: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// The two upstream feeds of a refresh.
#[async_trait]
pub trait DataSources: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError>;
    async fn fetch_rates(&self) -> Result<RateTable, SourceError>;
}

/// Fetch both feeds concurrently.
///
/// When both fail the countries error is returned.
pub async fn fetch_all(
    sources: &dyn DataSources,
) -> Result<(Vec<RawCountry>, RateTable), SourceError> {
    let (countries, rates) = tokio::join!(sources.fetch_countries(), sources.fetch_rates());
    Ok((countries?, rates?))
}

/// [`DataSources`] backed by the real HTTP APIs.
pub struct HttpSources {
    client: reqwest::Client,
    countries_url: String,
    rates_url: String,
}

impl HttpSources {
    /// Build a client with the configured timeout.
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(
            client,
            config.countries_url.clone(),
            config.rates_url.clone(),
        ))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, countries_url: String, rates_url: String) -> Self {
        Self {
            client,
            countries_url,
            rates_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        data_source: DataSource,
        url: &str,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| SourceError::Transport { data_source, error })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                data_source,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|error| {
            if error.is_decode() {
                SourceError::Decode { data_source, error }
            } else {
                SourceError::Transport { data_source, error }
            }
        })
    }
}

#[async_trait]
impl DataSources for HttpSources {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        let countries: Vec<RawCountry> = self
            .get_json(DataSource::Countries, &self.countries_url)
            .await
            .inspect_err(|e| log_failure(e))?;

        tracing::debug!(count = countries.len(), "Fetched country list");
        Ok(countries)
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let payload: RatesPayload = self
            .get_json(DataSource::ExchangeRates, &self.rates_url)
            .await
            .inspect_err(|e| log_failure(e))?;

        if payload.is_rejected() {
            let err = SourceError::Rejected {
                data_source: DataSource::ExchangeRates,
                result: payload.result.unwrap_or_default(),
            };
            log_failure(&err);
            return Err(err);
        }

        tracing::debug!(count = payload.rates.len(), "Fetched exchange rates");
        Ok(payload.rates)
    }
}

fn log_failure(err: &SourceError) {
    tracing::warn!(
        data_source = %err.data_source(),
        timeout = err.is_timeout(),
        error = %err,
        "Upstream fetch failed",
    );
}
