//! Payload shapes of the two external data sources.
//!
//! The country list and the exchange-rate table are deserialized into these
//! types by the source clients and handed to [`crate::merge`] unchanged.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Exchange rates keyed by ISO 4217 currency code, relative to the base
/// currency of the rate provider (USD).
pub type RateTable = HashMap<String, f64>;

/// Identifies which upstream API a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Countries,
    ExchangeRates,
}

impl DataSource {
    /// Human-readable name used in error details.
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Countries => "countries API",
            DataSource::ExchangeRates => "exchange rates API",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the country list as returned by the countries API.
///
/// Every field is optional; presence checks happen during merge.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCountry {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: Option<i64>,
    /// Flag image URL.
    pub flag: Option<String>,
    pub currencies: Option<Vec<RawCurrency>>,
}

/// One currency entry of a [`RawCountry`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCurrency {
    pub code: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Body of the exchange-rate API.
///
/// `result` is `"success"` on a good response; the provider reports errors
/// with a 200 status and a different `result` value.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesPayload {
    pub result: Option<String>,
    #[serde(default)]
    pub rates: RateTable,
}

/// Expected value of [`RatesPayload::result`].
pub const RATES_RESULT_SUCCESS: &str = "success";

impl RatesPayload {
    /// Whether the provider flagged the response as an error.
    pub fn is_rejected(&self) -> bool {
        self.result
            .as_deref()
            .is_some_and(|r| r != RATES_RESULT_SUCCESS)
    }
}
