//! Country model and DTOs.

use countryfx_core::merge::MergedCountry;
use countryfx_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `countries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Timestamp,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// `COUNT(*)` and `MAX(last_refreshed_at)` over the whole table.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct CountryStats {
    pub total_countries: i64,
    pub last_refreshed_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert-or-update payload keyed by case-folded `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

impl From<MergedCountry> for UpsertCountry {
    fn from(merged: MergedCountry) -> Self {
        Self {
            name: merged.name,
            capital: merged.capital,
            region: merged.region,
            population: merged.population,
            currency_code: merged.currency_code,
            exchange_rate: merged.exchange_rate,
            estimated_gdp: merged.estimated_gdp,
            flag_url: merged.flag_url,
        }
    }
}

/// Query parameters for `GET /countries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryListParams {
    /// Case-insensitive substring of the region.
    pub region: Option<String>,
    /// Case-insensitive currency code.
    pub currency: Option<String>,
    /// One of the `CountrySort` tokens.
    pub sort: Option<String>,
}
