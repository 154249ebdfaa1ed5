//! Repository for the `countries` table.
//!
//! Names are matched case-insensitively everywhere: reads compare
//! `LOWER(name)` and writes go through the `uq_countries_name_lower` index.

use countryfx_core::query::{CountryFilter, CountrySort};
use countryfx_core::types::Timestamp;
use sqlx::{PgExecutor, PgPool};

use crate::models::country::{Country, CountryStats, UpsertCountry};

/// Column list for `countries` queries.
const COLUMNS: &str = "\
    id, name, capital, region, population, currency_code, exchange_rate, \
    estimated_gdp, flag_url, last_refreshed_at, created_at, updated_at";

/// Provides upsert, query and delete operations for countries.
pub struct CountryRepo;

impl CountryRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a country or update the existing row with the same
    /// case-folded name.
    ///
    /// On update the `id` is kept, every other column is overwritten, and
    /// `name` takes the casing of `input`.
    pub async fn upsert<'e, E>(
        executor: E,
        input: &UpsertCountry,
        refreshed_at: Timestamp,
    ) -> Result<Country, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO countries \
                (name, capital, region, population, currency_code, exchange_rate, \
                 estimated_gdp, flag_url, last_refreshed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (LOWER(name)) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 capital = EXCLUDED.capital, \
                 region = EXCLUDED.region, \
                 population = EXCLUDED.population, \
                 currency_code = EXCLUDED.currency_code, \
                 exchange_rate = EXCLUDED.exchange_rate, \
                 estimated_gdp = EXCLUDED.estimated_gdp, \
                 flag_url = EXCLUDED.flag_url, \
                 last_refreshed_at = EXCLUDED.last_refreshed_at, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(&input.name)
            .bind(input.capital.as_deref())
            .bind(input.region.as_deref())
            .bind(input.population)
            .bind(input.currency_code.as_deref())
            .bind(input.exchange_rate)
            .bind(input.estimated_gdp)
            .bind(input.flag_url.as_deref())
            .bind(refreshed_at)
            .fetch_one(executor)
            .await
    }

    /// Upsert a whole refresh batch in one transaction.
    ///
    /// Every row gets the same `refreshed_at`. Any failure rolls back the
    /// entire batch.
    pub async fn bulk_upsert(
        pool: &PgPool,
        inputs: &[UpsertCountry],
        refreshed_at: Timestamp,
    ) -> Result<Vec<Country>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(inputs.len());

        for input in inputs {
            let row = Self::upsert(&mut *tx, input, refreshed_at).await?;
            results.push(row);
        }

        tx.commit().await?;
        tracing::debug!(count = results.len(), "Country batch upserted");
        Ok(results)
    }

    /// Delete a country by case-insensitive name.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM countries WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a country by case-insensitive name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM countries WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, Country>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List countries matching `filter`.
    ///
    /// Without a sort the rows come back in insertion (`id`) order. GDP
    /// sorts put null estimates last in both directions; ties fall back to
    /// `id`.
    pub async fn list(pool: &PgPool, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.region.is_some() {
            conditions.push(format!("region ILIKE ${bind_idx} ESCAPE '\\'"));
            bind_idx += 1;
        }
        if filter.currency.is_some() {
            conditions.push(format!("LOWER(currency_code) = LOWER(${bind_idx})"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM countries {where_clause} ORDER BY {order_clause}",
            order_clause = order_clause(filter.sort),
        );

        let mut q = sqlx::query_as::<_, Country>(&query);

        if let Some(ref region) = filter.region {
            q = q.bind(format!("%{}%", escape_like(region)));
        }
        if let Some(ref currency) = filter.currency {
            q = q.bind(currency);
        }

        q.fetch_all(pool).await
    }

    /// Top `limit` countries by estimated GDP, skipping null estimates.
    pub async fn top_by_gdp(pool: &PgPool, limit: i64) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM countries \
             WHERE estimated_gdp IS NOT NULL \
             ORDER BY estimated_gdp DESC, id \
             LIMIT $1"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(limit.max(0))
            .fetch_all(pool)
            .await
    }

    /// Total number of stored countries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM countries")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Most recent `last_refreshed_at`, or `None` for an empty table.
    pub async fn last_refreshed_at(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        let (ts,): (Option<Timestamp>,) =
            sqlx::query_as("SELECT MAX(last_refreshed_at) FROM countries")
                .fetch_one(pool)
                .await?;
        Ok(ts)
    }

    /// Count and latest refresh in a single round trip.
    pub async fn stats(pool: &PgPool) -> Result<CountryStats, sqlx::Error> {
        sqlx::query_as::<_, CountryStats>(
            "SELECT COUNT(*) AS total_countries, MAX(last_refreshed_at) AS last_refreshed_at \
             FROM countries",
        )
        .fetch_one(pool)
        .await
    }
}

/// `ORDER BY` clause for a sort choice.
fn order_clause(sort: Option<CountrySort>) -> &'static str {
    match sort {
        None => "id",
        Some(CountrySort::GdpDesc) => "estimated_gdp DESC NULLS LAST, id",
        Some(CountrySort::GdpAsc) => "estimated_gdp ASC NULLS LAST, id",
        Some(CountrySort::PopulationDesc) => "population DESC, id",
        Some(CountrySort::PopulationAsc) => "population ASC, id",
        Some(CountrySort::NameAsc) => "LOWER(name) ASC, id",
        Some(CountrySort::NameDesc) => "LOWER(name) DESC, id",
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
