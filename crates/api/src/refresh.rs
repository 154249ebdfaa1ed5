//! The refresh pipeline: fetch, merge, upsert, summarize.
//!
//! Nothing is written unless both upstream fetches succeed and the whole
//! country list validates. The upsert batch is a single transaction, and
//! the summary image is rendered only after it commits.

use std::sync::Arc;

use chrono::Utc;
use countryfx_core::error::CoreError;
use countryfx_core::merge::merge_all;
use countryfx_core::summary::{RankedCountry, RefreshSummary, TOP_COUNTRIES};
use countryfx_db::models::country::UpsertCountry;
use countryfx_db::repositories::CountryRepo;
use countryfx_sources::fetch_all;

use crate::error::AppResult;
use crate::state::AppState;

/// Counts reported back to the caller of a refresh.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub total_processed: usize,
    pub skipped: usize,
    pub summary: RefreshSummary,
}

/// Run one full refresh against the state's sources and store.
pub async fn run_refresh(state: &AppState) -> AppResult<RefreshReport> {
    let (raw_countries, rates) = fetch_all(state.sources.as_ref())
        .await
        .map_err(CoreError::from)?;

    let outcome = {
        let mut multiplier = (state.multiplier)();
        merge_all(&raw_countries, &rates, &mut *multiplier)?
    };

    let batch: Vec<UpsertCountry> = outcome.records.into_iter().map(UpsertCountry::from).collect();
    let refreshed_at = Utc::now();
    CountryRepo::bulk_upsert(&state.pool, &batch, refreshed_at).await?;

    tracing::info!(
        fetched = raw_countries.len(),
        upserted = batch.len(),
        skipped = outcome.skipped,
        rates = rates.len(),
        "Countries refreshed",
    );

    let summary = load_summary(state).await?;
    render_summary(state, summary.clone()).await;

    Ok(RefreshReport {
        total_processed: batch.len(),
        skipped: outcome.skipped,
        summary,
    })
}

/// Aggregate snapshot used for the response and the image.
async fn load_summary(state: &AppState) -> AppResult<RefreshSummary> {
    let stats = CountryRepo::stats(&state.pool).await?;
    let top = CountryRepo::top_by_gdp(&state.pool, TOP_COUNTRIES).await?;

    Ok(RefreshSummary {
        total_countries: stats.total_countries,
        top_countries: top
            .into_iter()
            .filter_map(|c| {
                c.estimated_gdp.map(|gdp| RankedCountry {
                    name: c.name,
                    estimated_gdp: gdp,
                })
            })
            .collect(),
        last_refreshed_at: stats.last_refreshed_at,
    })
}

/// Render the summary image off the async runtime.
///
/// Failures are logged and swallowed: the data is already committed.
async fn render_summary(state: &AppState, summary: RefreshSummary) {
    let renderer = Arc::clone(&state.renderer);
    let path = state.config.summary_image_path.clone();

    let result = tokio::task::spawn_blocking(move || {
        renderer.render(&summary, &path).map(|()| path)
    })
    .await;

    match result {
        Ok(Ok(path)) => tracing::debug!(path = %path.display(), "Summary image written"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Summary image rendering failed"),
        Err(e) => tracing::warn!(error = %e, "Summary image task failed"),
    }
}
