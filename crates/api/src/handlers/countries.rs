//! Handlers for the country collection, single records, refresh and the
//! summary image.

use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use countryfx_core::error::CoreError;
use countryfx_core::query::CountryFilter;
use countryfx_db::models::country::CountryListParams;
use countryfx_db::repositories::CountryRepo;

use crate::error::{AppError, AppResult};
use crate::refresh::run_refresh;
use crate::response::{MessageResponse, RefreshResponse};
use crate::state::AppState;

fn country_not_found(name: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Country",
        key: name,
    })
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// POST /countries/refresh
///
/// Pull both upstream feeds, upsert every country and regenerate the
/// summary image.
pub async fn refresh(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = run_refresh(&state).await?;

    Ok(Json(RefreshResponse {
        message: "Countries refreshed successfully",
        total_processed: report.total_processed,
        skipped: report.skipped,
        total_countries: report.summary.total_countries,
        last_refreshed_at: report.summary.last_refreshed_at,
    }))
}

// ---------------------------------------------------------------------------
// Collection and records
// ---------------------------------------------------------------------------

/// GET /countries
///
/// Optional `region` (substring), `currency` (exact code) and `sort`
/// parameters, all case-insensitive.
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<CountryListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = CountryFilter::from_params(
        params.region.as_deref(),
        params.currency.as_deref(),
        params.sort.as_deref(),
    )?;

    let countries = CountryRepo::list(&state.pool, &filter).await?;
    Ok(Json(countries))
}

/// GET /countries/{name}
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let country = CountryRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| country_not_found(name))?;

    Ok(Json(country))
}

/// DELETE /countries/{name}
pub async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = CountryRepo::delete_by_name(&state.pool, &name).await?;

    if !deleted {
        return Err(country_not_found(name));
    }

    tracing::info!(name = %name, "Country deleted");

    Ok(Json(MessageResponse::new(format!(
        "Country '{name}' deleted successfully"
    ))))
}

// ---------------------------------------------------------------------------
// Summary image
// ---------------------------------------------------------------------------

/// GET /countries/image
///
/// Serves the PNG written by the last successful refresh.
pub async fn summary_image(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let path = &state.config.summary_image_path;

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Summary image",
                key: path.display().to_string(),
            }));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to read summary image {}: {e}",
                path.display()
            )));
        }
    };

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, "no-cache")],
        bytes,
    ))
}
