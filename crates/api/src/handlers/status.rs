use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use countryfx_db::repositories::CountryRepo;

use crate::error::AppResult;
use crate::response::StatusResponse;
use crate::state::AppState;

/// GET /status
///
/// Row count and the most recent refresh time (null before the first one).
pub async fn get_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = CountryRepo::stats(&state.pool).await?;

    Ok(Json(StatusResponse {
        total_countries: stats.total_countries,
        last_refreshed_at: stats.last_refreshed_at,
    }))
}
