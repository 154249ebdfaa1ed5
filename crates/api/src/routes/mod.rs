pub mod countries;
pub mod health;
pub mod status;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree (mounted at the root).
///
/// ```text
/// POST   /countries/refresh        refresh from upstream
/// GET    /countries                list (region, currency, sort)
/// GET    /countries/image          summary PNG
/// GET    /countries/{name}         single record
/// DELETE /countries/{name}         remove record
/// GET    /status                   count and last refresh
/// GET    /health                   liveness and DB reachability
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/countries", countries::router())
        .merge(status::router())
        .merge(health::router())
}
