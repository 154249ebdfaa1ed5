use axum::routing::{get, post};
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Country routes mounted at `/countries`.
///
/// The static `/refresh` and `/image` segments take priority over
/// `/{name}`.
///
/// ```text
/// GET    /              -> list_countries
/// POST   /refresh       -> refresh
/// GET    /image         -> summary_image
/// GET    /{name}        -> get_country
/// DELETE /{name}        -> delete_country
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::list_countries))
        .route("/refresh", post(countries::refresh))
        .route("/image", get(countries::summary_image))
        .route(
            "/{name}",
            get(countries::get_country).delete(countries::delete_country),
        )
}
