use std::sync::Arc;

use countryfx_core::gdp::MultiplierFactory;
use countryfx_core::summary::SummaryRenderer;
use countryfx_sources::DataSources;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything but the pool sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: countryfx_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Upstream country and exchange-rate feeds.
    pub sources: Arc<dyn DataSources>,
    /// Builds a fresh GDP multiplier for each refresh.
    pub multiplier: MultiplierFactory,
    /// Writes the summary image after a refresh.
    pub renderer: Arc<dyn SummaryRenderer>,
}
