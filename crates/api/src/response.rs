//! Response bodies shared by several handlers.
//!
//! Country records are returned bare (no envelope); these types cover the
//! remaining shapes.

use countryfx_core::types::Timestamp;
use serde::Serialize;

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total_countries: i64,
    pub last_refreshed_at: Option<Timestamp>,
}

/// Body of `POST /countries/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    /// Countries written in this refresh.
    pub total_processed: usize,
    /// Upstream entries dropped for lacking a name or population.
    pub skipped: usize,
    /// Rows in the store after the refresh.
    pub total_countries: i64,
    pub last_refreshed_at: Option<Timestamp>,
}
