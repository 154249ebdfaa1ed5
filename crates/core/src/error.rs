use crate::country::DataSource;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {field} {message}")]
    Validation { field: &'static str, message: String },

    #[error("External data source unavailable ({data_source}): {reason}")]
    SourceUnavailable {
        data_source: DataSource,
        reason: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
