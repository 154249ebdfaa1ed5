use countryfx_core::country::DataSource;
use countryfx_core::error::CoreError;

/// Failure fetching one of the upstream APIs.
///
/// Every variant names the [`DataSource`] it came from.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("request to {data_source} failed: {error}")]
    Transport {
        data_source: DataSource,
        #[source]
        error: reqwest::Error,
    },

    /// The API answered with a non-2xx status code.
    #[error("{data_source} returned HTTP {status}")]
    Status { data_source: DataSource, status: u16 },

    /// The body was not the expected JSON shape.
    #[error("{data_source} returned an unreadable body: {error}")]
    Decode {
        data_source: DataSource,
        #[source]
        error: reqwest::Error,
    },

    /// The API answered 200 but flagged the payload as an error.
    #[error("{data_source} reported result '{result}'")]
    Rejected {
        data_source: DataSource,
        result: String,
    },
}

impl SourceError {
    pub fn data_source(&self) -> DataSource {
        match self {
            SourceError::Transport { data_source, .. }
            | SourceError::Status { data_source, .. }
            | SourceError::Decode { data_source, .. }
            | SourceError::Rejected { data_source, .. } => *data_source,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Transport { error, .. } if error.is_timeout())
    }
}

impl From<SourceError> for CoreError {
    fn from(err: SourceError) -> Self {
        CoreError::SourceUnavailable {
            data_source: err.data_source(),
            reason: err.to_string(),
        }
    }
}
