//! Error handling for catalog API operations.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced while constructing a catalog client.
///
/// Operations never return these; "no data" is always an empty result.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog url '{0}' cannot be used as a base url")]
    CannotBeABase(String),
}

/// Why a single request produced no data.
///
/// Only ever logged; the catalog client collapses every variant into an
/// absent payload.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("request failed")]
    Request(#[source] reqwest::Error),
    #[error("could not decode response body as JSON")]
    Decode(#[source] reqwest::Error),
    #[error("could not create http session")]
    Session(#[source] reqwest::Error),
}

impl TransportError {
    /// Classify a request error, separating timeouts from everything else.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err)
        }
    }
}

/// Errors reading canned responses for the [crate::MockClient].
#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("could not read mock data file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse mock data file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
