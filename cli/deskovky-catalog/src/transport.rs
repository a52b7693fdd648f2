//! A single HTTP session against the catalog and the classification of
//! each request's outcome.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransportError;

/// Total time allowed for one request, including reading the body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The outcome of a single request.
///
/// Failures keep their reason for logging, but to callers a failure means
/// the same as [TransportOutcome::NotFound]: nothing here.
#[derive(Debug)]
pub enum TransportOutcome {
    Payload(Value),
    NotFound,
    Failed(TransportError),
}

impl TransportOutcome {
    /// Collapse the outcome to "data or nothing".
    pub fn into_payload(self) -> Option<Value> {
        match self {
            TransportOutcome::Payload(value) => Some(value),
            TransportOutcome::NotFound | TransportOutcome::Failed(_) => None,
        }
    }
}

/// Owns the HTTP session used for every request to one catalog.
///
/// The session is opened on first use and again after [Transport::close].
/// Requests only hold a handle to the session, so they can run concurrently.
pub struct Transport {
    base_url: String,
    user_agent: Option<String>,
    timeout: Duration,
    session: Mutex<Option<reqwest::Client>>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(base_url: impl AsRef<str>, user_agent: Option<String>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            user_agent,
            timeout: REQUEST_TIMEOUT,
            session: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join the base url and `path` with exactly one slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Whether a session is currently held.
    pub fn is_open(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Send one request and classify the response.
    ///
    /// Never fails: timeouts, connection errors, unexpected statuses and
    /// undecodable bodies are logged and returned as
    /// [TransportOutcome::Failed].
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> TransportOutcome {
        let url = self.url(path);

        let session = match self.session() {
            Ok(session) => session,
            Err(err) => {
                warn!(%url, error = %err, "catalog session unavailable");
                return TransportOutcome::Failed(err);
            },
        };

        let mut request = session.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = TransportError::from_request(err);
                match err {
                    TransportError::Timeout => warn!(%url, "catalog request timed out"),
                    _ => warn!(%url, error = %err, "catalog request error"),
                }
                return TransportOutcome::Failed(err);
            },
        };

        match response.status() {
            StatusCode::OK => match response.json::<Value>().await {
                Ok(payload) => TransportOutcome::Payload(payload),
                Err(err) if err.is_timeout() => {
                    warn!(%url, "catalog request timed out");
                    TransportOutcome::Failed(TransportError::Timeout)
                },
                Err(err) => {
                    warn!(%url, error = %err, "catalog response is not valid JSON");
                    TransportOutcome::Failed(TransportError::Decode(err))
                },
            },
            StatusCode::NOT_FOUND => {
                debug!(%url, "catalog endpoint not found");
                TransportOutcome::NotFound
            },
            status => {
                warn!(%url, %status, "catalog request failed");
                TransportOutcome::Failed(TransportError::Status(status))
            },
        }
    }

    /// Release the session if one is open. Safe to call repeatedly.
    pub fn close(&self) {
        let closed = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if closed.is_some() {
            debug!(base_url = %self.base_url, "closed catalog session");
        }
    }

    /// Return the open session, opening one if needed.
    fn session(&self) -> Result<reqwest::Client, TransportError> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }

        let client = build_http_client(self.user_agent.as_deref(), self.timeout)?;
        debug!(base_url = %self.base_url, "opened catalog session");
        *session = Some(client.clone());
        Ok(client)
    }
}

fn build_http_client(
    user_agent: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, TransportError> {
    let client_builder = reqwest::Client::builder().timeout(timeout);

    let client_builder = if let Some(user_agent) = user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder.build().map_err(TransportError::Session)
}
