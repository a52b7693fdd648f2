//! Canned catalog responses for tests and offline use.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::ClientTrait;
use crate::error::MockDataError;
use crate::types::{Record, SearchLimit};

/// A response served by the [MockClient], tagged with the operation it
/// answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "response", rename_all = "snake_case")]
pub enum MockResponse {
    Search(Vec<Record>),
    Detail(Option<Record>),
    Categories(Vec<Record>),
    ByCategory(Vec<Record>),
    Popular(Vec<Record>),
}

/// A catalog client that answers from a queue of canned responses.
///
/// Each call pops the next response. When the queue is empty, or the next
/// response belongs to a different operation, the operation's empty default
/// is returned.
#[derive(Debug, Default)]
pub struct MockClient {
    mock_responses: Mutex<VecDeque<MockResponse>>,
}

impl MockClient {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            mock_responses: Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Read a JSON array of [MockResponse]s from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MockDataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let responses: Vec<MockResponse> =
            serde_json::from_str(&contents).map_err(|source| MockDataError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), n_responses = responses.len(), "loaded mock responses");
        Ok(Self::new(responses))
    }

    pub fn push_response(&self, response: MockResponse) {
        self.lock().push_back(response);
    }

    /// Number of responses not yet served.
    pub fn remaining(&self) -> usize {
        self.lock().len()
    }

    fn pop_response(&self, operation: &str) -> Option<MockResponse> {
        let response = self.lock().pop_front();
        if response.is_none() {
            warn!(operation, "no mock response left");
        }
        response
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<MockResponse>> {
        self.mock_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn mismatch(operation: &str, response: &MockResponse) {
    warn!(operation, ?response, "mock response is for a different operation");
}

impl ClientTrait for MockClient {
    async fn search(&self, _query: &str, limit: SearchLimit) -> Vec<Record> {
        match self.pop_response("search") {
            Some(MockResponse::Search(mut records)) => {
                records.truncate(limit);
                records
            },
            Some(other) => {
                mismatch("search", &other);
                Vec::new()
            },
            None => Vec::new(),
        }
    }

    async fn detail(&self, _game_id: &str) -> Option<Record> {
        match self.pop_response("detail") {
            Some(MockResponse::Detail(record)) => record,
            Some(other) => {
                mismatch("detail", &other);
                None
            },
            None => None,
        }
    }

    async fn categories(&self) -> Vec<Record> {
        match self.pop_response("categories") {
            Some(MockResponse::Categories(records)) => records,
            Some(other) => {
                mismatch("categories", &other);
                Vec::new()
            },
            None => Vec::new(),
        }
    }

    async fn by_category(&self, _category_id: &str, limit: SearchLimit) -> Vec<Record> {
        match self.pop_response("by_category") {
            Some(MockResponse::ByCategory(mut records)) => {
                records.truncate(limit);
                records
            },
            Some(other) => {
                mismatch("by_category", &other);
                Vec::new()
            },
            None => Vec::new(),
        }
    }

    async fn popular(&self, limit: SearchLimit) -> Vec<Record> {
        match self.pop_response("popular") {
            Some(MockResponse::Popular(mut records)) => {
                records.truncate(limit);
                records
            },
            Some(other) => {
                mismatch("popular", &other);
                Vec::new()
            },
            None => Vec::new(),
        }
    }

    fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn serves_responses_in_order() {
        let catan = record(json!({"id": "1", "name": "Catan"}));
        let client = MockClient::new([
            MockResponse::Search(vec![catan.clone()]),
            MockResponse::Detail(Some(catan.clone())),
        ]);

        assert_eq!(client.search("catan", 10).await, vec![catan.clone()]);
        assert_eq!(client.detail("1").await, Some(catan));
        assert_eq!(client.remaining(), 0);
        assert_eq!(client.categories().await, vec![]);
    }

    #[tokio::test]
    async fn mismatched_response_yields_empty_default() {
        let client = MockClient::new([MockResponse::Categories(vec![record(json!({"id": "c"}))])]);

        assert_eq!(client.detail("1").await, None);
        assert_eq!(client.remaining(), 0);
    }

    #[tokio::test]
    async fn list_responses_respect_limit() {
        let games = (0..5)
            .map(|i| record(json!({"id": i.to_string()})))
            .collect::<Vec<_>>();
        let client = MockClient::default();
        client.push_response(MockResponse::Popular(games.clone()));

        assert_eq!(client.popular(2).await, games[..2].to_vec());
    }

    #[tokio::test]
    async fn reads_responses_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!([
                {"operation": "by_category", "response": [{"id": "1"}]},
                {"operation": "detail", "response": null},
            ])
        )
        .unwrap();

        let client = MockClient::from_file(file.path()).unwrap();

        assert_eq!(client.remaining(), 2);
        assert_eq!(client.by_category("party", 10).await, vec![record(json!({"id": "1"}))]);
        assert_eq!(client.detail("1").await, None);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = MockClient::from_file("/does/not/exist.json").unwrap_err();
        assert!(matches!(err, MockDataError::Read { .. }), "found: {err:?}");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"operation\": \"teleport\"}}").unwrap();

        let err = MockClient::from_file(file.path()).unwrap_err();
        assert!(matches!(err, MockDataError::Parse { .. }), "found: {err:?}");
    }
}
