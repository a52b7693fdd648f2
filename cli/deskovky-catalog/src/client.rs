//! Catalog client resolving logical operations against candidate endpoints.

use std::fmt::Debug;

use enum_dispatch::enum_dispatch;
use reqwest::Method;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::CatalogClientError;
use crate::mock::MockClient;
use crate::shape::{ListShape, RecordShape};
use crate::transport::Transport;
use crate::types::{Record, SearchLimit};

const SEARCH_ENDPOINTS: &[&str] = &["games/search", "search", "games"];
const CATEGORY_ENDPOINTS: &[&str] = &["categories", "game-categories", "genres"];
const POPULAR_ENDPOINTS: &[&str] = &["games/popular", "games/trending", "games"];

/// The catalog operations available to the bot.
///
/// None of them fail: a missing catalog, a failing backend and an empty
/// result all look the same to the caller.
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Search for games matching `query`.
    async fn search(&self, query: &str, limit: SearchLimit) -> Vec<Record>;

    /// Get details of a single game.
    async fn detail(&self, game_id: &str) -> Option<Record>;

    /// List the game categories.
    async fn categories(&self) -> Vec<Record>;

    /// List games in a category.
    async fn by_category(&self, category_id: &str, limit: SearchLimit) -> Vec<Record>;

    /// List popular or trending games.
    async fn popular(&self, limit: SearchLimit) -> Vec<Record>;

    /// Release any held network resources.
    fn close(&self);
}

#[enum_dispatch(ClientTrait)]
#[derive(Debug)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

/// A client for the board game catalog.
///
/// The backend's endpoint layout is not documented, so every operation
/// tries a fixed list of candidate endpoints in order and returns the first
/// usable answer.
pub struct CatalogClient {
    config: CatalogClientConfig,
    transport: Transport,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    ///
    /// Only validates the catalog url; no connection is made until the
    /// first request.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let url = Url::parse(&config.catalog_url).map_err(|source| {
            CatalogClientError::InvalidUrl {
                url: config.catalog_url.clone(),
                source,
            }
        })?;
        if url.cannot_be_a_base() {
            return Err(CatalogClientError::CannotBeABase(config.catalog_url));
        }

        debug!(
            catalog_url = %config.catalog_url,
            user_agent = ?config.user_agent,
            "creating catalog client"
        );
        let transport = Transport::new(&config.catalog_url, config.user_agent.clone());

        Ok(Self { config, transport })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.transport = self.transport.with_timeout(timeout);
        self
    }

    /// Try `candidates` in order, returning the first non-empty list.
    ///
    /// A candidate that answers with an empty or unrecognized shape does not
    /// stop the search.
    async fn first_list(
        &self,
        candidates: &[impl AsRef<str>],
        query: &[(&str, String)],
        shape: ListShape,
    ) -> Vec<Record> {
        for endpoint in candidates {
            let endpoint = endpoint.as_ref();
            let outcome = self
                .transport
                .request(endpoint, Method::GET, query, None)
                .await;

            let Some(payload) = outcome.into_payload() else {
                debug!(endpoint, "no data from candidate endpoint");
                continue;
            };

            let records = shape.extract(payload);
            if records.is_empty() {
                debug!(endpoint, "no records in response from candidate endpoint");
                continue;
            }

            debug!(endpoint, n_records = records.len(), "using candidate endpoint");
            return records;
        }

        Vec::new()
    }

    /// Try `candidates` in order, returning the first record found.
    async fn first_record(
        &self,
        candidates: &[impl AsRef<str>],
        shape: RecordShape,
    ) -> Option<Record> {
        for endpoint in candidates {
            let endpoint = endpoint.as_ref();
            let outcome = self.transport.request(endpoint, Method::GET, &[], None).await;

            let Some(payload) = outcome.into_payload() else {
                debug!(endpoint, "no data from candidate endpoint");
                continue;
            };

            match shape.extract(payload) {
                Some(record) => {
                    debug!(endpoint, "using candidate endpoint");
                    return Some(record);
                },
                None => debug!(endpoint, "no record in response from candidate endpoint"),
            }
        }

        None
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: SearchLimit) -> Vec<Record> {
        let params = [("query", query.to_string()), ("limit", limit.to_string())];
        let results = self
            .first_list(SEARCH_ENDPOINTS, &params, ListShape::SEARCH)
            .await;

        if results.is_empty() {
            info!(query, "no results found for query");
        }
        limit_results(results, limit)
    }

    #[instrument(skip(self))]
    async fn detail(&self, game_id: &str) -> Option<Record> {
        let game_id = url_escape::encode_component(game_id);
        let candidates = [format!("games/{game_id}"), format!("game/{game_id}")];
        self.first_record(&candidates, RecordShape::GAME).await
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Vec<Record> {
        self.first_list(CATEGORY_ENDPOINTS, &[], ListShape::CATEGORIES)
            .await
    }

    #[instrument(skip(self))]
    async fn by_category(&self, category_id: &str, limit: SearchLimit) -> Vec<Record> {
        let category_id = url_escape::encode_component(category_id);
        let candidates = [
            format!("categories/{category_id}/games"),
            format!("games?category={category_id}"),
        ];
        let params = [("limit", limit.to_string())];
        let results = self
            .first_list(&candidates, &params, ListShape::GAMES)
            .await;

        if results.is_empty() {
            info!(%category_id, "no results found for category");
        }
        limit_results(results, limit)
    }

    #[instrument(skip(self))]
    async fn popular(&self, limit: SearchLimit) -> Vec<Record> {
        let params = [("limit", limit.to_string())];
        let results = self
            .first_list(POPULAR_ENDPOINTS, &params, ListShape::GAMES)
            .await;

        if results.is_empty() {
            info!("no popular games found");
        }
        limit_results(results, limit)
    }

    fn close(&self) {
        self.transport.close();
    }
}

/// Upstream does not reliably honor `limit`, so enforce it here.
fn limit_results(mut results: Vec<Record>, limit: SearchLimit) -> Vec<Record> {
    results.truncate(limit);
    results
}
