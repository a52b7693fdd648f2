//! HTTP client for the zatrolene-hry.cz board game catalog.
//!
//! This crate provides:
//! - A [`Transport`] owning a lazily created, reusable HTTP session
//! - A [`CatalogClient`] that resolves each catalog operation against an
//!   ordered list of candidate endpoints and normalizes whatever shape the
//!   backend answers with into [`Record`]s
//! - A [`MockClient`] serving canned responses for tests and offline use
//!
//! ## Usage
//!
//! ```ignore
//! use deskovky_catalog::{CatalogClient, CatalogClientConfig, ClientTrait};
//!
//! let client = CatalogClient::new(CatalogClientConfig::new("https://www.zatrolene-hry.cz/api"))?;
//! let games = client.search("catan", 10).await;
//! client.close();
//! ```

mod client;
mod config;
mod error;
mod mock;
mod shape;
mod transport;
mod types;

pub use client::{CatalogClient, Client, ClientTrait};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL};
pub use error::{CatalogClientError, MockDataError, TransportError};
pub use mock::{MockClient, MockResponse};
pub use shape::{ListShape, RecordShape};
pub use transport::{REQUEST_TIMEOUT, Transport, TransportOutcome};
pub use types::{DEFAULT_SEARCH_LIMIT, Record, SearchLimit};
