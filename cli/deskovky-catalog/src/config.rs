//! Configuration types for catalog client construction.

/// Catalog used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://www.zatrolene-hry.cz/api";

/// Configuration for catalog client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    // Kept as a String; parsing into a Url would add a trailing slash.
    pub catalog_url: String,
    /// Optional `User-Agent` sent with every request.
    pub user_agent: Option<String>,
}

impl CatalogClientConfig {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            user_agent: None,
        }
    }
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}
