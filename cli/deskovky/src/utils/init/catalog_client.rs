use std::path::PathBuf;

use anyhow::{Context, bail};
use deskovky_catalog::{CatalogClient, Client, MockClient};
use tracing::debug;

use crate::config::Config;

/// Path to a JSON file of canned catalog responses.
pub const DESKOVKY_CATALOG_MOCK_DATA_VAR: &str = "DESKOVKY_CATALOG_MOCK_DATA";

/// Initialize the catalog client
///
/// - Initialize a mock client if `$DESKOVKY_CATALOG_MOCK_DATA` points to mock data
/// - Initialize a client for the configured catalog otherwise
pub fn init_catalog_client(config: &Config) -> Result<Client, anyhow::Error> {
    if let Ok(path_str) = std::env::var(DESKOVKY_CATALOG_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock catalog client");
        return Ok(MockClient::from_file(&path)?.into());
    }

    debug!(catalog_url = %config.catalog_url, "using catalog client");
    let client = CatalogClient::new(config.catalog_client_config())
        .context("Could not create catalog client")?;
    Ok(client.into())
}
