use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment, FileFormat};
use deskovky_catalog::{CatalogClientConfig, DEFAULT_CATALOG_URL, DEFAULT_SEARCH_LIMIT, SearchLimit};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xdg::BaseDirectories;

/// Name of deskovky managed directories
pub const DESKOVKY_DIR_NAME: &str = "deskovky";
pub const DESKOVKY_CONFIG_FILE: &str = "deskovky.toml";
/// Prefix of environment variables overriding config keys,
/// e.g. `DESKOVKY_CATALOG_URL`
const DESKOVKY_ENV_PREFIX: &str = "DESKOVKY";

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the board game catalog API
    pub catalog_url: String,

    /// Prefix marking a chat message as a bot command
    pub command_prefix: String,

    /// How many results list commands request from the catalog
    pub search_limit: SearchLimit,

    /// `User-Agent` sent to the catalog
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Config {
    /// Read the configuration from all known sources.
    ///
    /// Lowest to highest precedence: built-in defaults, `/etc/deskovky.toml`,
    /// `deskovky.toml` in the XDG config directories, `DESKOVKY_*`
    /// environment variables, `catalog_url_override` (the `--catalog-url` flag).
    pub fn parse(catalog_url_override: Option<String>) -> Result<Config> {
        let dirs = BaseDirectories::with_prefix(DESKOVKY_DIR_NAME);

        let mut files = vec![PathBuf::from("/etc").join(DESKOVKY_CONFIG_FILE)];
        // xdg yields the most important file first
        let mut user_files = dirs
            .find_config_files(DESKOVKY_CONFIG_FILE)
            .collect::<Vec<_>>();
        user_files.reverse();
        files.extend(user_files);

        Self::parse_from(&files, catalog_url_override)
    }

    fn parse_from(files: &[impl AsRef<Path>], catalog_url_override: Option<String>) -> Result<Config> {
        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", DEFAULT_CATALOG_URL)?
            .set_default("command_prefix", DEFAULT_COMMAND_PREFIX)?
            .set_default("search_limit", DEFAULT_SEARCH_LIMIT as i64)?;

        for file in files {
            let file = file.as_ref();
            debug!(file = %file.display(), "adding config source");
            builder = builder.add_source(
                config::File::from(file)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let config = builder
            .add_source(Environment::with_prefix(DESKOVKY_ENV_PREFIX))
            .set_override_option("catalog_url", catalog_url_override)?
            .build()
            .context("Could not read configuration")?
            .try_deserialize::<Config>()
            .context("Invalid configuration")?;

        debug!(?config, "read config");
        Ok(config)
    }

    pub fn catalog_client_config(&self) -> CatalogClientConfig {
        CatalogClientConfig {
            catalog_url: self.catalog_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}
