//! Gateway configuration loaded from file and environment.
//!
//! | Source | Notes |
//! |--------|-------|
//! | defaults | see `MindcopyConfig::load` |
//! | file | `MINDCOPY_CONFIG` path, default `config/mindcopy` (toml) |
//! | env | `MINDCOPY__PORT`, `MINDCOPY__STORAGE_PATH`, ... |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::offline_cache::{DEFAULT_ASSET_MANIFEST, DEFAULT_CACHE_VERSION};
use crate::shell::DEFAULT_ENTRY_PATH;
use crate::store::DEFAULT_STATE_KEY;
use crate::transfer::DEFAULT_EXPORT_FILE_NAME;

fn default_state_key() -> String {
    DEFAULT_STATE_KEY.to_string()
}

fn default_cache_version() -> String {
    DEFAULT_CACHE_VERSION.to_string()
}

fn default_asset_manifest() -> Vec<String> {
    DEFAULT_ASSET_MANIFEST.iter().map(|p| p.to_string()).collect()
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

fn default_entry_path() -> String {
    DEFAULT_ENTRY_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindcopyConfig {
    pub app_name: String,
    /// Bind address; loopback unless overridden.
    pub host: String,
    pub port: u16,
    /// Base directory for Sled DBs (state slot and asset cache).
    pub storage_path: String,
    #[serde(default = "default_state_key")]
    pub state_key: String,
    /// Directory the cache worker treats as the network.
    pub assets_dir: String,
    /// When set, assets are fetched from this origin instead of `assets_dir`.
    #[serde(default)]
    pub upstream_url: Option<String>,
    /// Bump whenever the manifest or any asset changes.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,
    #[serde(default = "default_asset_manifest")]
    pub asset_manifest: Vec<String>,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    #[serde(default = "default_entry_path")]
    pub entry_path: String,
}

impl Default for MindcopyConfig {
    fn default() -> Self {
        Self {
            app_name: "MindCopy".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            storage_path: "./data".to_string(),
            state_key: default_state_key(),
            assets_dir: "./static".to_string(),
            upstream_url: None,
            cache_version: default_cache_version(),
            asset_manifest: default_asset_manifest(),
            export_file_name: default_export_file_name(),
            entry_path: default_entry_path(),
        }
    }
}

impl MindcopyConfig {
    /// Load config from file and environment. Precedence: env `MINDCOPY__*` > file
    /// (`MINDCOPY_CONFIG`, default `config/mindcopy`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("MINDCOPY_CONFIG").unwrap_or_else(|_| "config/mindcopy".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("storage_path", defaults.storage_path)?
            .set_default("assets_dir", defaults.assets_dir)?;

        let with_ext = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if with_ext.is_file() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        builder
            .add_source(config::Environment::with_prefix("MINDCOPY").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn state_db_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("mind_state")
    }

    pub fn cache_db_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("asset_cache")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
