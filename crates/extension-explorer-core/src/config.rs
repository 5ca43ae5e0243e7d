use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::selector::SelectionPolicy;

const CONFIG_DIR: &str = ".extension-explorer";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_INDEX_URL: &str = "https://plugins.jetbrains.com/api/extension-points";
pub const DEFAULT_USAGE_SEARCH_URL: &str = "https://plugins.jetbrains.com/api/search/graphql";
pub const DEFAULT_FAMILY: &str = "intellij";
pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://github.com/search";
pub const DEFAULT_PATH_GLOBS: &[&str] = &["*.java", "*.kt", "*.xml"];

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# extension-explorer configuration file
# Location: ~/.extension-explorer/config.toml

[registry]
# Endpoint returning the JSON array of extension points
index_url = "https://plugins.jetbrains.com/api/extension-points"
# Marketplace GraphQL search endpoint
usage_search_url = "https://plugins.jetbrains.com/api/search/graphql"
# Platform family filter applied to usage queries
family = "intellij"
# Results requested per usage query
page_size = 24
connect_timeout_secs = 10
request_timeout_secs = 10

[selection]
# Diversified selection caps: most downloaded, most recently updated,
# verified vendors, then fill by downloads up to max_results
popular = 3
recent = 3
verified = 3
max_results = 13

[links]
# Code search base URL and the source files a search is restricted to
search_base_url = "https://github.com/search"
path_globs = ["*.java", "*.kt", "*.xml"]
"#;

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub selection: SelectionPolicy,

    #[serde(default)]
    pub links: LinkConfig,
}

/// Remote endpoints and request limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub index_url: String,
    pub usage_search_url: String,
    pub family: String,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            usage_search_url: DEFAULT_USAGE_SEARCH_URL.to_string(),
            family: DEFAULT_FAMILY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RegistryConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Code search link settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub search_base_url: String,
    pub path_globs: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            path_globs: DEFAULT_PATH_GLOBS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Default config path (~/.extension-explorer/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ExplorerError::HomeNotFound)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|message| ExplorerError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Initialize config with default template (rich comments)
    pub fn init(path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !path.exists() {
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_matches_defaults() {
        let config = Config::from_toml_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[selection]\nmax_results = 5\n\n[registry]\nfamily = \"fleet\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.selection.max_results, 5);
        assert_eq!(config.selection.popular, 3);
        assert_eq!(config.registry.family, "fleet");
        assert_eq!(config.registry.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.links, LinkConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[selection\npopular = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ExplorerError::ConfigParse { .. }));
    }

    #[test]
    fn test_init_writes_template_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        Config::init(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.contains("max_results = 13"));

        fs::write(&path, "# edited\n").unwrap();
        Config::init(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited\n");
    }

    #[test]
    fn test_timeouts() {
        let registry = RegistryConfig::default();
        assert_eq!(registry.connect_timeout(), Duration::from_secs(10));
        assert_eq!(registry.request_timeout(), Duration::from_secs(10));
    }
}
