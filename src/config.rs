//! Configuration management for pageshell using the prefer crate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::history::DEFAULT_CAPACITY;
use crate::transition::TransitionConfig;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Where "back" goes from a standalone page when the browser has no history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackFallback {
    /// Substring matched against the current page's file name.
    pub contains: String,
    /// Location to redirect to.
    pub target: String,
}

impl BackFallback {
    pub fn new(contains: &str, target: &str) -> Self {
        Self {
            contains: contains.to_string(),
            target: target.to_string(),
        }
    }
}

fn default_site() -> String {
    ".".to_string()
}

fn default_container_id() -> String {
    "main-content".to_string()
}

fn default_landing_page() -> String {
    "index.html".to_string()
}

fn default_pages_dir() -> String {
    "pages/".to_string()
}

fn default_pages_landing() -> String {
    "../index.html".to_string()
}

fn default_record_prefix() -> String {
    "sport_".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Element ids on the composing page bound to the pages they open.
pub fn default_nav() -> BTreeMap<String, String> {
    [
        ("site-title", "pages/about.html"),
        ("nav-code", "pages/code.html"),
        ("nav-sport", "pages/sport.html"),
        ("nav-art", "pages/art.html"),
        ("nav-reading", "pages/books.html"),
        ("nav-writing", "pages/writing.html"),
    ]
    .into_iter()
    .map(|(id, page)| (id.to_string(), page.to_string()))
    .collect()
}

/// Per-section list pages for standalone detail pages, checked in order.
pub fn default_back_fallbacks() -> Vec<BackFallback> {
    vec![
        BackFallback::new("sport", "sport.html"),
        BackFallback::new("book", "books.html"),
        BackFallback::new("code", "code.html"),
        BackFallback::new("writing", "writing.html"),
        BackFallback::new("art", "art.html"),
    ]
}

/// Application configuration, loaded from `pageshell.{toml,yaml,json}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site root: a directory or an http(s) base URL.
    #[serde(default = "default_site")]
    pub site: String,
    /// Id of the navigation container on the composing page.
    #[serde(default = "default_container_id")]
    pub container_id: String,
    /// Where "back" lands when nothing else applies.
    #[serde(default = "default_landing_page")]
    pub landing_page: String,
    /// Path segment that marks standalone detail pages.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,
    /// Landing location for detail pages that match no fallback.
    #[serde(default = "default_pages_landing")]
    pub pages_landing: String,
    /// Key prefix for record lists in the key-value store.
    #[serde(default = "default_record_prefix")]
    pub record_prefix: String,
    /// Key-value store file. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub transition: TransitionConfig,
    /// Element id -> page.
    #[serde(default = "default_nav")]
    pub nav: BTreeMap<String, String>,
    #[serde(default = "default_back_fallbacks")]
    pub back_fallbacks: Vec<BackFallback>,
    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: default_site(),
            container_id: default_container_id(),
            landing_page: default_landing_page(),
            pages_dir: default_pages_dir(),
            pages_landing: default_pages_landing(),
            record_prefix: default_record_prefix(),
            store_path: None,
            timeout_secs: default_timeout_secs(),
            history_capacity: default_history_capacity(),
            transition: TransitionConfig::default(),
            nav: default_nav(),
            back_fallbacks: default_back_fallbacks(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration. An explicit path wins; otherwise prefer discovers
    /// a `pageshell` config in the standard locations. Falls back to defaults
    /// when nothing is found.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_path(path).await?,
            None => match prefer::load("pageshell").await {
                Ok(pref_config) => match pref_config.source_path() {
                    Some(path) => Self::load_from_path(path).await?,
                    None => Self::default(),
                },
                Err(e) => {
                    debug!("No config file discovered: {}", e);
                    Self::default()
                }
            },
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, or JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        config.resolve_relative_paths();
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }

    /// Apply `PAGESHELL_SITE` and `PAGESHELL_STORE`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(site) = std::env::var("PAGESHELL_SITE") {
            self.site = site;
        }
        if let Ok(store) = std::env::var("PAGESHELL_STORE") {
            self.store_path = Some(PathBuf::from(shellexpand::tilde(&store).as_ref()));
        }
        self
    }

    /// Directory of the config file, if loaded from one.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Paths starting with ~ are expanded
    /// - Absolute paths are returned as-is
    /// - Relative paths are joined onto `base_dir`
    pub fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    fn resolve_relative_paths(&mut self) {
        let Some(base_dir) = self.base_dir() else {
            return;
        };
        if !is_remote(&self.site) {
            self.site = Self::resolve_path(&self.site, &base_dir)
                .to_string_lossy()
                .into_owned();
        }
        if let Some(store) = self.store_path.take() {
            self.store_path = Some(Self::resolve_path(&store.to_string_lossy(), &base_dir));
        }
    }

    /// Store file to use: configured path or `<data dir>/pageshell/storage.json`.
    pub fn store_file(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => path.clone(),
            None => match dirs::data_dir() {
                Some(dir) => dir.join("pageshell").join("storage.json"),
                None => {
                    warn!("No user data directory; keeping storage.json in the working directory");
                    PathBuf::from("storage.json")
                }
            },
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Whether `site` names an http(s) location rather than a directory.
pub fn is_remote(site: &str) -> bool {
    site.starts_with("http://") || site.starts_with("https://")
}
