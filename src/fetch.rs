//! Fragment fetching over HTTP or from a local site directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::utils::normalize_page_path;

/// User agent sent with every fragment request.
pub const USER_AGENT: &str = concat!("pageshell/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a fragment.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Invalid page URL {page}: {source}")]
    InvalidUrl {
        page: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Page path escapes the site root: {0}")]
    OutsideRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of raw fragment HTML.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page at the relative path `page` as text.
    async fn fetch_text(&self, page: &str) -> Result<String, FetchError>;
}

/// Fetches fragments relative to a base URL.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, page: &str) -> Result<Url, FetchError> {
        self.base.join(page).map_err(|source| FetchError::InvalidUrl {
            page: page.to_string(),
            source,
        })
    }
}

/// `Url::join` replaces the last segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, page: &str) -> Result<String, FetchError> {
        let url = self.resolve(page)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads fragments from a site directory on disk.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, page: &str) -> Result<PathBuf, FetchError> {
        normalize_page_path(page)
            .map(|relative| self.root.join(relative))
            .ok_or_else(|| FetchError::OutsideRoot(page.to_string()))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch_text(&self, page: &str) -> Result<String, FetchError> {
        let path = self.resolve(page)?;
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// Pick a fetcher for a configured site: http(s) URLs go over the network,
/// anything else is a directory.
pub fn fetcher_for_site(site: &str, timeout: Duration) -> Result<Box<dyn Fetcher>, FetchError> {
    match Url::parse(site) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpFetcher::new(url, timeout)?))
        }
        _ => Ok(Box::new(FileFetcher::new(site))),
    }
}
