//! Fetching of remote pages and data dumps.
//!
//! Every component fetches through [`Transport`]; a failed fetch is returned
//! unchanged and ends the run. Retrying belongs to the transport implementation.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Source of raw page and feed text
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the body at `url` as text
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP transport backed by reqwest.
///
/// The legislature publishes its dumps over FTP; `ftp://` URLs are served from
/// an HTTP mirror of the same tree when one is configured.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    ftp_mirror: Option<String>,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64, ftp_mirror: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("ct-bills/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Fetch {
                url: String::new(),
                source,
            })?;
        Ok(Self { client, ftp_mirror })
    }

    /// Map a URL onto something reqwest can fetch
    fn resolve(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        match parsed.scheme() {
            "http" | "https" => Ok(url.to_string()),
            "ftp" => match &self.ftp_mirror {
                Some(mirror) => Ok(format!(
                    "{}/{}",
                    mirror.trim_end_matches('/'),
                    parsed.path().trim_start_matches('/')
                )),
                None => Err(Error::UnsupportedScheme(url.to_string())),
            },
            _ => Err(Error::UnsupportedScheme(url.to_string())),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        let target = self.resolve(url)?;
        tracing::debug!(url = %target, "fetching");

        let fetch_err = |source| Error::Fetch {
            url: target.clone(),
            source,
        };
        let response = self
            .client
            .get(&target)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let bytes = response.bytes().await.map_err(fetch_err)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// In-memory transport serving fixed bodies, for replaying captured pages
#[derive(Debug, Default)]
pub struct StaticTransport {
    pages: HashMap<String, String>,
    default_body: Option<String>,
    log: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Serve `body` for any URL without a registered page
    pub fn with_default(mut self, body: impl Into<String>) -> Self {
        self.default_body = Some(body.into());
        self
    }

    /// URLs fetched so far, in request order
    pub fn fetched(&self) -> Vec<String> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        if let Ok(mut log) = self.log.lock() {
            log.push(url.to_string());
        }
        self.pages
            .get(url)
            .or(self.default_body.as_ref())
            .cloned()
            .ok_or_else(|| Error::NotFound(url.to_string()))
    }
}
