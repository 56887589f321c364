// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where documents come from: the site's web server, or a local checkout of
// the same static files.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use kliros_core::error::{KlirosError, Result};
use kliros_core::types::DocumentKind;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

const TIMEOUT_SECS: u64 = 15;

/// Anything that can hand back the raw text of a document.
///
/// Every failure, whether network, HTTP status or missing file, is a
/// `KlirosError::Transport`.
pub trait DocumentSource {
    fn fetch(&self, kind: DocumentKind) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP GET against the site root.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// `base` is the site root, e.g. `https://example.org/` or
    /// `https://example.org/parish`. A trailing slash is added if missing so
    /// resource names resolve beneath it.
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base).map_err(|e| KlirosError::transport(base, e))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| KlirosError::transport(base.as_str(), e))?;

        Ok(Self { client, base })
    }

    pub fn url_for(&self, kind: DocumentKind) -> Result<Url> {
        self.base
            .join(kind.resource())
            .map_err(|e| KlirosError::transport(kind.resource(), e))
    }
}

impl DocumentSource for HttpSource {
    #[instrument(skip(self), fields(base = %self.base))]
    async fn fetch(&self, kind: DocumentKind) -> Result<String> {
        let url = self.url_for(kind)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| KlirosError::transport(kind.resource(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KlirosError::transport(
                kind.resource(),
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| KlirosError::transport(kind.resource(), e))
    }
}

/// Reads documents from a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for DirSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, kind: DocumentKind) -> Result<String> {
        let path = self.root.join(kind.resource());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| KlirosError::transport(kind.resource(), e))
    }
}

/// A source picked at runtime from a `--source` argument.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    Dir(DirSource),
}

impl AnySource {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is treated as a directory.
    pub fn parse(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Http(HttpSource::new(location)?))
        } else {
            Ok(Self::Dir(DirSource::new(location)))
        }
    }
}

impl DocumentSource for AnySource {
    async fn fetch(&self, kind: DocumentKind) -> Result<String> {
        match self {
            Self::Http(http) => http.fetch(kind).await,
            Self::Dir(dir) => dir.fetch(kind).await,
        }
    }
}
