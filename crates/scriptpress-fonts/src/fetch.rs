// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font fetching over HTTPS.
//
// The fetcher only moves bytes from a URL to a file. Caching, timeouts and
// temp-file handling live in `cache`.

use std::future::Future;
use std::path::Path;

use scriptpress_core::error::{Result, ScriptpressError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Something that can stream a remote font file to disk.
pub trait FontFetcher: Send + Sync {
    /// Download `url` into `dest`, returning the number of bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64>> + Send;
}

/// Fetches fonts with a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpFontFetcher {
    client: reqwest::Client,
}

impl HttpFontFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scriptpress/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScriptpressError::FontAcquisition {
                profile: "http client".into(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl FontFetcher for HttpFontFetcher {
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let failed = |reason: String| ScriptpressError::FontAcquisition {
            profile: url.to_string(),
            reason,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failed(format!("GET failed: {e}")))?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| failed(format!("body stream interrupted: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, "font body streamed to disk");
        Ok(written)
    }
}
