//! The single outbound request per proxied page: scheme validation, the
//! mobile-subdomain rewrite for wiki hosts, and content-type classification
//! into a transformable page, a proxied download, or a rejection.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::ProxyConfig;

/// Non-HTML responses larger than this are refused rather than proxied.
pub const DOWNLOAD_CEILING_BYTES: u64 = 8_000_000;

const FALLBACK_FILENAME: &str = "download";

/// What came back from the outbound request.
#[derive(Debug)]
pub enum Fetched {
    /// An HTML or plain-text page, ready for the transformation pipeline.
    /// `final_url` is the post-redirect location, used as the link base.
    Page { body: String, final_url: Url },
    /// Raw bytes passed through as an attachment.
    Download {
        content_type: String,
        filename: String,
        bytes: Vec<u8>,
    },
    /// A download whose declared size exceeds [`DOWNLOAD_CEILING_BYTES`].
    TooLarge { size: u64 },
}

pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .build()
            .context("failed to build outbound HTTP client")?;
        Ok(Self {
            client,
            user_agent: config.user_agent(),
        })
    }

    /// Fetch `url` and classify the response. The URL must already have
    /// passed [`parse_article_url`].
    pub async fn fetch(&self, url: &Url) -> Result<Fetched> {
        let fetch_url = rewrite_to_mobile(url);
        if fetch_url != *url {
            debug!(%fetch_url, "rewrote wiki host to mobile subdomain");
        }

        let response = self
            .client
            .get(fetch_url)
            .header("User-Agent", self.user_agent.clone())
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let final_url = response.url().clone();

        if is_page_content_type(&content_type) {
            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read body of {url}"))?;
            return Ok(Fetched::Page { body, final_url });
        }

        let declared_size = response
            .headers()
            .get("content-length")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0);
        if declared_size > DOWNLOAD_CEILING_BYTES {
            return Ok(Fetched::TooLarge {
                size: declared_size,
            });
        }

        let filename = filename_from_url(&final_url);
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {url}"))?
            .to_vec();
        Ok(Fetched::Download {
            content_type,
            filename,
            bytes,
        })
    }
}

/// Validate a user-supplied article URL. Only http and https reach the
/// fetcher; anything else is rejected before any network activity.
pub fn parse_article_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("not a valid URL: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("refusing non-HTTP scheme: {}", url.scheme());
    }
    Ok(url)
}

/// Rewrite `<lang>.wikipedia.org` to `<lang>.m.wikipedia.org`; the mobile
/// skin serves far simpler markup. URLs already on the mobile subdomain and
/// non-wiki URLs come back unchanged.
pub fn rewrite_to_mobile(url: &Url) -> Url {
    let Some(host) = url.host_str() else {
        return url.clone();
    };
    let Some(prefix) = host.strip_suffix(".wikipedia.org") else {
        return url.clone();
    };
    if prefix.is_empty() || host.contains(".m.") {
        return url.clone();
    }
    let mut rewritten = url.clone();
    if rewritten
        .set_host(Some(&format!("{prefix}.m.wikipedia.org")))
        .is_ok()
    {
        rewritten
    } else {
        url.clone()
    }
}

fn is_page_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("text/plain")
}

fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.trim().is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
