use anyhow::{Context, Result};
use reqwest::blocking::Client;

use super::DocumentSource;

const USER_AGENT: &str = concat!("slackmap/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP GET document source. No request timeout is applied.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("build HTTP client")?;
        Ok(Self { client })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned error status"))?;

        let bytes = resp.bytes().with_context(|| format!("read body of {url}"))?;
        Ok(bytes.to_vec())
    }
}
