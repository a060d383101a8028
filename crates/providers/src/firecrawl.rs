//! Firecrawl page scraping.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "firecrawl";

/// A scraped page as markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
}

#[derive(Debug, Deserialize)]
struct ScrapeMetadata {
    title: Option<String>,
}

pub struct FirecrawlClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FirecrawlClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_key: endpoint.api_key.clone(),
        }
    }

    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let response = self
            .http
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(key)
            .json(&json!({ "url": url, "formats": ["markdown"] }))
            .send()
            .await?;
        let body: ScrapeResponse = parse_response(PROVIDER, response).await?;

        match body.data {
            Some(data) if body.success => Ok(ScrapedPage {
                url: url.to_string(),
                title: data.metadata.and_then(|m| m.title),
                markdown: data.markdown,
            }),
            _ => Err(ProviderError::unexpected(
                PROVIDER,
                body.error.unwrap_or_else(|| "scrape failed".to_string()),
            )),
        }
    }
}
