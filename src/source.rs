use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::types::{ContentItem, PricingOption};

/// Image reference substituted when an entry arrives without one.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder-image.svg";

const DEFAULT_CREATOR: &str = "Unknown Creator";
const DEFAULT_TITLE: &str = "Untitled";

/// Failure modes of a page fetch. All of them are retryable: the store
/// records the message and leaves the pagination cursor untouched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
}

/// A paginated provider of catalog entries. `page` is 1-based.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<ContentItem>, FetchError>;
}

/// Wire shape of one remote entry. Every field may be absent; mapping
/// defaults each one rather than failing the page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pricing_option: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Map one raw entry into a `ContentItem`, defaulting anything missing.
/// Pricing codes outside the known set fall back to `Free`.
pub fn map_raw_item(raw: RawItem) -> ContentItem {
    let pricing_option = raw
        .pricing_option
        .and_then(|c| u8::try_from(c).ok())
        .and_then(PricingOption::from_code)
        .unwrap_or(PricingOption::Free);
    ContentItem {
        id: raw
            .id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        path: raw
            .image_path
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        creator: raw
            .creator
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CREATOR.to_string()),
        title: raw
            .title
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        pricing_option,
        price: raw.price.unwrap_or(0.0).max(0.0),
    }
}

/// Map a fetched page, prefixing each id with the page number so ids stay
/// unique across pages even when the remote repeats them.
pub fn map_page(page: u32, raw: Vec<RawItem>) -> Vec<ContentItem> {
    raw.into_iter()
        .map(|r| {
            let mut item = map_raw_item(r);
            item.id = format!("{}:{}", page, item.id);
            item
        })
        .collect()
}

/// Production source: the remote catalog API over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    fn page_url(&self, page: u32, limit: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<ContentItem>, FetchError> {
        let url = self.page_url(page, limit);
        tracing::debug!(%url, "fetching catalog page");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let raw: Vec<RawItem> = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(map_page(page, raw))
    }
}
