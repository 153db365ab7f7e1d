//! 商品查询能力
//!
//! 核心逻辑只依赖 [`LookupProvider`]，真实的平台抓取客户端可以直接替换
//! [`SyntheticLookup`]，不需要改动存储和视图。

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, TrackerError};
use crate::model::{ProductId, ProductRecord};

pub const UNKNOWN_PLATFORM: &str = "Unknown";

/// 搜索结果固定来自的三个平台
pub const SEARCH_PLATFORMS: [&str; 3] = ["eBay", "StockX", "GOAT"];

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/50";

/// 从 URL 中解析平台名：取主机名，去掉 `www.` 前缀后的第一段
pub fn platform_from_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).map_err(|_| TrackerError::InvalidUrl(raw.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| TrackerError::InvalidUrl(raw.to_string()))?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    match host.split('.').next() {
        Some(label) if !label.is_empty() => Ok(label.to_string()),
        _ => Err(TrackerError::InvalidUrl(raw.to_string())),
    }
}

/// 无法解析时退化为 `"Unknown"`
pub fn platform_label(raw: &str) -> String {
    platform_from_url(raw).unwrap_or_else(|_| UNKNOWN_PLATFORM.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LookupQuery {
    Url(String),
    Text(String),
}

impl LookupQuery {
    pub fn as_str(&self) -> &str {
        match self {
            LookupQuery::Url(s) | LookupQuery::Text(s) => s,
        }
    }
}

/// 查询得到的候选商品，用户确认后才会加入存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub image: String,
    pub price: f64,
    pub previous_price: f64,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_availability")]
    pub availability: String,
}

fn default_availability() -> String {
    "In Stock".to_string()
}

impl Candidate {
    pub fn into_record(self, id: ProductId) -> ProductRecord {
        let record = ProductRecord::new(
            id,
            &self.name,
            &self.platform,
            &self.image,
            self.price,
            self.previous_price,
        );
        match &self.url {
            Some(url) => record.with_url(url),
            None => record,
        }
    }
}

#[async_trait]
pub trait LookupProvider: Send + Sync {
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<Candidate>>;
}

/// 随机生成候选商品的查询实现，不访问任何外部服务
pub struct SyntheticLookup {
    rng: Mutex<StdRng>,
}

impl SyntheticLookup {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn random_price(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f64::from(rng.random_range(100..600u32))
    }

    fn by_url(&self, url: &str) -> Candidate {
        let platform = platform_label(url);
        Candidate {
            name: format!("Product from {platform}"),
            image: PLACEHOLDER_IMAGE.to_string(),
            price: self.random_price(),
            previous_price: self.random_price(),
            platform,
            url: Some(url.to_string()),
            availability: default_availability(),
        }
    }

    fn by_text(&self, query: &str) -> Vec<Candidate> {
        SEARCH_PLATFORMS
            .iter()
            .enumerate()
            .map(|(i, platform)| {
                let price = self.random_price();
                Candidate {
                    name: format!("{query} - Option {}", i + 1),
                    image: PLACEHOLDER_IMAGE.to_string(),
                    price,
                    previous_price: (price * 0.9 * 100.0).round() / 100.0,
                    platform: platform.to_string(),
                    url: None,
                    availability: default_availability(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl LookupProvider for SyntheticLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<Candidate>> {
        let text = query.as_str().trim();
        if text.is_empty() {
            return Err(TrackerError::EmptyQuery);
        }

        let candidates = match query {
            LookupQuery::Url(_) => vec![self.by_url(text)],
            LookupQuery::Text(_) => self.by_text(text),
        };
        debug!(count = candidates.len(), "synthetic lookup finished");

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trend;

    #[test]
    fn platform_is_first_host_label() {
        assert_eq!(platform_from_url("https://www.ebay.com/itm/123").unwrap(), "ebay");
        assert_eq!(platform_from_url("https://stockx.com/nike-dunk").unwrap(), "stockx");
        assert_eq!(platform_from_url("http://shop.goat.com").unwrap(), "shop");
    }

    #[test]
    fn malformed_url_degrades_to_unknown() {
        assert!(matches!(platform_from_url("not a url"), Err(TrackerError::InvalidUrl(_))));
        assert_eq!(platform_label("not a url"), "Unknown");
        assert_eq!(platform_label("mailto:someone@example.com"), "Unknown");
    }

    #[tokio::test]
    async fn url_lookup_yields_one_candidate() {
        let lookup = SyntheticLookup::new(Some(1));
        let query = LookupQuery::Url("https://www.grailed.com/listings/1".to_string());

        let candidates = lookup.lookup(&query).await.unwrap();
        assert_eq!(candidates.len(), 1);

        let candidate = &candidates[0];
        assert_eq!(candidate.name, "Product from grailed");
        assert_eq!(candidate.platform, "grailed");
        assert!((100.0..600.0).contains(&candidate.price));
        assert!((100.0..600.0).contains(&candidate.previous_price));
    }

    #[tokio::test]
    async fn text_lookup_yields_three_platforms() {
        let lookup = SyntheticLookup::new(Some(2));
        let query = LookupQuery::Text("Jordan 1".to_string());

        let candidates = lookup.lookup(&query).await.unwrap();
        let platforms: Vec<&str> = candidates.iter().map(|c| c.platform.as_str()).collect();
        assert_eq!(platforms, SEARCH_PLATFORMS.to_vec());
        assert_eq!(candidates[2].name, "Jordan 1 - Option 3");

        let record = candidates[0].clone().into_record(ProductId(10));
        assert_eq!(record.trend(), Trend::Up);
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let lookup = SyntheticLookup::new(Some(3));
        let err = lookup.lookup(&LookupQuery::Text("   ".to_string())).await.unwrap_err();
        assert!(matches!(err, TrackerError::EmptyQuery));
    }

    #[tokio::test]
    async fn seeded_lookups_repeat() {
        let query = LookupQuery::Text("ps5".to_string());
        let a = SyntheticLookup::new(Some(42)).lookup(&query).await.unwrap();
        let b = SyntheticLookup::new(Some(42)).lookup(&query).await.unwrap();
        assert_eq!(a, b);
    }
}
