use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use tracker_core::insights::{market_analysis, MarketAnalysis};
use tracker_core::{Candidate, LookupQuery, ProductId, ProductRecord};

use crate::error::AppError;
use crate::server::AppState;

const CATALOG_IMAGE: &str = "https://via.placeholder.com/150";

/// 抓取接口的返回
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub name: String,
    pub price: f64,
    pub platform: String,
    pub image: String,
    pub availability: String,
    pub last_updated: DateTime<Utc>,
}

pub struct CatalogService {
    state: Arc<AppState>,
}

impl CatalogService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_products(&self) -> Vec<ProductRecord> {
        self.state.catalog.read().await.list()
    }

    /// 无法解析的 ID 同样视为不存在
    pub async fn get_product(&self, id: &str) -> Result<ProductRecord, AppError> {
        let id: ProductId = id.parse().map_err(|_| AppError::product_not_found())?;

        self.state
            .catalog
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(AppError::product_not_found)
    }

    pub async fn create_product(&self, url: &str, name: Option<&str>) -> Result<ProductRecord, AppError> {
        let candidate = self.lookup_url(url).await?;

        let mut catalog = self.state.catalog.write().await;
        let id = catalog.next_id();
        let mut product = candidate
            .into_record(id)
            .with_url(url)
            .with_created_at(Utc::now());
        product.image = CATALOG_IMAGE.to_string();
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            product.name = name.to_string();
        }

        catalog.insert(product.clone());
        info!(id = %product.id(), platform = %product.platform, "product created");

        Ok(product)
    }

    /// 无论是否存在都视为成功
    pub async fn delete_product(&self, id: &str) {
        let Ok(id) = id.parse::<ProductId>() else {
            return;
        };
        if self.state.catalog.write().await.remove(id).is_some() {
            info!(%id, "product deleted");
        }
    }

    pub async fn scrape(&self, url: &str) -> Result<ScrapeResult, AppError> {
        let candidate = self.lookup_url(url).await?;

        Ok(ScrapeResult {
            name: candidate.name,
            price: candidate.price,
            platform: candidate.platform,
            image: CATALOG_IMAGE.to_string(),
            availability: candidate.availability,
            last_updated: Utc::now(),
        })
    }

    pub fn analyze(&self, product_names: &[String]) -> MarketAnalysis {
        market_analysis(product_names, Utc::now())
    }

    async fn lookup_url(&self, url: &str) -> Result<Candidate, AppError> {
        let query = LookupQuery::Url(url.trim().to_string());
        self.state
            .lookup
            .lookup(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ThirdParty(format!("No product found for {}", url)))
    }
}
