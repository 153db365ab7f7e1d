use axum::{
    routing::post,
    Router,
    Json,
    extract::State,
};
use serde::Deserialize;
use std::sync::Arc;
use tracker_core::insights::MarketAnalysis;

use crate::domain::services::catalog_service::CatalogService;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub products: Vec<AnalyzeProduct>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeProduct {
    #[serde(default)]
    pub name: String,
}

/// 返回固定的市场点评，并非真实分析
async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<AnalyzeRequest>>,
) -> Json<MarketAnalysis> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let names: Vec<String> = payload.products.into_iter().map(|p| p.name).collect();

    let catalog_service = CatalogService::new(state.clone());

    Json(catalog_service.analyze(&names))
}
