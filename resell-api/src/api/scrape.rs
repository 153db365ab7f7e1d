use axum::{
    routing::post,
    Router,
    Json,
    extract::State,
};
use serde::Deserialize;
use validator::Validate;
use std::sync::Arc;

use crate::domain::services::catalog_service::{CatalogService, ScrapeResult};
use crate::error::AppError;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/scrape", post(scrape))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScrapeRequest {
    #[validate(length(min = 1, message = "Url cannot be empty"))]
    pub url: String,
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResult>, AppError> {
    payload.validate()?;

    let catalog_service = CatalogService::new(state.clone());

    Ok(Json(catalog_service.scrape(&payload.url).await?))
}
