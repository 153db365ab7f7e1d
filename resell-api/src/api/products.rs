use axum::{
    routing::get,
    Router,
    Json,
    extract::{State, Path},
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;
use std::sync::Arc;
use tracker_core::ProductRecord;

use crate::domain::services::catalog_service::CatalogService;
use crate::error::AppError;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).delete(delete_product))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Url cannot be empty"))]
    pub url: String,
    pub name: Option<String>,
}

async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ProductRecord>> {
    let catalog_service = CatalogService::new(state.clone());

    Json(catalog_service.list_products().await)
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductRecord>, AppError> {
    let catalog_service = CatalogService::new(state.clone());

    let product = catalog_service.get_product(&id).await?;

    Ok(Json(product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ProductRecord>, AppError> {
    // 验证请求
    payload.validate()?;

    let catalog_service = CatalogService::new(state.clone());

    let product = catalog_service
        .create_product(&payload.url, payload.name.as_deref())
        .await?;

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    let catalog_service = CatalogService::new(state.clone());

    catalog_service.delete_product(&id).await;

    Json(json!({ "message": "Product deleted" }))
}
