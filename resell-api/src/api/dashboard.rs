use axum::{
    routing::{get, post},
    Router,
    Json,
    extract::{State, Path},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;
use std::sync::Arc;
use tracker_core::{Candidate, DashboardView, PriceChange, ProductDetails, ProductId, ProductRecord};

use crate::domain::services::dashboard_service::{DashboardService, DashboardUpdate};
use crate::error::AppError;
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(current_view))
        .route("/track", post(track_product))
        .route("/search", post(search_products))
        .route("/refresh", post(refresh_all))
        .route("/export", get(export_data))
        .route("/insight", get(insight))
        .route("/products", post(add_search_result))
        .route("/products/{id}", get(product_details).delete(remove_product))
        .route("/products/{id}/refresh", post(refresh_price))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TrackRequest {
    #[validate(length(min = 1, message = "Please enter a product URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "Please enter a product name"))]
    pub query: String,
}

fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    raw.parse().map_err(|_| AppError::product_not_found())
}

async fn current_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(DashboardService::new(state).view().await)
}

async fn track_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackRequest>,
) -> Result<Json<DashboardUpdate<ProductRecord>>, AppError> {
    payload.validate()?;

    let update = DashboardService::new(state).track(&payload.url).await?;

    Ok(Json(update))
}

async fn search_products(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    payload.validate()?;

    let candidates = DashboardService::new(state).search(&payload.query).await?;

    Ok(Json(candidates))
}

async fn add_search_result(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<Candidate>,
) -> Result<Json<DashboardUpdate<ProductRecord>>, AppError> {
    let update = DashboardService::new(state).add(candidate).await?;

    Ok(Json(update))
}

async fn product_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetails>, AppError> {
    let id = parse_id(&id)?;

    Ok(Json(DashboardService::new(state).details(id).await?))
}

/// 不存在的 ID 也返回成功
async fn remove_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<DashboardUpdate<Option<ProductRecord>>> {
    let service = DashboardService::new(state);
    let update = match id.parse::<ProductId>() {
        Ok(id) => service.remove(id).await,
        Err(_) => service.remove_unmatched().await,
    };

    Json(update)
}

async fn refresh_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DashboardUpdate<PriceChange>>, AppError> {
    let id = parse_id(&id)?;

    Ok(Json(DashboardService::new(state).refresh_price(id).await?))
}

async fn refresh_all(State(state): State<Arc<AppState>>) -> Json<DashboardUpdate<Vec<PriceChange>>> {
    Json(DashboardService::new(state).refresh_all().await)
}

async fn export_data(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let applied = DashboardService::new(state).export().await?;
    let file = applied.result;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    ))
}

async fn insight(State(state): State<Arc<AppState>>) -> Json<Value> {
    let tip = DashboardService::new(state).insight().await;

    Json(json!({ "insight": tip }))
}
