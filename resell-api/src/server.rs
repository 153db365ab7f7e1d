use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracker_core::{Dashboard, LookupProvider, SyntheticLookup};

use crate::api::{analyze, dashboard, products, scrape};
use crate::config::Config;
use crate::domain::models::catalog::ProductCatalog;
use crate::error::AppError;

pub struct AppState {
    pub config: Config,
    /// 后端商品表
    pub catalog: RwLock<ProductCatalog>,
    /// 仪表盘会话，同一时间只有一个请求在修改
    pub dashboard: Mutex<Dashboard>,
    pub lookup: Arc<dyn LookupProvider>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let lookup = Arc::new(SyntheticLookup::new(config.simulation.seed));
        Self::with_lookup(config, lookup)
    }

    /// 替换商品查询实现
    pub fn with_lookup(config: Config, lookup: Arc<dyn LookupProvider>) -> Self {
        let mut dashboard = Dashboard::new(config.pricing, config.simulation.seed);
        dashboard.load_seed();

        Self {
            catalog: RwLock::new(ProductCatalog::seeded()),
            dashboard: Mutex::new(dashboard),
            lookup,
            config,
        }
    }
}

pub async fn create_app(state: AppState) -> Result<Router, AppError> {
    let app_state = Arc::new(state);

    // 健康检查路由
    let health_route = Router::new()
        .route("/health", get(|| async { "OK" }));

    // API 路由
    let api_routes = Router::new()
        .nest("/products", products::routes())
        .nest("/dashboard", dashboard::routes())
        .merge(analyze::routes())
        .merge(scrape::routes());

    // 其他路径一律返回单页应用
    let static_files = &app_state.config.static_files;
    let spa = ServeDir::new(&static_files.dir)
        .fallback(ServeFile::new(&static_files.index));

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(health_route)
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    Ok(app)
}
