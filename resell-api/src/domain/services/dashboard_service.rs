use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use tracker_core::export::ExportFile;
use tracker_core::{
    Applied, Candidate, DashboardView, LookupQuery, Notice, PriceChange, ProductDetails, ProductId, ProductRecord,
};

use crate::error::AppError;
use crate::server::AppState;

/// 修改操作的返回：结果、提示以及修改后重新渲染的完整视图
#[derive(Debug, Serialize)]
pub struct DashboardUpdate<T> {
    pub result: T,
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Notice>,
    pub view: DashboardView,
}

impl<T> DashboardUpdate<T> {
    fn new(applied: Applied<T>, view: &DashboardView) -> Self {
        Self {
            result: applied.result,
            notice: applied.notice,
            progress: applied.progress,
            view: view.clone(),
        }
    }
}

pub struct DashboardService {
    state: Arc<AppState>,
}

impl DashboardService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn view(&self) -> DashboardView {
        self.state.dashboard.lock().await.view().clone()
    }

    pub async fn track(&self, url: &str) -> Result<DashboardUpdate<ProductRecord>, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("Please enter a product URL".to_string()));
        }

        self.simulate(self.state.config.simulation.track_delay()).await;
        let candidate = self
            .state
            .lookup
            .lookup(&LookupQuery::Url(url.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ThirdParty(format!("No product found for {}", url)))?;

        let mut update = self.add(candidate).await?;
        update.progress = Some(Notice::info("Tracking product..."));
        Ok(update)
    }

    /// 搜索结果不会写入存储
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Please enter a product name".to_string()));
        }

        self.simulate(self.state.config.simulation.search_delay()).await;
        let candidates = self
            .state
            .lookup
            .lookup(&LookupQuery::Text(query.to_string()))
            .await?;
        debug!(query, count = candidates.len(), "search finished");

        Ok(candidates)
    }

    pub async fn add(&self, candidate: Candidate) -> Result<DashboardUpdate<ProductRecord>, AppError> {
        let mut dashboard = self.state.dashboard.lock().await;
        let applied = dashboard.add_candidate(candidate)?;
        Ok(DashboardUpdate::new(applied, dashboard.view()))
    }

    pub async fn remove(&self, id: ProductId) -> DashboardUpdate<Option<ProductRecord>> {
        let mut dashboard = self.state.dashboard.lock().await;
        let applied = dashboard.remove(id);
        DashboardUpdate::new(applied, dashboard.view())
    }

    /// 路径中的 ID 无法解析时调用：不移除任何商品，只重新渲染
    pub async fn remove_unmatched(&self) -> DashboardUpdate<Option<ProductRecord>> {
        let mut dashboard = self.state.dashboard.lock().await;
        let applied = dashboard.remove_unmatched();
        DashboardUpdate::new(applied, dashboard.view())
    }

    pub async fn details(&self, id: ProductId) -> Result<ProductDetails, AppError> {
        Ok(self.state.dashboard.lock().await.details(id)?)
    }

    pub async fn refresh_price(&self, id: ProductId) -> Result<DashboardUpdate<PriceChange>, AppError> {
        // 先确认存在再等待，等待期间不持有锁
        self.details(id).await?;
        self.simulate(self.state.config.simulation.refresh_delay()).await;

        let mut dashboard = self.state.dashboard.lock().await;
        let applied = dashboard.refresh_price(id)?;
        Ok(DashboardUpdate::new(applied, dashboard.view()))
    }

    pub async fn refresh_all(&self) -> DashboardUpdate<Vec<PriceChange>> {
        let count = self.state.dashboard.lock().await.store().len();
        self.simulate(self.state.config.simulation.bulk_delay(count)).await;

        let mut dashboard = self.state.dashboard.lock().await;
        let applied = dashboard.refresh_all();
        info!(count = applied.result.len(), "dashboard prices refreshed");
        DashboardUpdate::new(applied, dashboard.view())
    }

    pub async fn export(&self) -> Result<Applied<ExportFile>, AppError> {
        Ok(self.state.dashboard.lock().await.export()?)
    }

    pub async fn insight(&self) -> &'static str {
        self.state.dashboard.lock().await.insight()
    }

    async fn simulate(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
