use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::model::{PriceChange, ProductId, ProductRecord, Trend};

/// 价格下限，任何刷新后的价格都不会低于该值
pub const MIN_PRICE: f64 = 10.0;

/// 各走势的商品数量，固定三个分桶
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendCounts {
    pub up: usize,
    pub down: usize,
    pub stable: usize,
}

impl TrendCounts {
    pub const LABELS: [&'static str; 3] = ["Profitable", "Declining", "Stable"];

    pub fn buckets(&self) -> [usize; 3] {
        [self.up, self.down, self.stable]
    }

    pub fn total(&self) -> usize {
        self.up + self.down + self.stable
    }
}

/// 被追踪商品的有序集合
///
/// 新商品插入头部；批量刷新保持原有顺序。
#[derive(Debug, Default, Clone)]
pub struct ProductStore {
    records: Vec<ProductRecord>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: ProductRecord) {
        debug!(id = %record.id(), name = %record.name, "product added");
        self.records.insert(0, record);
    }

    /// 不存在的 ID 直接忽略
    pub fn remove(&mut self, id: ProductId) -> Option<ProductRecord> {
        let index = self.position(id)?;
        debug!(%id, "product removed");
        Some(self.records.remove(index))
    }

    pub fn find(&self, id: ProductId) -> Option<&ProductRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get(&self, id: ProductId) -> Result<&ProductRecord> {
        self.find(id).ok_or(TrackerError::NotFound(id))
    }

    /// 更新单个商品价格，失败时存储保持不变
    pub fn update_price(&mut self, id: ProductId, new_price: f64) -> Result<PriceChange> {
        if !new_price.is_finite() || new_price <= 0.0 {
            return Err(TrackerError::InvalidPrice(new_price));
        }

        let index = self.position(id).ok_or(TrackerError::NotFound(id))?;
        Ok(self.records[index].apply_price(new_price))
    }

    /// 按存储顺序逐个计算新价格并更新，结果不低于 [`MIN_PRICE`]
    pub fn bulk_refresh<F>(&mut self, mut price_fn: F) -> Vec<PriceChange>
    where
        F: FnMut(&ProductRecord) -> f64,
    {
        self.records
            .iter_mut()
            .map(|record| {
                let proposed = price_fn(record);
                let new_price = if proposed.is_finite() {
                    proposed.max(MIN_PRICE)
                } else {
                    MIN_PRICE
                };
                record.apply_price(new_price)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// 空集合返回 `None`；逐项累计均值，极大价格也不会溢出
    pub fn average_price(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let mean = self
            .records
            .iter()
            .enumerate()
            .fold(0.0, |mean, (i, r)| mean + (r.current_price() - mean) / (i + 1) as f64);
        Some(mean)
    }

    pub fn trend_counts(&self) -> TrendCounts {
        self.records
            .iter()
            .fold(TrendCounts::default(), |mut counts, record| {
                match record.trend() {
                    Trend::Up => counts.up += 1,
                    Trend::Down => counts.down += 1,
                    Trend::Stable => counts.stable += 1,
                }
                counts
            })
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}
