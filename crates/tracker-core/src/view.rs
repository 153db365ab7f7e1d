//! 视图同步
//!
//! 每次存储变更后都从当前状态完整重算表格、分布图和历史图，不做增量更新。

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::model::{ProductId, ProductRecord, Trend};
use crate::store::{ProductStore, TrendCounts};

/// 历史图的点数（含今天）
pub const HISTORY_DAYS: usize = 7;

/// 历史图随机噪声的总幅度（±25）
const HISTORY_NOISE: f64 = 50.0;

/// 涨跌幅百分比，保留两位小数；上一次价格为 0 或结果溢出时返回 0
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return 0.0;
    }
    let change = ((current - previous) / previous * 100.0 * 100.0).round() / 100.0;
    if change.is_finite() { change } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: ProductId,
    pub image: String,
    pub name: String,
    pub platform: String,
    pub price_label: String,
    pub change_percent: f64,
    pub change_label: String,
    pub direction: Trend,
    pub trend: Trend,
    pub badge: &'static str,
}

impl TableRow {
    pub fn from_record(record: &ProductRecord) -> Self {
        let change = percent_change(record.previous_price(), record.current_price());
        Self {
            id: record.id(),
            image: record.image.clone(),
            name: record.name.clone(),
            platform: record.platform.clone(),
            price_label: format_price(record.current_price()),
            change_percent: change,
            change_label: format!("{:.2}%", change.abs()),
            direction: Trend::between(0.0, change),
            trend: record.trend(),
            badge: record.trend().badge(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub count_label: String,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub label: String,
    pub average_price: f64,
}

/// 平均价格走势图数据
///
/// 这是占位数据：每个点都是当前均价加随机噪声，不是真实的历史价格。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySeries {
    pub synthetic: bool,
    pub points: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub revision: u64,
    pub table: TableView,
    pub distribution: TrendCounts,
    pub history: HistorySeries,
}

pub fn project_table(store: &ProductStore) -> TableView {
    TableView {
        count_label: format!("{} products", store.len()),
        rows: store.iter().map(TableRow::from_record).collect(),
    }
}

/// 分布图即存储的走势统计
pub fn project_distribution(store: &ProductStore) -> TrendCounts {
    store.trend_counts()
}

pub fn project_history<R: Rng + ?Sized>(store: &ProductStore, rng: &mut R, today: NaiveDate) -> HistorySeries {
    let average = store.average_price();

    let points = (0..HISTORY_DAYS)
        .rev()
        .map(|days_ago| {
            let date = today
                .checked_sub_days(Days::new(days_ago as u64))
                .unwrap_or(today);
            let average_price = match average {
                Some(avg) => {
                    let noise = (rng.random::<f64>() - 0.5) * HISTORY_NOISE;
                    (avg + noise).round().max(0.0)
                }
                None => 0.0,
            };
            HistoryPoint {
                date,
                label: date.format("%b %-d").to_string(),
                average_price,
            }
        })
        .collect();

    HistorySeries {
        synthetic: true,
        points,
    }
}

/// 负责把存储投影成三个视图
#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    revision: u64,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<R: Rng + ?Sized>(&mut self, store: &ProductStore, rng: &mut R, today: NaiveDate) -> DashboardView {
        self.revision += 1;
        tracing::trace!(revision = self.revision, products = store.len(), "rendering dashboard");

        DashboardView {
            revision: self.revision,
            table: project_table(store),
            distribution: project_distribution(store),
            history: project_history(store, rng, today),
        }
    }
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${price:.0}")
    } else {
        format!("${price:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn seeded_store() -> ProductStore {
        let mut store = ProductStore::new();
        store.add(ProductRecord::new(ProductId(3), "iPhone 15 Pro", "GOAT", "img", 1100.0, 1100.0));
        store.add(ProductRecord::new(ProductId(2), "PlayStation 5 Digital", "eBay", "img", 450.0, 460.0));
        store.add(ProductRecord::new(ProductId(1), "Nike Dunk Low Panda", "StockX", "img", 250.0, 240.0));
        store
    }

    #[test]
    fn percent_change_rounds_to_two_decimals() {
        assert_eq!(percent_change(240.0, 250.0), 4.17);
        assert_eq!(percent_change(460.0, 450.0), -2.17);
        assert_eq!(percent_change(1100.0, 1100.0), 0.0);
    }

    #[test]
    fn percent_change_guards_zero_previous() {
        let change = percent_change(0.0, 250.0);
        assert_eq!(change, 0.0);
        assert!(change.is_finite());

        let mut store = ProductStore::new();
        store.add(ProductRecord::new(ProductId(1), "free sample", "eBay", "img", 25.0, 0.0));
        let table = project_table(&store);
        assert_eq!(table.rows[0].change_percent, 0.0);
        assert_eq!(table.rows[0].change_label, "0.00%");
        assert_eq!(table.rows[0].direction, Trend::Stable);
        // 走势仍按价格本身计算
        assert_eq!(table.rows[0].trend, Trend::Up);
    }

    #[test]
    fn table_rows_follow_store_order() {
        let table = project_table(&seeded_store());
        assert_eq!(table.count_label, "3 products");

        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Nike Dunk Low Panda", "PlayStation 5 Digital", "iPhone 15 Pro"]);

        let first = &table.rows[0];
        assert_eq!(first.price_label, "$250");
        assert_eq!(first.change_label, "4.17%");
        assert_eq!(first.badge, "UP");

        let second = &table.rows[1];
        assert_eq!(second.change_label, "2.17%");
        assert_eq!(second.direction, Trend::Down);
    }

    #[test]
    fn empty_store_projections_are_defined() {
        let store = ProductStore::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(project_distribution(&store).buckets(), [0, 0, 0]);

        let history = project_history(&store, &mut rng, today());
        assert_eq!(history.points.len(), HISTORY_DAYS);
        assert!(history.synthetic);
        assert!(history.points.iter().all(|p| p.average_price.is_finite()));
    }

    #[test]
    fn extreme_prices_stay_finite() {
        assert_eq!(percent_change(1e-300, 1e10), 0.0);

        let mut store = ProductStore::new();
        store.add(ProductRecord::new(ProductId(1), "tiny base", "eBay", "img", 1e10, 1e-300));
        store.add(ProductRecord::new(ProductId(2), "huge", "eBay", "img", 1e308, 1e308));
        store.add(ProductRecord::new(ProductId(3), "huge too", "eBay", "img", 1e308, 1e308));

        let table = project_table(&store);
        let row = table.rows.iter().find(|r| r.id == ProductId(1)).unwrap();
        assert_eq!(row.change_percent, 0.0);
        assert_eq!(row.change_label, "0.00%");

        let history = project_history(&store, &mut StdRng::seed_from_u64(9), today());
        assert!(history.points.iter().all(|p| p.average_price.is_finite()));
    }

    #[test]
    fn history_ends_today_and_stays_near_average() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(5);
        let avg = store.average_price().unwrap();

        let history = project_history(&store, &mut rng, today());
        let last = history.points.last().unwrap();
        assert_eq!(last.date, today());
        assert_eq!(last.label, "Oct 16");
        assert_eq!(history.points[0].label, "Oct 10");

        for point in &history.points {
            assert!((point.average_price - avg).abs() <= 26.0);
        }
    }

    #[test]
    fn render_is_deterministic_for_a_seed() {
        let store = seeded_store();
        let mut a = ViewSynchronizer::new();
        let mut b = ViewSynchronizer::new();

        let left = a.render(&store, &mut StdRng::seed_from_u64(3), today());
        let right = b.render(&store, &mut StdRng::seed_from_u64(3), today());
        assert_eq!(left, right);
        assert_eq!(left.distribution.buckets(), [1, 1, 1]);
        assert_eq!(left.distribution.total(), store.len());
    }

    #[test]
    fn every_render_bumps_revision() {
        let store = seeded_store();
        let mut sync = ViewSynchronizer::new();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(sync.render(&store, &mut rng, today()).revision, 1);
        assert_eq!(sync.render(&store, &mut rng, today()).revision, 2);
    }
}
