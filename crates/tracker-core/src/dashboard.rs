//! 仪表盘会话
//!
//! 持有商品存储、视图同步器和随机数源。每个修改操作返回前都会完整重新渲染视图。

use chrono::{NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, TrackerError};
use crate::export::{ExportFile, export_store};
use crate::insights::pick_tip;
use crate::lookup::Candidate;
use crate::model::{IdGenerator, PriceChange, ProductId, ProductRecord, Trend};
use crate::notice::Notice;
use crate::pricing::PricePolicy;
use crate::store::ProductStore;
use crate::view::{DashboardView, ViewSynchronizer, percent_change};

/// 操作结果及需要展示给用户的提示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applied<T> {
    pub result: T,
    pub notice: Notice,
    /// 耗时操作开始时的进度提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Notice>,
}

impl<T> Applied<T> {
    fn new(result: T, notice: Notice) -> Self {
        Self {
            result,
            notice,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Notice) -> Self {
        self.progress = Some(progress);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub platform: String,
    pub current_price: f64,
    pub previous_price: f64,
    pub change_amount: f64,
    pub change_percent: f64,
    pub trend: Trend,
    pub outlook: String,
}

impl ProductDetails {
    fn from_record(record: &ProductRecord) -> Self {
        let outlook = match record.trend() {
            Trend::Up => "increase",
            Trend::Down => "decrease",
            Trend::Stable => "remain stable",
        };
        Self {
            id: record.id(),
            name: record.name.clone(),
            image: record.image.clone(),
            platform: record.platform.clone(),
            current_price: record.current_price(),
            previous_price: record.previous_price(),
            change_amount: (record.current_price() - record.previous_price()).abs(),
            change_percent: percent_change(record.previous_price(), record.current_price()),
            trend: record.trend(),
            outlook: format!("Expected to {outlook} over next 7 days"),
        }
    }
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct Dashboard {
    store: ProductStore,
    sync: ViewSynchronizer,
    policy: PricePolicy,
    ids: IdGenerator,
    rng: StdRng,
    today: fn() -> NaiveDate,
    view: DashboardView,
}

impl Dashboard {
    /// `seed` 为 `None` 时使用系统随机源
    pub fn new(policy: PricePolicy, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let store = ProductStore::new();
        let mut sync = ViewSynchronizer::new();
        let view = sync.render(&store, &mut rng, utc_today());

        Self {
            store,
            sync,
            policy,
            ids: IdGenerator::new(),
            rng,
            today: utc_today,
            view,
        }
    }

    /// 替换日期来源
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self.render();
        self
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    /// 载入三个初始商品，清空原有内容；之后生成的 ID 都大于初始商品
    pub fn load_seed(&mut self) -> &DashboardView {
        self.store.clear();
        let seeds = seed_products();
        if let Some(max) = seeds.iter().map(ProductRecord::id).max() {
            self.ids = IdGenerator::starting_after(max);
        }
        for record in seeds.into_iter().rev() {
            self.store.add(record);
        }
        info!(count = self.store.len(), "seed products loaded");
        self.render();
        &self.view
    }

    pub fn add_candidate(&mut self, candidate: Candidate) -> Result<Applied<ProductRecord>> {
        for price in [candidate.price, candidate.previous_price] {
            if !price.is_finite() || price < 0.0 {
                return Err(TrackerError::InvalidPrice(price));
            }
        }
        if candidate.price == 0.0 {
            return Err(TrackerError::InvalidPrice(candidate.price));
        }

        let record = candidate.into_record(self.ids.next_id());
        info!(id = %record.id(), name = %record.name, platform = %record.platform, "tracking product");
        self.store.add(record.clone());
        self.render();

        Ok(Applied::new(record, Notice::success("Product added!")))
    }

    /// 不存在的 ID 也会重新渲染
    pub fn remove(&mut self, id: ProductId) -> Applied<Option<ProductRecord>> {
        let removed = self.store.remove(id);
        self.removed(removed)
    }

    /// 无法识别的 ID 不对应任何商品，存储不变，只重新渲染
    pub fn remove_unmatched(&mut self) -> Applied<Option<ProductRecord>> {
        self.removed(None)
    }

    fn removed(&mut self, removed: Option<ProductRecord>) -> Applied<Option<ProductRecord>> {
        self.render();
        Applied::new(removed, Notice::warning("Product removed"))
    }

    pub fn refresh_price(&mut self, id: ProductId) -> Result<Applied<PriceChange>> {
        let current = self.store.get(id)?.current_price();
        let next = self.policy.next_price(current, &mut self.rng);
        let change = self.store.update_price(id, next)?;
        self.render();

        Ok(Applied::new(change, Notice::success("Price updated!")))
    }

    pub fn refresh_all(&mut self) -> Applied<Vec<PriceChange>> {
        let policy = self.policy;
        let rng = &mut self.rng;
        let changes = self
            .store
            .bulk_refresh(|record| policy.next_price(record.current_price(), rng));
        info!(count = changes.len(), "all prices refreshed");
        self.render();

        Applied::new(changes, Notice::success("All prices updated!"))
            .with_progress(Notice::info("Refreshing all prices..."))
    }

    pub fn details(&self, id: ProductId) -> Result<ProductDetails> {
        self.store.get(id).map(ProductDetails::from_record)
    }

    pub fn export(&self) -> Result<Applied<ExportFile>> {
        let file = export_store(&self.store, (self.today)())?;
        Ok(Applied::new(file, Notice::success("Data exported!")))
    }

    pub fn insight(&mut self) -> &'static str {
        pick_tip(&mut self.rng)
    }

    fn render(&mut self) {
        self.view = self.sync.render(&self.store, &mut self.rng, (self.today)());
    }
}

/// 初始商品
pub fn seed_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord::new(
            ProductId(1),
            "Nike Dunk Low Panda",
            "StockX",
            "https://images.stockx.com/images/Nike-Dunk-Low-Retro-White-Black-2021-Product.jpg",
            250.0,
            240.0,
        ),
        ProductRecord::new(
            ProductId(2),
            "PlayStation 5 Digital",
            "eBay",
            "https://images.stockx.com/images/Sony-PlayStation-5-Digital-Edition-Product.jpg",
            450.0,
            460.0,
        ),
        ProductRecord::new(
            ProductId(3),
            "iPhone 15 Pro",
            "GOAT",
            "https://images.stockx.com/images/Apple-iPhone-15-Pro-256GB-Natural-Titanium-Product.jpg",
            1100.0,
            1100.0,
        ),
    ]
}
