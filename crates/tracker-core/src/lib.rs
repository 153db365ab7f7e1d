//! 二手平台商品价格追踪的核心逻辑：商品存储、价格策略、视图投影与查询能力

pub mod dashboard;
pub mod error;
pub mod export;
pub mod insights;
pub mod lookup;
pub mod model;
pub mod notice;
pub mod pricing;
pub mod store;
pub mod view;

pub use dashboard::{Applied, Dashboard, ProductDetails};
pub use error::{Result, TrackerError};
pub use lookup::{Candidate, LookupProvider, LookupQuery, SyntheticLookup};
pub use model::{IdGenerator, PriceChange, ProductId, ProductRecord, Trend};
pub use notice::{Notice, NoticeLevel};
pub use pricing::PricePolicy;
pub use store::{MIN_PRICE, ProductStore, TrendCounts};
pub use view::{DashboardView, ViewSynchronizer};
