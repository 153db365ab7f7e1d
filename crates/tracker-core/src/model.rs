use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 商品在存储中的唯一标识
///
/// 由 [`IdGenerator`] 基于毫秒时间戳生成，只保证在单个会话内唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ProductId)
    }
}

/// 价格走势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// 根据前后两次价格的差值符号得出走势
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
            Trend::Stable => "STABLE",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 被追踪的商品
///
/// 价格与走势字段私有，只能通过 [`ProductRecord::apply_price`] 同时修改，
/// 保证 `trend` 始终与 `current_price - previous_price` 的符号一致。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    id: ProductId,
    pub name: String,
    pub image: String,
    current_price: f64,
    previous_price: f64,
    pub platform: String,
    trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    pub fn new(
        id: ProductId,
        name: &str,
        platform: &str,
        image: &str,
        current_price: f64,
        previous_price: f64,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            image: image.to_string(),
            current_price,
            previous_price,
            platform: platform.to_string(),
            trend: Trend::between(previous_price, current_price),
            url: None,
            created_at: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn previous_price(&self) -> f64 {
        self.previous_price
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// 记录一次新的观测价格：旧的当前价变为上一次价格，并重新计算走势
    pub fn apply_price(&mut self, new_price: f64) -> PriceChange {
        self.previous_price = self.current_price;
        self.current_price = new_price;
        self.trend = Trend::between(self.previous_price, self.current_price);

        PriceChange {
            id: self.id,
            previous: self.previous_price,
            current: self.current_price,
            trend: self.trend,
        }
    }
}

/// 一次价格变更的结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub id: ProductId,
    pub previous: f64,
    pub current: f64,
    pub trend: Trend,
}

/// 单调递增的 ID 生成器
///
/// 以当前毫秒时间戳为基础，同一毫秒内多次调用时顺延 +1。
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成的 ID 一定大于 `id`
    pub fn starting_after(id: ProductId) -> Self {
        Self { last: id.0 }
    }

    pub fn next_id(&mut self) -> ProductId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        ProductId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_follows_price_sign() {
        assert_eq!(Trend::between(240.0, 250.0), Trend::Up);
        assert_eq!(Trend::between(460.0, 450.0), Trend::Down);
        assert_eq!(Trend::between(1100.0, 1100.0), Trend::Stable);
    }

    #[test]
    fn apply_price_shifts_previous_and_retrends() {
        let mut record = ProductRecord::new(ProductId(1), "Nike Dunk Low Panda", "StockX", "img", 250.0, 240.0);
        assert_eq!(record.trend(), Trend::Up);

        let change = record.apply_price(230.0);
        assert_eq!(record.previous_price(), 250.0);
        assert_eq!(record.current_price(), 230.0);
        assert_eq!(record.trend(), Trend::Down);
        assert_eq!(change.trend, Trend::Down);

        record.apply_price(230.0);
        assert_eq!(record.trend(), Trend::Stable);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert!(first < second && second < third);

        let mut after = IdGenerator::starting_after(ProductId(u64::MAX - 1));
        assert_eq!(after.next_id(), ProductId(u64::MAX));
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ProductRecord::new(ProductId(7), "PS5", "eBay", "img", 450.0, 460.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["currentPrice"], 450.0);
        assert_eq!(json["previousPrice"], 460.0);
        assert_eq!(json["trend"], "down");
        assert!(json.get("url").is_none());
    }

    #[test]
    fn product_id_parses_from_path_segment() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId(42));
        assert!("abc".parse::<ProductId>().is_err());
    }
}
