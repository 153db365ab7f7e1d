//! 固定的市场点评
//!
//! 文案全部是写死的展示内容，并不基于任何分析。

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

const DEFAULT_PROFITABLE_ITEM: &str = "Nike Dunk Low Panda";

pub const DASHBOARD_TIPS: [&str; 3] = [
    "📈 Trend Alert: Sneaker prices up 15% this week. Consider selling!",
    "💰 Opportunity: PlayStation 5 prices dropping - good buy for resale.",
    "🎯 Prediction: Limited edition items likely to increase 20% next month.",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub trend: String,
    pub profitable_item: String,
    pub predictions: String,
    pub risks: String,
    pub opportunities: String,
    pub timestamp: DateTime<Utc>,
}

/// `profitable_item` 取第一个商品名，没有时使用默认商品
pub fn market_analysis(product_names: &[String], now: DateTime<Utc>) -> MarketAnalysis {
    let profitable_item = product_names
        .iter()
        .map(|name| name.trim())
        .find(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PROFITABLE_ITEM)
        .to_string();

    MarketAnalysis {
        trend: "Market trending upward with 15% average increase".to_string(),
        profitable_item,
        predictions: "Expected 10-20% growth next week".to_string(),
        risks: "High competition for popular items".to_string(),
        opportunities: "Limited edition releases coming soon".to_string(),
        timestamp: now,
    }
}

pub fn pick_tip<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DASHBOARD_TIPS[rng.random_range(0..DASHBOARD_TIPS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn analysis_uses_first_product_name() {
        let names = vec!["Yeezy 350".to_string(), "PS5".to_string()];
        let analysis = market_analysis(&names, Utc::now());
        assert_eq!(analysis.profitable_item, "Yeezy 350");
    }

    #[test]
    fn analysis_falls_back_without_products() {
        let analysis = market_analysis(&[], Utc::now());
        assert_eq!(analysis.profitable_item, DEFAULT_PROFITABLE_ITEM);
        assert_eq!(analysis.predictions, "Expected 10-20% growth next week");
    }

    #[test]
    fn tip_comes_from_fixed_list() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            assert!(DASHBOARD_TIPS.contains(&pick_tip(&mut rng)));
        }
    }
}
