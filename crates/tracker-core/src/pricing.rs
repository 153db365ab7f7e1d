//! 模拟价格波动
//!
//! 单个刷新与批量刷新共用同一策略：在当前价格上下 `max_swing` 范围内随机波动，
//! 四舍五入取整，且不低于 `floor`。

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::store::MIN_PRICE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricePolicy {
    pub max_swing: f64,
    pub floor: f64,
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self {
            max_swing: 15.0,
            floor: MIN_PRICE,
        }
    }
}

impl PricePolicy {
    pub fn next_price<R: Rng + ?Sized>(&self, current: f64, rng: &mut R) -> f64 {
        let jitter: f64 = rng.random::<f64>() - 0.5;
        self.settle(current + jitter * 2.0 * self.max_swing)
    }

    /// 取整并应用下限；下限本身不会低于 [`MIN_PRICE`]
    pub fn settle(&self, proposed: f64) -> f64 {
        let floor = self.floor.max(MIN_PRICE);
        if !proposed.is_finite() {
            return floor;
        }
        proposed.max(floor).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn next_price_stays_within_swing() {
        let policy = PricePolicy::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let next = policy.next_price(250.0, &mut rng);
            assert!((235.0..=265.0).contains(&next), "{next} out of range");
            assert_eq!(next, next.round());
        }
    }

    #[test]
    fn next_price_never_drops_below_floor() {
        let policy = PricePolicy::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            assert!(policy.next_price(MIN_PRICE, &mut rng) >= MIN_PRICE);
        }
    }

    #[test]
    fn same_seed_same_prices() {
        let policy = PricePolicy::default();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        let left: Vec<f64> = (0..10).map(|_| policy.next_price(400.0, &mut a)).collect();
        let right: Vec<f64> = (0..10).map(|_| policy.next_price(400.0, &mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn configured_floor_below_minimum_is_raised() {
        let policy = PricePolicy { max_swing: 15.0, floor: 0.0 };
        assert_eq!(policy.settle(-50.0), MIN_PRICE);
        assert_eq!(policy.settle(f64::INFINITY), MIN_PRICE);
    }
}
