use std::collections::BTreeMap;

use tracker_core::{IdGenerator, ProductId, ProductRecord};

/// 后端保存的商品表，按 ID 索引
///
/// ID 单调递增，因此按 ID 遍历即为插入顺序。
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: BTreeMap<ProductId, ProductRecord>,
    ids: IdGenerator,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带一条测试商品，新 ID 从其之后开始
    pub fn seeded() -> Self {
        let mut catalog = Self {
            products: BTreeMap::new(),
            ids: IdGenerator::starting_after(ProductId(1)),
        };
        catalog.insert(ProductRecord::new(
            ProductId(1),
            "Nike Dunk Low Panda",
            "StockX",
            "https://images.stockx.com/images/Nike-Dunk-Low-Retro-White-Black-2021-Product.jpg",
            250.0,
            240.0,
        ));
        catalog
    }

    pub fn next_id(&mut self) -> ProductId {
        self.ids.next_id()
    }

    pub fn insert(&mut self, record: ProductRecord) {
        self.products.insert(record.id(), record);
    }

    pub fn get(&self, id: ProductId) -> Option<&ProductRecord> {
        self.products.get(&id)
    }

    pub fn remove(&mut self, id: ProductId) -> Option<ProductRecord> {
        self.products.remove(&id)
    }

    pub fn list(&self) -> Vec<ProductRecord> {
        self.products.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_in_insertion_order() {
        let mut catalog = ProductCatalog::seeded();
        let first = catalog.next_id();
        catalog.insert(ProductRecord::new(first, "A", "ebay", "img", 100.0, 120.0));
        let second = catalog.next_id();
        catalog.insert(ProductRecord::new(second, "B", "goat", "img", 300.0, 200.0));

        let names: Vec<String> = catalog.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Nike Dunk Low Panda", "A", "B"]);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut catalog = ProductCatalog::seeded();
        assert!(catalog.remove(ProductId(999)).is_none());
        assert!(catalog.remove(ProductId(1)).is_some());
        assert!(catalog.list().is_empty());
    }
}
