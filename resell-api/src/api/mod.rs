pub mod analyze;
pub mod dashboard;
pub mod products;
pub mod scrape;
