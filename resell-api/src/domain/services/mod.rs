pub mod catalog_service;
pub mod dashboard_service;
