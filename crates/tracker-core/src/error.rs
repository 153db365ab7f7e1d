//! 领域错误类型定义

use thiserror::Error;

use crate::model::ProductId;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
