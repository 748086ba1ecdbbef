//! 模型构建错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid dimension `{name}`: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("Duplicate name `{name}` in model `{parent}`")]
    DuplicateName { parent: String, name: String },

    #[error("Degenerate polygon: {0}")]
    DegeneratePolygon(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
