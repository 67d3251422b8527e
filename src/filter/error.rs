use thiserror::Error;

/// Rejected queries; raised while parsing, never while matching
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid WHERE clause: {0}")]
    InvalidWhereClause(String),

    #[error("Unknown filter operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Bad operand: {0}")]
    InvalidOperatorData(String),

    #[error("Invalid sort: {0}")]
    InvalidOrder(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("WHERE clause nesting depth {depth} exceeds maximum {max_depth}")]
    MaxDepthExceeded { depth: u32, max_depth: u32 },
}
