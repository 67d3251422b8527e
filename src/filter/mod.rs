pub mod types;
pub mod compare;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod search;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use filter_where::{Condition, Where};
pub use filter_order::FilterOrder;
pub use error::FilterError;
