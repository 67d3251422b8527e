#[macro_use]
pub mod models;

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;
pub mod stores;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use error::StoreError;
pub use models::Entity;
pub use store::{Store, StoreOptions};
