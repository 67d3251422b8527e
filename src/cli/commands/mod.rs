pub mod config;
pub mod fixture;
pub mod store;
