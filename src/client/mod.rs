// File: ./src/client/mod.rs
pub mod core;
pub mod middleware;

pub use crate::client::core::{CatalogClient, DEFAULT_BASE_URL, DEFAULT_RANDOM_COUNT};
