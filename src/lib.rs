// Crate root library declaration and module exports.
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod controller;
pub mod display;
pub mod favorites;
pub mod filter;
pub mod model;
pub mod storage;
