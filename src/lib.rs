pub mod config;
pub mod date_utils;
pub mod delivery;
pub mod error;
pub mod filters;
pub mod models;
pub mod render;
pub mod services;

/// Application version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
