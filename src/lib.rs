//! Gamebuster authentication
//!
//! JWT issuance and validation for the Gamebuster web scaffold:
//! - HS256 access tokens built from a claim set and configured options
//! - Validation with per-check toggles and clock skew against an injectable clock
//! - Axum middleware attaching the caller identity to each request

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
