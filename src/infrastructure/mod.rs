//! Infrastructure layer - Implementations of domain contracts

pub mod auth;
pub mod logging;
