//! Authentication infrastructure module
//!
//! This module provides the jsonwebtoken-backed token issuer and validator.

mod jwt;

pub use jwt::JwtService;
