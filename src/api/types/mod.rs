//! HTTP API types

pub mod error;

pub use error::{ApiError, ApiErrorResponse, JWT_EXPIRED_HEADER};
