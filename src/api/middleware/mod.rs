//! API middleware components

pub mod jwt_auth;

pub use jwt_auth::{jwt_authentication, AuthenticationFailure, OptionalIdentity, RequireIdentity};
