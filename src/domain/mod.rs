//! Domain layer - Core authentication types and contracts

pub mod error;
pub mod jwt;

pub use error::DomainError;
pub use jwt::{
    AccessToken, AuthenticatedIdentity, ClaimField, ClaimMapping, ClaimSet, Clock, FixedClock,
    JwtOptions, OptionsError, SystemClock, TokenIssuer, TokenLifetime, TokenValidator,
    ValidationFailure, ValidationOutcome,
};
