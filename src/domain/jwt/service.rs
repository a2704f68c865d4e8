//! Token issuance and validation traits

use super::{AccessToken, ClaimSet, ValidationOutcome};
use crate::domain::DomainError;

/// Builds signed tokens from a claim set
pub trait TokenIssuer: Send + Sync {
    /// Issue a token carrying `claims` plus the registered claims
    fn generate(&self, claims: &ClaimSet) -> Result<AccessToken, DomainError>;
}

/// Validates bearer tokens into an identity
pub trait TokenValidator: Send + Sync {
    /// Validate `token`; failures are returned as values, never raised
    fn try_validate(&self, token: &str) -> ValidationOutcome;
}
