//! Outcome of validating a bearer token

use thiserror::Error;

use super::identity::AuthenticatedIdentity;

/// Reason a token was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token issuer is invalid")]
    InvalidIssuer,

    #[error("token audience is invalid")]
    InvalidAudience,

    #[error("token algorithm is not HS256")]
    AlgorithmMismatch,

    #[error("token is missing required claim '{0}'")]
    MissingClaim(&'static str),
}

impl ValidationFailure {
    /// Whether the rejection was caused by the token lifetime ending
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Result of [`TokenValidator::try_validate`](super::TokenValidator::try_validate)
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(AuthenticatedIdentity),
    Invalid(ValidationFailure),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::Invalid(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(failure) => Some(failure),
        }
    }

    pub fn into_identity(self) -> Option<AuthenticatedIdentity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<AuthenticatedIdentity, ValidationFailure> {
        match self {
            Self::Valid(identity) => Ok(identity),
            Self::Invalid(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_expired_reports_expiry() {
        assert!(ValidationFailure::Expired.is_expired());
        assert!(!ValidationFailure::NotYetValid.is_expired());
        assert!(!ValidationFailure::InvalidSignature.is_expired());
    }

    #[test]
    fn test_invalid_outcome_has_no_identity() {
        let outcome = ValidationOutcome::Invalid(ValidationFailure::Malformed);

        assert!(!outcome.is_valid());
        assert!(outcome.identity().is_none());
        assert_eq!(outcome.failure(), Some(&ValidationFailure::Malformed));
        assert_eq!(outcome.into_identity(), None);
    }

    #[test]
    fn test_into_result_keeps_failure_reason() {
        let outcome = ValidationOutcome::Invalid(ValidationFailure::Expired);
        assert_eq!(outcome.into_result(), Err(ValidationFailure::Expired));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ValidationFailure::MissingClaim("exp").to_string(),
            "token is missing required claim 'exp'"
        );
    }
}
