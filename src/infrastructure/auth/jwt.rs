//! HMAC-SHA-256 JWT issuance and validation

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::map::Entry;
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::jwt::{
    audiences_of, AccessToken, AuthenticatedIdentity, ClaimMapping, ClaimSet, Clock, JwtOptions,
    SystemClock, TokenIssuer, TokenValidator, ValidationFailure, ValidationOutcome,
};
use crate::domain::DomainError;

/// The only algorithm tokens are signed with or accepted under
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT service issuing and validating self-contained HS256 tokens
#[derive(Clone)]
pub struct JwtService {
    options: Arc<JwtOptions>,
    clock: Arc<dyn Clock>,
    mapping: ClaimMapping,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("options", &self.options)
            .field("mapping", &self.mapping)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given options and clock
    pub fn new(options: JwtOptions, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(options.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(options.secret.as_bytes());
        let validation = build_validation();

        Self {
            options: Arc::new(options),
            clock,
            mapping: ClaimMapping::default(),
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Create a JWT service reading time from the system clock
    pub fn with_system_clock(options: JwtOptions) -> Self {
        Self::new(options, Arc::new(SystemClock))
    }

    /// Replace the field to claim name table
    pub fn with_claim_mapping(mut self, mapping: ClaimMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn options(&self) -> &JwtOptions {
        &self.options
    }

    fn registered_claims(&self, now: DateTime<Utc>) -> Map<String, Value> {
        let expires = now + self.options.access_token_ttl.as_duration();

        let mut payload = Map::new();
        payload.insert("exp".to_string(), Value::from(expires.timestamp()));
        payload.insert("iat".to_string(), Value::from(now.timestamp()));
        payload.insert("nbf".to_string(), Value::from(now.timestamp()));
        payload.insert("jti".to_string(), Value::from(Uuid::new_v4().to_string()));

        if let Some(issuer) = self.options.effective_issuer() {
            payload.insert("iss".to_string(), Value::from(issuer));
        }

        if let Some(audience) = self.options.effective_audience() {
            payload.insert("aud".to_string(), Value::from(audience));
        }

        payload
    }

    fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, Rejection> {
        let token_data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(Rejection::from)?;
        let claims = token_data.claims;

        if self.options.validate_lifetime {
            self.check_lifetime(&claims)?;
        }

        if self.options.validate_issuer {
            self.check_issuer(&claims)?;
        }

        if self.options.validate_audience {
            self.check_audience(&claims)?;
        }

        if !is_signing_algorithm(&token_data.header) {
            return Err(Rejection::new(
                ValidationFailure::AlgorithmMismatch,
                format!("header alg is {:?}", token_data.header.alg),
            ));
        }

        Ok(AuthenticatedIdentity::from_claims(claims))
    }

    fn check_lifetime(&self, claims: &Map<String, Value>) -> Result<(), Rejection> {
        let now = self.clock.utc_now().timestamp();
        let skew = self.options.clock_skew().num_seconds();

        let expires = numeric_date(claims, "exp")?.ok_or_else(|| {
            Rejection::new(ValidationFailure::MissingClaim("exp"), "lifetime validation enabled")
        })?;

        if expires < now.saturating_sub(skew) {
            return Err(Rejection::new(
                ValidationFailure::Expired,
                format!("exp {} is before now {} minus skew {}s", expires, now, skew),
            ));
        }

        if let Some(not_before) = numeric_date(claims, "nbf")? {
            if not_before > now.saturating_add(skew) {
                return Err(Rejection::new(
                    ValidationFailure::NotYetValid,
                    format!("nbf {} is after now {} plus skew {}s", not_before, now, skew),
                ));
            }
        }

        Ok(())
    }

    fn check_issuer(&self, claims: &Map<String, Value>) -> Result<(), Rejection> {
        let actual = claims.get("iss").and_then(Value::as_str);

        match (self.options.effective_issuer(), actual) {
            (Some(expected), Some(actual)) if expected == actual => Ok(()),
            (None, _) => Err(Rejection::new(
                ValidationFailure::InvalidIssuer,
                "issuer validation enabled without a configured issuer",
            )),
            (Some(expected), actual) => Err(Rejection::new(
                ValidationFailure::InvalidIssuer,
                format!("expected '{}', got {:?}", expected, actual),
            )),
        }
    }

    fn check_audience(&self, claims: &Map<String, Value>) -> Result<(), Rejection> {
        let Some(expected) = self.options.effective_audience() else {
            return Err(Rejection::new(
                ValidationFailure::InvalidAudience,
                "audience validation enabled without a configured audience",
            ));
        };

        let audiences = audiences_of(claims.get("aud"));
        if audiences.contains(&expected) {
            Ok(())
        } else {
            Err(Rejection::new(
                ValidationFailure::InvalidAudience,
                format!("expected '{}', got {:?}", expected, audiences),
            ))
        }
    }
}

impl TokenIssuer for JwtService {
    fn generate(&self, claims: &ClaimSet) -> Result<AccessToken, DomainError> {
        claims.validate()?;

        let now = self.clock.utc_now();
        let mut payload = self.registered_claims(now);

        let caller_claims = self.mapping.map(claims).chain(
            claims
                .additional
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );

        for (name, value) in caller_claims {
            match payload.entry(name) {
                Entry::Occupied(_) => {
                    info!(claim_type = name, "Claim not added to token, name already present");
                }
                Entry::Vacant(slot) => {
                    slot.insert(Value::from(value));
                }
            }
        }

        let token = encode(&Header::new(SIGNING_ALGORITHM), &payload, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        debug!(subject = %claims.sub, "Issued access token");

        Ok(AccessToken::new(token))
    }
}

impl TokenValidator for JwtService {
    fn try_validate(&self, token: &str) -> ValidationOutcome {
        match self.validate(token) {
            Ok(identity) => ValidationOutcome::Valid(identity),
            Err(rejection) => {
                error!(
                    reason = %rejection.failure,
                    cause = %rejection.cause,
                    "Error while validating JWT"
                );
                ValidationOutcome::Invalid(rejection.failure)
            }
        }
    }
}

/// A validation failure together with the detail that caused it
#[derive(Debug)]
struct Rejection {
    failure: ValidationFailure,
    cause: String,
}

impl Rejection {
    fn new(failure: ValidationFailure, cause: impl Into<String>) -> Self {
        Self {
            failure,
            cause: cause.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Rejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let failure = match err.kind() {
            ErrorKind::InvalidSignature => ValidationFailure::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                ValidationFailure::AlgorithmMismatch
            }
            ErrorKind::ExpiredSignature => ValidationFailure::Expired,
            ErrorKind::ImmatureSignature => ValidationFailure::NotYetValid,
            ErrorKind::InvalidIssuer => ValidationFailure::InvalidIssuer,
            ErrorKind::InvalidAudience => ValidationFailure::InvalidAudience,
            _ => ValidationFailure::Malformed,
        };

        Self::new(failure, err.to_string())
    }
}

/// Signature-only validation; lifetime, issuer and audience are checked
/// against the injected clock and options.
///
/// The HMAC signature is always verified against the configured secret.
fn build_validation() -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn is_signing_algorithm(header: &Header) -> bool {
    serde_json::to_value(header.alg)
        .ok()
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(|alg| alg.eq_ignore_ascii_case("HS256"))
}

fn numeric_date(claims: &Map<String, Value>, name: &'static str) -> Result<Option<i64>, Rejection> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|seconds| seconds.floor() as i64))
            .map(Some)
            .ok_or_else(|| {
                Rejection::new(
                    ValidationFailure::Malformed,
                    format!("claim '{}' is not a numeric date", name),
                )
            }),
    }
}
