//! Principal reconstructed from a validated token

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Identity carrying every claim of a validated token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AuthenticatedIdentity {
    claims: Map<String, Value>,
}

impl AuthenticatedIdentity {
    pub fn from_claims(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// String value of a claim, `None` for missing or non-string claims
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.claim_str("sub")
    }

    pub fn name(&self) -> Option<&str> {
        self.claim_str("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.claim_str("email")
    }

    pub fn issuer(&self) -> Option<&str> {
        self.claim_str("iss")
    }

    pub fn token_id(&self) -> Option<&str> {
        self.claim_str("jti")
    }

    /// Audiences, accepting both the single string and the array form
    pub fn audiences(&self) -> Vec<&str> {
        audiences_of(self.claims.get("aud"))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_date("exp")
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.numeric_date("iat")
    }

    pub fn into_claims(self) -> Map<String, Value> {
        self.claims
    }

    fn numeric_date(&self, name: &str) -> Option<DateTime<Utc>> {
        let seconds = self.claims.get(name).and_then(Value::as_i64)?;
        Utc.timestamp_opt(seconds, 0).single()
    }
}

pub(crate) fn audiences_of(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(aud)) => vec![aud.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
