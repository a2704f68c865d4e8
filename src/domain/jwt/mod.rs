//! JWT domain
//!
//! Value types and traits for issuing and validating self-contained
//! HMAC-signed tokens: claim sets, options, the clock abstraction and the
//! identity reconstructed from a validated token.

mod claims;
mod clock;
mod identity;
mod options;
mod service;
mod token;
mod validation;

pub use claims::{ClaimField, ClaimMapping, ClaimSet};
pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::AuthenticatedIdentity;
pub use options::{JwtOptions, JwtSecret, OptionsError, TokenLifetime};
pub use service::{TokenIssuer, TokenValidator};
pub use token::AccessToken;
pub use validation::{ValidationFailure, ValidationOutcome};

pub(crate) use identity::audiences_of;

#[cfg(test)]
pub use clock::MockClock;
