//! Bearer token authentication

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AuthenticatedIdentity, TokenValidator, ValidationFailure};

/// Request extension recording why a presented token was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationFailure(pub ValidationFailure);

/// Attach the caller identity when the request carries a valid token.
///
/// Never rejects: anonymous requests and requests with a bad token continue
/// unauthenticated, the latter with an [`AuthenticationFailure`] extension.
pub async fn jwt_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match bearer_token(request.headers()) {
        None => {}
        Some(Err(failure)) => {
            debug!(reason = %failure, "Unreadable Authorization header");
            request.extensions_mut().insert(AuthenticationFailure(failure));
        }
        Some(Ok(token)) => match state.jwt_service.try_validate(&token).into_result() {
            Ok(identity) => {
                debug!(sub = identity.subject(), "Request authenticated");
                request.extensions_mut().insert(identity);
            }
            Err(failure) => {
                request.extensions_mut().insert(AuthenticationFailure(failure));
            }
        },
    }

    next.run(request).await
}

/// Last whitespace-delimited segment of the `Authorization` header.
///
/// `None` when the header is absent; the scheme name is not checked.
fn bearer_token(headers: &HeaderMap) -> Option<Result<String, ValidationFailure>> {
    let value = headers.get(header::AUTHORIZATION)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|value| value.split_whitespace().last())
        .map(str::to_string)
        .ok_or(ValidationFailure::Malformed);

    Some(token)
}

/// Extractor that requires an authenticated caller
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub AuthenticatedIdentity);

impl<S: Send + Sync> FromRequestParts<S> for RequireIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<AuthenticatedIdentity>() {
            return Ok(Self(identity.clone()));
        }

        match parts.extensions.get::<AuthenticationFailure>() {
            Some(AuthenticationFailure(failure)) => Err(ApiError::invalid_token(failure)),
            None => Err(ApiError::unauthorized(
                "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
            )),
        }
    }
}

/// Extractor yielding the caller identity when one is attached
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<AuthenticatedIdentity>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthenticatedIdentity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{self, HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::api::types::JWT_EXPIRED_HEADER;
    use crate::domain::{ClaimSet, FixedClock, JwtOptions, TokenIssuer};
    use crate::infrastructure::auth::JwtService;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn options() -> JwtOptions {
        JwtOptions::new("test-secret-key-12345")
            .unwrap()
            .with_validate_lifetime(true)
    }

    fn service_at(at: DateTime<Utc>) -> JwtService {
        JwtService::new(options(), Arc::new(FixedClock::new(at)))
    }

    fn token_at(at: DateTime<Utc>) -> String {
        service_at(at)
            .generate(&ClaimSet::new("u1", "Ann", "ann@example.com"))
            .unwrap()
            .into_string()
    }

    async fn whoami(OptionalIdentity(identity): OptionalIdentity) -> String {
        identity
            .and_then(|identity| identity.subject().map(str::to_string))
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn failure(request: Request) -> String {
        request
            .extensions()
            .get::<AuthenticationFailure>()
            .map(|AuthenticationFailure(failure)| failure.to_string())
            .unwrap_or_default()
    }

    async fn protected(RequireIdentity(identity): RequireIdentity) -> String {
        identity.subject().unwrap_or_default().to_string()
    }

    fn app() -> Router {
        let state = AppState::new(service_at(instant()));

        Router::new()
            .route("/whoami", get(whoami))
            .route("/failure", get(failure))
            .route("/protected", get(protected))
            .layer(from_fn_with_state(state.clone(), jwt_authentication))
            .with_state(state)
    }

    async fn call(uri: &str, authorization: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut builder = http::Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_no_header_continues_anonymous() {
        let (status, _, body) = call("/whoami", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_bearer_token_attaches_identity() {
        let token = token_at(instant());
        let (status, _, body) = call("/whoami", Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn test_scheme_name_is_not_checked() {
        let token = token_at(instant());

        let (_, _, body) = call("/whoami", Some(&token)).await;
        assert_eq!(body, "u1");

        let (_, _, body) = call("/whoami", Some(&format!("Token   {}", token))).await;
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn test_invalid_token_continues_unauthenticated() {
        let (status, _, body) = call("/whoami", Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let (_, _, body) = call("/failure", Some("Bearer not-a-jwt")).await;
        assert_eq!(body, ValidationFailure::Malformed.to_string());
    }

    #[tokio::test]
    async fn test_blank_header_records_malformed() {
        let (status, _, body) = call("/failure", Some("   ")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, ValidationFailure::Malformed.to_string());
    }

    #[tokio::test]
    async fn test_require_identity_accepts_valid_token() {
        let token = token_at(instant());
        let (status, _, body) = call("/protected", Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn test_require_identity_rejects_anonymous() {
        let (status, headers, _) = call("/protected", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(headers.get(JWT_EXPIRED_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_expired_token_sets_expired_header() {
        let token = token_at(instant() - Duration::hours(2));
        let (status, headers, _) = call("/protected", Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            headers.get(JWT_EXPIRED_HEADER),
            Some(&HeaderValue::from_static("true"))
        );
    }

    #[tokio::test]
    async fn test_bad_signature_omits_expired_header() {
        let token = token_at(instant());
        let tampered = format!("{}x", token);
        let (status, headers, _) = call("/protected", Some(&format!("Bearer {}", tampered))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(headers.get(JWT_EXPIRED_HEADER).is_none());
    }

    #[test]
    fn test_bearer_token_takes_last_segment() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer  abc.def.ghi ".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some(Ok("abc.def.ghi".to_string())));
    }
}
