//! Current caller endpoint

use axum::Json;

use super::middleware::RequireIdentity;
use crate::domain::AuthenticatedIdentity;

/// Claims of the authenticated caller
pub async fn current_identity(
    RequireIdentity(identity): RequireIdentity,
) -> Json<AuthenticatedIdentity> {
    Json(identity)
}
