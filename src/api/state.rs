//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::JwtService;

/// Application state shared with handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(jwt_service: JwtService) -> Self {
        Self {
            jwt_service: Arc::new(jwt_service),
        }
    }
}
