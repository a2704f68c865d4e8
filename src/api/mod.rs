//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod me;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::{OptionalIdentity, RequireIdentity};
pub use router::create_router;
pub use state::AppState;
