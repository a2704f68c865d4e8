//! Serve command - runs the HTTP host

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::logging;

/// Run the HTTP server until it fails
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    let jwt = &config.jwt;
    info!(
        issuer = jwt.effective_issuer(),
        audience = jwt.effective_audience(),
        access_token_ttl = jwt.access_token_ttl.as_minutes(),
        validate_issuer = jwt.validate_issuer,
        validate_audience = jwt.validate_audience,
        validate_lifetime = jwt.validate_lifetime,
        "JWT options loaded"
    );

    let state = AppState::new(JwtService::with_system_clock(config.jwt.clone()));
    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
