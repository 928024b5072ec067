// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Wires storage, routes and tower layers, then serves until shutdown

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::config::Config;
use crate::db::DbState;
use crate::middleware::create_panic_handler;

/// Router with the cross-cutting layers applied
pub fn build_app(db: DbState, config: &Config) -> anyhow::Result<Router> {
    let mut app = api::create_router(db)
        .layer(create_panic_handler())
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = &config.cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any);
        app = app.layer(cors);
    }

    Ok(app)
}

/// Migrate the database and serve the API until Ctrl-C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let db = DbState::init(&config.database())
        .await
        .context("Failed to initialize database")?;

    let app = build_app(db, &config)?;
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
