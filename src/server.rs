//! HTTP server assembly
//!
//! Builds the application state and router, and runs the server until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::handlers;
use crate::middleware::request_tracing;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(database: DatabaseService, settings: Settings) -> Self {
        Self {
            services: ServiceFactory::new(database, &settings),
            settings: Arc::new(settings),
        }
    }
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origin = match settings.server.cors_origin.as_str() {
        "*" => AllowOrigin::any(),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(origin = %origin, "Invalid CORS origin, allowing any");
                AllowOrigin::any()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/users", handlers::users::routes())
        .nest("/events", handlers::events::routes())
        .nest("/pregames", handlers::pregames::routes())
        .nest("/mutuals", handlers::mutuals::routes());

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), request_tracing))
        .layer(cors_layer(&state.settings))
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM
pub async fn serve(state: AppState) -> Result<()> {
    let address = state.settings.bind_address();
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
