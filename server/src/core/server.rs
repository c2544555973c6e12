//! Server Implementation
//!
//! Router assembly, HTTP server startup, graceful shutdown.

use axum::{Router, middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::auth::require_auth;
use crate::core::{AppState, Config};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests and tooling)
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => AppState::initialize(&self.config).await?,
        };

        let app = build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Don Maris server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}

/// Assemble the full application router.
///
/// Authentication wraps every route; role checks live with the routes
/// they protect.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::users::router(&state))
        .merge(api::products::router())
        .merge(api::brands::router())
        .merge(api::orders::router())
        .merge(api::admin_logs::router(&state))
        .merge(api::checkout::router())
        .merge(api::whatsapp::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
