//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (timeout, request ID, tracing)
//! - Serve on a bound listener until shutdown is signalled

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::asp::Clock;
use crate::http::forward::Forwarder;
use crate::http::handlers;
use crate::player::PlayerStore;
use crate::provider::Resolver;
use crate::verify::Verifier;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub resolver: Arc<Resolver>,
    pub verifier: Arc<Verifier>,
    pub forwarder: Arc<Forwarder>,
    /// Source of `asof` timestamps in synthesized responses.
    pub clock: Clock,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/ASP/getplayerinfo.aspx", get(handlers::dynamic_forward))
            .route("/ASP/getawardsinfo.aspx", get(handlers::dynamic_forward))
            .route("/ASP/getunlocksinfo.aspx", get(handlers::dynamic_forward))
            .route("/ASP/getrankinfo.aspx", get(handlers::dynamic_forward))
            .route("/ASP/VerifyPlayer.aspx", get(handlers::verify_player))
            .route("/ASP/{*path}", any(handlers::static_forward))
            .route("/api/player/{pid}", get(handlers::get_player))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
