//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Attach the role gate to each protected route group
//! - Wire up middleware (tracing, limits, timeout, request ID, metrics)
//! - Serve until the shutdown signal fires

use std::future::Future;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Page;
use crate::http::gate::{role_gate, GateState};
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer, track_requests};
use crate::http::state::AppState;
use crate::http::websocket::events_socket;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn gated(state: &AppState, page: Page, routes: Router<AppState>) -> Router<AppState> {
    let gate = GateState {
        app: state.clone(),
        page,
    };
    routes.route_layer(middleware::from_fn_with_state(gate, role_gate))
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/wallet", get(handlers::wallet_info))
        .route("/api/wallet/connect", post(handlers::connect_wallet))
        .route("/api/wallet/disconnect", post(handlers::disconnect_wallet))
        .route("/api/session", get(handlers::session))
        .route("/api/auth/admin", post(handlers::admin_login))
        .route("/api/auth/customer", post(handlers::customer_registration))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/ws/events", get(events_socket));

    let dashboard = gated(
        &state,
        Page::Dashboard,
        Router::new()
            .route("/api/lands/mine", get(handlers::my_lands))
            .route("/api/lands/{id}", get(handlers::land_detail))
            .route("/api/lands/{id}/transfer", post(handlers::transfer_land)),
    );
    let register = gated(
        &state,
        Page::RegisterLand,
        Router::new().route("/api/lands", post(handlers::register_land)),
    );
    let owner = gated(
        &state,
        Page::LandOwner,
        Router::new().route("/api/dashboard/owner", get(handlers::owner_dashboard)),
    );
    let buyer = gated(
        &state,
        Page::Buyer,
        Router::new().route("/api/dashboard/buyer", get(handlers::buyer_dashboard)),
    );
    let seller = gated(
        &state,
        Page::Seller,
        Router::new().route("/api/dashboard/seller", get(handlers::seller_dashboard)),
    );
    let inspector = gated(
        &state,
        Page::Inspector,
        Router::new()
            .route("/api/dashboard/inspector", get(handlers::inspector_dashboard))
            .route("/api/lands/{id}/verify", post(handlers::verify_land)),
    );
    let admin = gated(
        &state,
        Page::Admin,
        Router::new()
            .route("/api/dashboard/admin", get(handlers::admin_dashboard))
            .route("/api/admin/users", get(handlers::list_users))
            .route("/api/admin/users/demo", post(handlers::seed_demo_users))
            .route("/api/admin/users/{index}/status", put(handlers::update_user_status))
            .route("/api/admin/ipfs", get(handlers::ipfs_status)),
    );

    Router::new()
        .merge(public)
        .merge(dashboard)
        .merge(register)
        .merge(owner)
        .merge(buyer)
        .merge(seller)
        .merge(inspector)
        .merge(admin)
        .with_state(state)
        .layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(set_request_id_layer())
}
