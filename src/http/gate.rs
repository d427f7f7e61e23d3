//! Role-gate middleware.
//!
//! Each protected route group carries its page; the middleware resolves the
//! connected wallet's contract role and admits or rejects the request.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::{check_access, resolve_role, Access, AuthError, Page, WalletSession};
use crate::error::ApiError;
use crate::http::state::AppState;
use crate::registry::LandService;

/// Gate configuration for one route group.
#[derive(Clone)]
pub struct GateState {
    pub app: AppState,
    pub page: Page,
}

/// The admitted caller, attached to request extensions.
#[derive(Clone)]
pub struct Caller {
    pub session: Arc<WalletSession>,
    pub role: String,
    pub lands: LandService,
}

pub async fn role_gate(State(gate): State<GateState>, mut request: Request<Body>, next: Next) -> Response {
    let Some(session) = gate.app.wallet.current() else {
        return ApiError::from(AuthError::WalletRequired).into_response();
    };
    let role = resolve_role(session.ledger.as_ref(), session.account).await;

    match check_access(gate.page, Some(&role)) {
        Access::Granted => {
            tracing::debug!(page = %gate.page, role = %role, account = %session.account, "Access granted");
            let lands = gate.app.land_service(&session);
            request.extensions_mut().insert(Caller { session, role, lands });
            next.run(request).await
        }
        Access::NoWallet => ApiError::from(AuthError::WalletRequired).into_response(),
        Access::Denied { role, required } => {
            tracing::warn!(page = %required, role = %role, account = %session.account, "Access denied");
            ApiError::Forbidden { role, required }.into_response()
        }
    }
}
