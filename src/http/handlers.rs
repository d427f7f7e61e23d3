//! Gateway request handlers.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{credentials, register_customer, resolve_role, CustomerRegistration, UserStatus};
use crate::error::{ApiError, ApiResult};
use crate::http::gate::Caller;
use crate::http::multipart::{land_form, read_multipart};
use crate::http::state::AppState;
use crate::registry::{dashboard, LandRecord};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "walletConnected": state.wallet.is_connected(),
    }))
}

// Wallet

#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub dev_account: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

pub async fn wallet_info(State(state): State<AppState>) -> Json<WalletInfo> {
    let info = match state.wallet.current() {
        Some(session) => WalletInfo {
            connected: true,
            account: Some(session.account.to_string()),
            chain_id: Some(session.chain_id),
            role: Some(resolve_role(session.ledger.as_ref(), session.account).await),
        },
        None => WalletInfo {
            connected: false,
            account: None,
            chain_id: None,
            role: None,
        },
    };
    Json(info)
}

/// Body is optional; `{"dev_account": n}` selects a development account.
pub async fn connect_wallet(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<WalletInfo>> {
    let request: ConnectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ConnectRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?
    };

    let session = state
        .wallet
        .connect(state.connector.as_ref(), request.dev_account)
        .await?;
    let role = resolve_role(session.ledger.as_ref(), session.account).await;
    Ok(Json(WalletInfo {
        connected: true,
        account: Some(session.account.to_string()),
        chain_id: Some(session.chain_id),
        role: Some(role),
    }))
}

pub async fn disconnect_wallet(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.wallet.disconnect()?;
    Ok(StatusCode::NO_CONTENT)
}

// Sessions

pub async fn session(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "authenticated": state.sessions.is_authenticated(),
        "user": state.sessions.current_user(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConsoleLogin {
    pub id: String,
    pub password: String,
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(login): Json<ConsoleLogin>,
) -> ApiResult<impl IntoResponse> {
    let session = credentials::login(&state.config.auth, &login.id, &login.password)?;
    state.sessions.set_user_session(&session)?;
    Ok(Json(session))
}

pub async fn customer_registration(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = CustomerRegistration::from(read_multipart(multipart).await?);
    let session = register_customer(
        form,
        state.wallet.account(),
        &state.uploads,
        &state.sessions,
        &state.users,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn logout(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.sessions.clear_session()?;
    Ok(StatusCode::NO_CONTENT)
}

// Lands

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandDetail {
    #[serde(flatten)]
    pub land: LandRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

pub async fn my_lands(Extension(caller): Extension<Caller>) -> Json<Vec<LandRecord>> {
    Json(caller.lands.owned().await)
}

pub async fn land_detail(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(land_id): Path<u64>,
) -> ApiResult<Json<LandDetail>> {
    let land = caller.lands.land(land_id).await?;
    let document_url = (!land.document_cid.is_empty()).then(|| state.uploads.gateway_url(&land.document_cid));
    Ok(Json(LandDetail { land, document_url }))
}

pub async fn register_land(
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let draft = land_form(read_multipart(multipart).await?)?
        .validate()
        .map_err(ApiError::Validation)?;
    let registered = caller.lands.register(draft).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub new_owner: String,
}

pub async fn transfer_land(
    Extension(caller): Extension<Caller>,
    Path(land_id): Path<u64>,
    Json(request): Json<TransferRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(caller.lands.transfer(land_id, &request.new_owner).await?))
}

pub async fn verify_land(
    Extension(caller): Extension<Caller>,
    Path(land_id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(caller.lands.verify(land_id).await?))
}

// Dashboards

pub async fn owner_dashboard(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(dashboard::owner_dashboard(&caller.lands).await)
}

pub async fn seller_dashboard(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(dashboard::seller_dashboard(&caller.lands).await)
}

pub async fn buyer_dashboard(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(dashboard::buyer_dashboard(&caller.lands).await)
}

pub async fn admin_dashboard(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(dashboard::admin_dashboard(&caller.lands, state.users.list().len()).await)
}

pub async fn inspector_dashboard(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(dashboard::inspector_dashboard(&caller.lands).await)
}

// Admin console

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.users.list())
}

pub async fn seed_demo_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.users.seed_demo_users()?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_user_status(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<impl IntoResponse> {
    let status: UserStatus = update.status.parse()?;
    Ok(Json(state.users.update_status(index, status)?))
}

pub async fn ipfs_status(State(state): State<AppState>) -> impl IntoResponse {
    let (authenticated, message) = match state.uploads.pinning().test_authentication().await {
        Ok(message) => (true, message),
        Err(e) => (false, e.to_string()),
    };
    Json(json!({
        "authenticated": authenticated,
        "message": message,
        "cacheEntries": state.uploads.cache().len(),
        "cacheCapacity": state.config.ipfs.cache_capacity,
    }))
}
