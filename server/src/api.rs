//! HTTP routes and handlers.

use axum::extract::{FromRequest, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use bankledger_ledger::{AccountView, TransferReceipt};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor that reports malformed input as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Body of `POST /account`.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default)]
    pub balance: Option<f64>,
}

/// Body of the deposit and withdraw endpoints.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
}

/// Body of `POST /transfer`.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Balance summary returned by create, deposit and withdraw.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub name: String,
    pub balance: f64,
}

impl From<AccountView> for BalanceResponse {
    fn from(view: AccountView) -> Self {
        Self {
            name: view.name,
            balance: view.balance,
        }
    }
}

/// Full account returned by `GET /account/{name}`.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub name: String,
    pub balance: f64,
    pub transactions: Vec<String>,
}

/// Acknowledgement for save and load.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/account", post(create_account))
        .route("/account/:name", get(get_account))
        .route("/account/:name/deposit", post(deposit))
        .route("/account/:name/withdraw", post(withdraw))
        .route("/transfer", post(transfer))
        .route("/save", post(save))
        .route("/load", post(load))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> &'static str {
    "Welcome to the Simple Banking System API!"
}

async fn health() -> &'static str {
    "OK"
}

async fn create_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<BalanceResponse>), ApiError> {
    let view = state
        .engine()
        .create_account(&request.name, request.balance)?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

async fn get_account(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let view = state.engine().account(&name)?;
    debug!(account = %name, "Account fetched");
    Ok(Json(AccountResponse {
        name: view.name,
        balance: view.balance,
        transactions: view.transactions,
    }))
}

async fn deposit(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiJson(request): ApiJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let view = state
        .engine()
        .deposit(&name, request.amount)
        .map_err(ApiError::rejected)?;
    Ok(Json(view.into()))
}

async fn withdraw(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiJson(request): ApiJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let view = state
        .engine()
        .withdraw(&name, request.amount)
        .map_err(ApiError::rejected)?;
    Ok(Json(view.into()))
}

async fn transfer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let receipt = state
        .engine()
        .transfer(&request.from, &request.to, request.amount)
        .map_err(ApiError::rejected)?;
    Ok(Json(receipt))
}

async fn save(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let engine = state.engine().clone();
    let path = state.snapshot_path().to_path_buf();

    let count = tokio::task::spawn_blocking(move || engine.save(&path))
        .await
        .map_err(ApiError::internal)??;

    info!(accounts = count, "System state saved");
    Ok(Json(MessageResponse {
        message: "System state saved successfully".to_string(),
    }))
}

async fn load(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let engine = state.engine().clone();
    let path = state.snapshot_path().to_path_buf();

    let count = tokio::task::spawn_blocking(move || engine.load(&path))
        .await
        .map_err(ApiError::internal)??;

    info!(accounts = count, "System state loaded");
    Ok(Json(MessageResponse {
        message: "System state loaded successfully".to_string(),
    }))
}
