use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use common::types::{
    AccountResponse, AmountRequest, BalanceResponse, LookupRequest, LookupResponse, TransactionResponse,
};
use service::{accounts::AccountService, errors::ServiceError};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts: Arc::new(accounts) }
    }
}

// Bodies are taken as raw bytes and parsed leniently: a broken body must not
// be reported before the account itself has been looked up.
fn lenient_json<T: serde::de::DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// `POST /accounts`: confirm an account exists and point at its page.
pub async fn find_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LookupResponse>, ApiError> {
    let req: LookupRequest = lenient_json(&body);
    let account_number = req
        .account_number
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or(ServiceError::NotFound)?;

    state.accounts.lookup(account_number).await?;
    Ok(Json(LookupResponse {
        message: "Account found".to_string(),
        redirect_url: format!("/accounts/{account_number}"),
    }))
}

pub async fn account_page(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    state.accounts.lookup(&account_number).await?;
    Ok(Json(AccountResponse { account_number }))
}

pub async fn balance(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.accounts.balance(&account_number).await?;
    Ok(Json(BalanceResponse { account_number, balance }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    body: Bytes,
) -> Result<Json<TransactionResponse>, ApiError> {
    let req: AmountRequest = lenient_json(&body);
    let new_balance = state.accounts.withdraw(&account_number, req.amount.as_ref()).await?;
    Ok(Json(TransactionResponse { message: "Withdraw successful".to_string(), new_balance }))
}

pub async fn deposit(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    body: Bytes,
) -> Result<Json<TransactionResponse>, ApiError> {
    let req: AmountRequest = lenient_json(&body);
    let new_balance = state.accounts.deposit(&account_number, req.amount.as_ref()).await?;
    Ok(Json(TransactionResponse { message: "Deposit successful".to_string(), new_balance }))
}
