//! Account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tally_core::ledger::{Account, Entry, LedgerQueries};
use tally_shared::AppError;
use tally_shared::types::{AccountId, Currency, PageRequest, PageResponse};
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/entries", get(list_entries))
}

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account owner.
    pub owner: String,
    /// Currency code: USD, EUR or CAD.
    pub currency: String,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Only list this owner's accounts.
    pub owner: Option<String>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// POST `/accounts` - Open an account with a zero balance.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let owner = payload.owner.trim();
    if owner.is_empty() {
        return Err(AppError::Validation("owner must not be empty".to_string()).into());
    }

    let currency = parse_currency(&payload.currency)?;

    let account = state
        .store
        .queries()
        .create_account(owner, currency.code(), 0)
        .await?;

    info!(account_id = %account.id, owner = %account.owner, currency = %currency, "Account opened");

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts` - List accounts, optionally for one owner.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<PageResponse<Account>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.per_page.unwrap_or(defaults.per_page),
    );

    let accounts = state
        .store
        .queries()
        .list_accounts(query.owner.as_deref(), page)
        .await?;

    Ok(Json(accounts))
}

/// GET `/accounts/{account_id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, ApiError> {
    let account = state.store.queries().get_account(account_id).await?;
    Ok(Json(account))
}

/// GET `/accounts/{account_id}/entries` - List an account's entries, oldest first.
async fn list_entries(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<Entry>>, ApiError> {
    let queries = state.store.queries();

    // 404 for an unknown account rather than an empty page.
    queries.get_account(account_id).await?;

    let entries = queries
        .list_entries(account_id, PageRequest::new(page.page, page.per_page))
        .await?;

    Ok(Json(entries))
}

/// Parses a supported currency code.
pub(crate) fn parse_currency(code: &str) -> Result<Currency, AppError> {
    Currency::parse(code)
        .ok_or_else(|| AppError::Validation(format!("Unsupported currency '{code}'")))
}
