//! Transfer routes.
//!
//! A transfer request names a currency. Both accounts must exist and be held in that
//! currency before the transfer is attempted.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tally_core::ledger::{LedgerQueries, Transfer, TransferRequest, TransferResult};
use tally_shared::AppError;
use tally_shared::types::{AccountId, Currency, PageRequest, PageResponse, TransferId};

use super::accounts::parse_currency;
use crate::{AppState, error::ApiError};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/{transfer_id}", get(get_transfer))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Account to debit.
    pub from_account_id: AccountId,
    /// Account to credit.
    pub to_account_id: AccountId,
    /// Amount in the smallest currency unit; must be positive.
    pub amount: i64,
    /// Currency both accounts must be held in.
    pub currency: String,
}

/// Query parameters for listing transfers.
#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    /// Transfers out of this account.
    pub from_account_id: Option<AccountId>,
    /// Transfers into this account.
    pub to_account_id: Option<AccountId>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// POST `/transfers` - Move money between two accounts.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<TransferResult>), ApiError> {
    let currency = parse_currency(&payload.currency)?;

    let request = TransferRequest::new(
        payload.from_account_id,
        payload.to_account_id,
        payload.amount,
    );
    request.validate()?;

    let queries = state.store.queries();
    check_account_currency(queries, request.from_account_id, currency).await?;
    check_account_currency(queries, request.to_account_id, currency).await?;

    let result = state.store.transfer_tx(request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET `/transfers` - List transfers out of and/or into an account.
async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<ListTransfersQuery>,
) -> Result<Json<PageResponse<Transfer>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.per_page.unwrap_or(defaults.per_page),
    );

    let transfers = state
        .store
        .queries()
        .list_transfers(query.from_account_id, query.to_account_id, page)
        .await?;

    Ok(Json(transfers))
}

/// GET `/transfers/{transfer_id}` - Fetch one transfer.
async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
) -> Result<Json<Transfer>, ApiError> {
    let transfer = state.store.queries().get_transfer(transfer_id).await?;
    Ok(Json(transfer))
}

/// Fails with 404 if the account is missing, 400 if it is held in another currency.
async fn check_account_currency<Q>(
    queries: &Q,
    account_id: AccountId,
    currency: Currency,
) -> Result<(), ApiError>
where
    Q: LedgerQueries + ?Sized,
{
    let account = queries.get_account(account_id).await?;
    if account.currency != currency.code() {
        return Err(AppError::Validation(format!(
            "Account {account_id} currency mismatch: {} vs {currency}",
            account.currency
        ))
        .into());
    }
    Ok(())
}
