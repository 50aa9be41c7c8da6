//! Transfer orchestration.
//!
//! [`execute_transfer`] performs the five dependent writes of a transfer. It must run
//! against accessors bound to a single database transaction so that either all five
//! writes commit together or none of them do; the `tally-db` store takes care of that.

use tracing::debug;

use super::balance::{BalanceUpdate, update_balances};
use super::error::LedgerError;
use super::queries::LedgerQueries;
use super::types::{TransferRequest, TransferResult};

/// Runs a transfer against transaction-scoped accessors.
///
/// Steps, each aborting on failure:
/// 1. Insert the transfer record
/// 2. Insert the debit entry on the source account (`-amount`)
/// 3. Insert the credit entry on the destination account (`+amount`)
/// 4. Apply both balance deltas, lower account id first
///
/// The result is assembled from the rows the database returned.
pub async fn execute_transfer<Q>(
    queries: &Q,
    request: &TransferRequest,
) -> Result<TransferResult, LedgerError>
where
    Q: LedgerQueries + ?Sized,
{
    request.validate()?;

    let TransferRequest {
        from_account_id,
        to_account_id,
        amount,
    } = *request;

    let transfer = queries
        .create_transfer(from_account_id, to_account_id, amount)
        .await?;

    let from_entry = queries.create_entry(from_account_id, -amount).await?;
    let to_entry = queries.create_entry(to_account_id, amount).await?;

    let (from_account, to_account) = update_balances(
        queries,
        BalanceUpdate::new(from_account_id, -amount),
        BalanceUpdate::new(to_account_id, amount),
    )
    .await?;

    debug!(
        transfer_id = %transfer.id,
        from_balance = from_account.balance,
        to_balance = to_account.balance,
        "Transfer writes applied"
    );

    Ok(TransferResult {
        transfer,
        from_entry,
        to_entry,
        from_account,
        to_account,
    })
}
