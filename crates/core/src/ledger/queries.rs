//! Accessor contract the transfer flow runs against.

use async_trait::async_trait;
use tally_shared::types::{AccountId, EntryId, TransferId};

use super::error::LedgerError;
use super::types::{Account, Entry, Transfer};

/// Single-statement ledger accessors.
///
/// Each method is one parameterized statement with no composition logic. An implementation
/// bound to a database transaction makes every call part of that transaction.
///
/// `add_account_balance` must only be reached through
/// [`apply_ordered`](super::balance::apply_ordered); calling it directly skips the lock
/// ordering that keeps concurrent transfers from deadlocking.
#[async_trait]
pub trait LedgerQueries: Send + Sync {
    /// Fetches an account, or `NotFound`.
    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Fetches an entry, or `NotFound`.
    async fn get_entry(&self, id: EntryId) -> Result<Entry, LedgerError>;

    /// Fetches a transfer, or `NotFound`.
    async fn get_transfer(&self, id: TransferId) -> Result<Transfer, LedgerError>;

    /// Inserts an entry and returns the stored row.
    async fn create_entry(&self, account_id: AccountId, amount: i64)
    -> Result<Entry, LedgerError>;

    /// Inserts a transfer and returns the stored row.
    async fn create_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: i64,
    ) -> Result<Transfer, LedgerError>;

    /// Adds `delta` to the balance in one statement and returns the updated row.
    async fn add_account_balance(&self, id: AccountId, delta: i64)
    -> Result<Account, LedgerError>;
}
