//! Unit-of-work executor and the transfer entry point.
//!
//! [`Store::exec_tx`] opens a transaction, hands the work a [`Queries`] bound to it, and
//! commits on success or rolls back on failure. A failed rollback never hides the error
//! that caused it: both are reported through [`LedgerError::Rollback`].

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tally_core::ledger::{LedgerError, TransferRequest, TransferResult, execute_transfer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::classify;
use crate::queries::Queries;

/// Accessors bound to an open transaction.
pub type TxQueries = Queries<DatabaseTransaction>;

/// Entry point for ledger reads and atomic ledger writes.
#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
    queries: Queries<DatabaseConnection>,
}

impl Store {
    /// Creates a store over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            queries: Queries::new(db.clone()),
            db,
        }
    }

    /// Accessors that run each statement on its own, outside any transaction.
    #[must_use]
    pub const fn queries(&self) -> &Queries<DatabaseConnection> {
        &self.queries
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs `work` inside one database transaction.
    ///
    /// Every accessor call the work makes through the provided [`TxQueries`] belongs to
    /// the same transaction. The transaction is committed if the work succeeds and rolled
    /// back otherwise.
    ///
    /// # Errors
    ///
    /// - The work's own error, unchanged, after a successful rollback
    /// - [`LedgerError::Rollback`] carrying the work's error if the rollback also failed
    /// - A classified database error if the transaction cannot begin or commit
    pub async fn exec_tx<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c TxQueries) -> BoxFuture<'c, Result<T, LedgerError>> + Send,
    {
        let txn = self.db.begin().await.map_err(classify)?;
        let queries = Queries::new(txn);

        let outcome = work(&queries).await;

        finish(queries.into_inner(), outcome).await
    }

    /// Like [`exec_tx`](Self::exec_tx), but abandons the work when `cancel` fires.
    ///
    /// On cancellation the in-flight statement is dropped and the transaction is rolled
    /// back. If the token is already cancelled, no statement is issued.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Cancelled`] on cancellation, otherwise as `exec_tx`.
    pub async fn exec_tx_cancellable<T, F>(
        &self,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<T, LedgerError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c TxQueries) -> BoxFuture<'c, Result<T, LedgerError>> + Send,
    {
        if cancel.is_cancelled() {
            return Err(LedgerError::Cancelled);
        }

        let txn = self.db.begin().await.map_err(classify)?;
        let queries = Queries::new(txn);

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(LedgerError::Cancelled),
            result = work(&queries) => result,
        };

        finish(queries.into_inner(), outcome).await
    }

    /// Moves `amount` from one account to another as a single atomic unit.
    ///
    /// Creates the transfer record, the debit and credit entries, and applies both balance
    /// changes (lower account id first). Either all five writes commit or none do.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive; nothing is written
    /// - `Constraint` if either account does not exist
    /// - `Transient` on serialization failures or deadlocks; safe to retry
    /// - Any other error from the failing step, after rollback
    pub async fn transfer_tx(&self, request: TransferRequest) -> Result<TransferResult, LedgerError> {
        let result = self
            .exec_tx(move |queries| Box::pin(async move { execute_transfer(queries, &request).await }))
            .await;

        log_transfer(&request, &result);
        result
    }

    /// Like [`transfer_tx`](Self::transfer_tx), rolled back if `cancel` fires first.
    ///
    /// # Errors
    ///
    /// As `transfer_tx`, plus [`LedgerError::Cancelled`].
    pub async fn transfer_tx_cancellable(
        &self,
        cancel: &CancellationToken,
        request: TransferRequest,
    ) -> Result<TransferResult, LedgerError> {
        let result = self
            .exec_tx_cancellable(cancel, move |queries| {
                Box::pin(async move { execute_transfer(queries, &request).await })
            })
            .await;

        log_transfer(&request, &result);
        result
    }
}

fn log_transfer(request: &TransferRequest, result: &Result<TransferResult, LedgerError>) {
    match result {
        Ok(done) => info!(
            transfer_id = %done.transfer.id,
            from_account_id = %request.from_account_id,
            to_account_id = %request.to_account_id,
            amount = request.amount,
            "Transfer committed"
        ),
        Err(e) => warn!(
            from_account_id = %request.from_account_id,
            to_account_id = %request.to_account_id,
            amount = request.amount,
            code = e.error_code(),
            error = %e,
            "Transfer failed"
        ),
    }
}

/// End of a transaction's life: commit or roll back.
#[async_trait]
trait Completion: Send + Sized {
    async fn commit(self) -> Result<(), DbErr>;
    async fn rollback(self) -> Result<(), DbErr>;
}

#[async_trait]
impl Completion for DatabaseTransaction {
    async fn commit(self) -> Result<(), DbErr> {
        Self::commit(self).await
    }

    async fn rollback(self) -> Result<(), DbErr> {
        Self::rollback(self).await
    }
}

/// Commits on success; rolls back on failure and keeps the failure as the primary error.
async fn finish<X, T>(txn: X, outcome: Result<T, LedgerError>) -> Result<T, LedgerError>
where
    X: Completion,
{
    match outcome {
        Ok(value) => {
            txn.commit().await.map_err(classify)?;
            Ok(value)
        }
        Err(err) => match txn.rollback().await {
            Ok(()) => {
                debug!(error = %err, "Transaction rolled back");
                Err(err)
            }
            Err(rollback_err) => {
                error!(
                    error = %err,
                    rollback_error = %rollback_err,
                    "Rollback failed after transaction error"
                );
                Err(LedgerError::Rollback {
                    source: Box::new(err),
                    rollback: rollback_err.to_string(),
                })
            }
        },
    }
}
