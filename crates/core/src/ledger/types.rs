//! Domain records for the ledger.
//!
//! Accounts are created outside the transfer flow and only ever change in balance.
//! Entries and transfers are append-only: created once per transfer, never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, EntryId, TransferId};

use super::error::LedgerError;

/// An account holding a balance in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Database-assigned identifier.
    pub id: AccountId,
    /// Account owner.
    pub owner: String,
    /// ISO currency code.
    pub currency: String,
    /// Balance in the currency's smallest unit.
    pub balance: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One side of a transfer as recorded against a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Database-assigned identifier.
    pub id: EntryId,
    /// The account this entry belongs to.
    pub account_id: AccountId,
    /// Signed amount: negative for a debit, positive for a credit.
    pub amount: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A record of money moving from one account to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Database-assigned identifier.
    pub id: TransferId,
    /// Source account.
    pub from_account_id: AccountId,
    /// Destination account.
    pub to_account_id: AccountId,
    /// Amount moved, always positive.
    pub amount: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account to debit.
    pub from_account_id: AccountId,
    /// Account to credit.
    pub to_account_id: AccountId,
    /// Amount in the smallest currency unit.
    pub amount: i64,
}

impl TransferRequest {
    /// Creates a transfer request.
    #[must_use]
    pub const fn new(from_account_id: AccountId, to_account_id: AccountId, amount: i64) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
        }
    }

    /// Checks the request before anything is written.
    ///
    /// Only the amount is checked. A transfer from an account to itself is accepted.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount <= 0 {
            return Err(LedgerError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

/// Everything a committed transfer wrote, as returned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    /// The transfer record.
    pub transfer: Transfer,
    /// Debit entry on the source account.
    pub from_entry: Entry,
    /// Credit entry on the destination account.
    pub to_entry: Entry,
    /// Source account after the debit.
    pub from_account: Account,
    /// Destination account after the credit.
    pub to_account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(100)]
    #[case(i64::MAX)]
    fn test_validate_accepts_positive_amounts(#[case] amount: i64) {
        let request = TransferRequest::new(AccountId::new(1), AccountId::new(2), amount);
        assert!(request.validate().is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_validate_rejects_non_positive_amounts(#[case] amount: i64) {
        let request = TransferRequest::new(AccountId::new(1), AccountId::new(2), amount);
        assert!(matches!(
            request.validate(),
            Err(LedgerError::InvalidAmount(a)) if a == amount
        ));
    }

    #[test]
    fn test_validate_allows_self_transfer() {
        let request = TransferRequest::new(AccountId::new(3), AccountId::new(3), 10);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_transfer_request_deserializes_from_snake_case() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"from_account_id":1,"to_account_id":2,"amount":100}"#)
                .unwrap();
        assert_eq!(
            request,
            TransferRequest::new(AccountId::new(1), AccountId::new(2), 100)
        );
    }
}
