//! Lock-ordered balance updates.
//!
//! Every balance change goes through this module. Two transfers between the same pair of
//! accounts, running in opposite directions, would each lock one row and wait for the other
//! if they updated "source first". Updating the lower account id first gives all
//! transactions the same lock order, so there is no circular wait.

use tally_shared::types::AccountId;

use super::error::LedgerError;
use super::queries::LedgerQueries;
use super::types::Account;

/// A signed change to apply to one account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceUpdate {
    /// Account to update.
    pub account_id: AccountId,
    /// Signed amount to add.
    pub delta: i64,
}

impl BalanceUpdate {
    /// Creates a balance update.
    #[must_use]
    pub const fn new(account_id: AccountId, delta: i64) -> Self {
        Self { account_id, delta }
    }

    /// Returns the pair with the lower account id first, and whether it was swapped.
    #[must_use]
    pub fn ordered(a: Self, b: Self) -> (Self, Self, bool) {
        if b.account_id < a.account_id {
            (b, a, true)
        } else {
            (a, b, false)
        }
    }
}

/// Applies two updates in the given order: `first`, then `second`.
///
/// The caller must pass the pair already sorted so that
/// `first.account_id <= second.account_id`; anything else is rejected before a statement
/// is issued. Use [`update_balances`] when the pair is in logical (source, destination)
/// order.
pub async fn apply_ordered<Q>(
    queries: &Q,
    first: BalanceUpdate,
    second: BalanceUpdate,
) -> Result<(Account, Account), LedgerError>
where
    Q: LedgerQueries + ?Sized,
{
    if first.account_id > second.account_id {
        return Err(LedgerError::UnorderedUpdate {
            first: first.account_id.into_inner(),
            second: second.account_id.into_inner(),
        });
    }

    let first_account = queries
        .add_account_balance(first.account_id, first.delta)
        .await?;
    let second_account = queries
        .add_account_balance(second.account_id, second.delta)
        .await?;

    Ok((first_account, second_account))
}

/// Applies a (source, destination) pair of updates lower-id-first.
///
/// Returns the updated accounts in the order they were passed in, whatever order the
/// statements ran in. When both updates target the same account, both sides get the row
/// as it stands after the second update.
pub async fn update_balances<Q>(
    queries: &Q,
    from: BalanceUpdate,
    to: BalanceUpdate,
) -> Result<(Account, Account), LedgerError>
where
    Q: LedgerQueries + ?Sized,
{
    let (first, second, swapped) = BalanceUpdate::ordered(from, to);
    let (first_account, second_account) = apply_ordered(queries, first, second).await?;

    if first.account_id == second.account_id {
        Ok((second_account.clone(), second_account))
    } else if swapped {
        Ok((second_account, first_account))
    } else {
        Ok((first_account, second_account))
    }
}
