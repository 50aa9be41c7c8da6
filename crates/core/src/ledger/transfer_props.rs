//! Property-based tests for the transfer flow.
//!
//! Covers lock ordering, entry shape and balance conservation over arbitrary account
//! pairs and sequences of transfers.

use futures::executor::block_on;
use proptest::prelude::*;
use tally_shared::types::AccountId;

use super::memory::{Call, MemoryLedger};
use super::transfer::execute_transfer;
use super::types::TransferRequest;

/// Strategy for a positive transfer amount in cents.
fn amount_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

/// Strategy for two distinct account ids.
fn account_pair_strategy() -> impl Strategy<Value = (i64, i64)> {
    (1i64..500, 1i64..500).prop_filter("accounts must differ", |(a, b)| a != b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever the direction, the lower account id's balance is updated first.
    #[test]
    fn prop_lower_account_updated_first(
        (from, to) in account_pair_strategy(),
        amount in amount_strategy(),
    ) {
        let ledger = MemoryLedger::with_accounts(&[(from, 0), (to, 0)]);
        let request = TransferRequest::new(AccountId::new(from), AccountId::new(to), amount);

        block_on(execute_transfer(&ledger, &request)).unwrap();

        let updates: Vec<AccountId> = ledger
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddBalance(id, _) => Some(id),
                _ => None,
            })
            .collect();

        prop_assert_eq!(
            updates,
            vec![AccountId::new(from.min(to)), AccountId::new(from.max(to))]
        );
    }

    /// Every transfer produces one debit and one credit of the same size.
    #[test]
    fn prop_entries_offset_each_other(
        (from, to) in account_pair_strategy(),
        amount in amount_strategy(),
    ) {
        let ledger = MemoryLedger::with_accounts(&[(from, 10_000), (to, 10_000)]);
        let request = TransferRequest::new(AccountId::new(from), AccountId::new(to), amount);

        let result = block_on(execute_transfer(&ledger, &request)).unwrap();

        prop_assert_eq!(result.from_entry.account_id, AccountId::new(from));
        prop_assert_eq!(result.to_entry.account_id, AccountId::new(to));
        prop_assert_eq!(result.from_entry.amount, -amount);
        prop_assert_eq!(result.to_entry.amount, amount);
        prop_assert_eq!(result.from_entry.amount + result.to_entry.amount, 0);
    }

    /// Any mix of directions between two accounts conserves their combined balance.
    #[test]
    fn prop_balance_conserved(
        directions in prop::collection::vec(any::<bool>(), 1..50),
        amount in amount_strategy(),
    ) {
        let ledger = MemoryLedger::with_accounts(&[(1, 1_000), (2, 500)]);
        let before = ledger.total_balance();

        let mut net_to_second = 0i64;
        for forward in &directions {
            let (from, to) = if *forward { (1, 2) } else { (2, 1) };
            let request = TransferRequest::new(AccountId::new(from), AccountId::new(to), amount);
            block_on(execute_transfer(&ledger, &request)).unwrap();
            net_to_second += if *forward { amount } else { -amount };
        }

        prop_assert_eq!(ledger.total_balance(), before);
        prop_assert_eq!(ledger.balance(AccountId::new(2)), 500 + net_to_second);
    }
}
