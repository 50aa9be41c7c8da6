//! In-memory accessors that record every call, for exercising the transfer flow.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tally_shared::types::{AccountId, EntryId, TransferId};

use super::error::{LedgerError, RecordKind};
use super::queries::LedgerQueries;
use super::types::{Account, Entry, Transfer};

/// One accessor call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateTransfer(AccountId, AccountId, i64),
    CreateEntry(AccountId, i64),
    AddBalance(AccountId, i64),
}

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    entries: Vec<Entry>,
    transfers: Vec<Transfer>,
    calls: Vec<Call>,
}

pub(crate) struct MemoryLedger {
    state: Mutex<State>,
    failure: Mutex<Option<(usize, LedgerError)>>,
}

impl MemoryLedger {
    pub(crate) fn with_accounts(accounts: &[(i64, i64)]) -> Self {
        let now = Utc::now();
        let accounts = accounts
            .iter()
            .map(|&(id, balance)| {
                let id = AccountId::new(id);
                let account = Account {
                    id,
                    owner: format!("owner-{id}"),
                    currency: "USD".to_string(),
                    balance,
                    created_at: now,
                };
                (id, account)
            })
            .collect();

        Self {
            state: Mutex::new(State {
                accounts,
                ..State::default()
            }),
            failure: Mutex::new(None),
        }
    }

    /// Makes the write call at `index` (0-based) fail with `err`.
    pub(crate) fn failing_at(self, index: usize, err: LedgerError) -> Self {
        *self.failure.lock().unwrap() = Some((index, err));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn balance(&self, id: AccountId) -> i64 {
        self.state.lock().unwrap().accounts[&id].balance
    }

    pub(crate) fn total_balance(&self) -> i64 {
        self.state
            .lock()
            .unwrap()
            .accounts
            .values()
            .map(|a| a.balance)
            .sum()
    }

    /// Records the call and returns the injected failure if this is its turn.
    fn record(&self, state: &mut State, call: Call) -> Result<(), LedgerError> {
        state.calls.push(call);
        let index = state.calls.len() - 1;
        let mut failure = self.failure.lock().unwrap();
        match failure.take() {
            Some((at, err)) if at == index => Err(err),
            pending => {
                *failure = pending;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl LedgerQueries for MemoryLedger {
    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    async fn get_entry(&self, id: EntryId) -> Result<Entry, LedgerError> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Entry,
                id: id.into_inner(),
            })
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Transfer, LedgerError> {
        self.state
            .lock()
            .unwrap()
            .transfers
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Transfer,
                id: id.into_inner(),
            })
    }

    async fn create_entry(
        &self,
        account_id: AccountId,
        amount: i64,
    ) -> Result<Entry, LedgerError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::CreateEntry(account_id, amount))?;
        let entry = Entry {
            id: EntryId::new(state.entries.len() as i64 + 1),
            account_id,
            amount,
            created_at: Utc::now(),
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn create_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: i64,
    ) -> Result<Transfer, LedgerError> {
        let mut state = self.state.lock().unwrap();
        self.record(
            &mut state,
            Call::CreateTransfer(from_account_id, to_account_id, amount),
        )?;
        let transfer = Transfer {
            id: TransferId::new(state.transfers.len() as i64 + 1),
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now(),
        };
        state.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn add_account_balance(
        &self,
        id: AccountId,
        delta: i64,
    ) -> Result<Account, LedgerError> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, Call::AddBalance(id, delta))?;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;
        account.balance += delta;
        Ok(account.clone())
    }
}
