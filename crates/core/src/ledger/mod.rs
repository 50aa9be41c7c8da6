//! Double-entry transfer logic.
//!
//! This module implements the core ledger functionality:
//! - Domain records (accounts, entries, transfers)
//! - The accessor contract the transfer flow runs against
//! - Lock-ordered balance updates
//! - The transfer orchestration itself
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod queries;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod memory;
#[cfg(test)]
mod transfer_props;

pub use balance::{BalanceUpdate, apply_ordered, update_balances};
pub use error::{LedgerError, RecordKind};
pub use queries::LedgerQueries;
pub use transfer::execute_transfer;
pub use types::{Account, Entry, Transfer, TransferRequest, TransferResult};
