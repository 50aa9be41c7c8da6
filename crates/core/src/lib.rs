//! Core ledger logic for Tally.
//!
//! This crate contains the transfer engine with ZERO web or database dependencies.
//! Persistence is reached only through the [`ledger::LedgerQueries`] trait, which the
//! `tally-db` crate implements on top of a database transaction.
//!
//! # Modules
//!
//! - `ledger` - Accounts, entries, transfers and the double-entry transfer flow

pub mod ledger;
