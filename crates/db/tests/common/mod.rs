//! Shared setup for the database integration tests.

#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tally_core::ledger::Account;
use tally_db::Store;
use tally_db::entities::{entries, transfers};
use tally_db::migration::{Migrator, MigratorTrait};

/// Opens a fresh in-memory `SQLite` database with the ledger schema applied.
///
/// The pool holds a single connection: an in-memory database lives and dies with its
/// connection, and concurrent callers simply queue for it.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn memory_store() -> Store {
    Store::new(memory_db().await)
}

pub async fn create_account(store: &Store, owner: &str, balance: i64) -> Account {
    store
        .queries()
        .create_account(owner, "USD", balance)
        .await
        .expect("Failed to create account")
}

pub async fn transfer_count(store: &Store) -> u64 {
    transfers::Entity::find()
        .count(store.connection())
        .await
        .expect("Failed to count transfers")
}

pub async fn entry_count(store: &Store) -> u64 {
    entries::Entity::find()
        .count(store.connection())
        .await
        .expect("Failed to count entries")
}
