//! Ledger schema: accounts, entries and transfers.
//!
//! Postgres is the production backend. The `SQLite` variant mirrors it closely enough
//! for in-memory test databases: same tables, keys, foreign keys and checks.

use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statements = match manager.get_database_backend() {
            DbBackend::Postgres => POSTGRES_UP,
            DbBackend::Sqlite => SQLITE_UP,
            _ => return Err(unsupported()),
        };

        let db = manager.get_connection();
        for sql in statements {
            db.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !matches!(
            manager.get_database_backend(),
            DbBackend::Postgres | DbBackend::Sqlite
        ) {
            return Err(unsupported());
        }

        let db = manager.get_connection();
        for sql in DOWN {
            db.execute_unprepared(sql).await?;
        }

        Ok(())
    }
}

fn unsupported() -> DbErr {
    DbErr::Migration("the ledger schema supports Postgres and SQLite only".to_string())
}

const POSTGRES_UP: &[&str] = &[
    r"
CREATE TABLE accounts (
    id BIGSERIAL PRIMARY KEY,
    owner VARCHAR(255) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    balance BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_owner_currency UNIQUE (owner, currency)
)",
    r"CREATE INDEX idx_accounts_owner ON accounts(owner)",
    r"
CREATE TABLE entries (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES accounts(id),
    amount BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)",
    r"CREATE INDEX idx_entries_account ON entries(account_id)",
    r"
CREATE TABLE transfers (
    id BIGSERIAL PRIMARY KEY,
    from_account_id BIGINT NOT NULL REFERENCES accounts(id),
    to_account_id BIGINT NOT NULL REFERENCES accounts(id),
    amount BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_transfers_amount_positive CHECK (amount > 0)
)",
    r"CREATE INDEX idx_transfers_from ON transfers(from_account_id)",
    r"CREATE INDEX idx_transfers_to ON transfers(to_account_id)",
    r"CREATE INDEX idx_transfers_from_to ON transfers(from_account_id, to_account_id)",
];

// Timestamps are written by the application as RFC 3339 text. Foreign keys rely on the
// driver enabling `PRAGMA foreign_keys` per connection.
const SQLITE_UP: &[&str] = &[
    r"
CREATE TABLE accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    currency TEXT NOT NULL,
    balance INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,

    CONSTRAINT uq_accounts_owner_currency UNIQUE (owner, currency)
)",
    r"CREATE INDEX idx_accounts_owner ON accounts(owner)",
    r"
CREATE TABLE entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL REFERENCES accounts(id),
    amount INTEGER NOT NULL,
    created_at TEXT NOT NULL
)",
    r"CREATE INDEX idx_entries_account ON entries(account_id)",
    r"
CREATE TABLE transfers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_account_id INTEGER NOT NULL REFERENCES accounts(id),
    to_account_id INTEGER NOT NULL REFERENCES accounts(id),
    amount INTEGER NOT NULL,
    created_at TEXT NOT NULL,

    CONSTRAINT chk_transfers_amount_positive CHECK (amount > 0)
)",
    r"CREATE INDEX idx_transfers_from ON transfers(from_account_id)",
    r"CREATE INDEX idx_transfers_to ON transfers(to_account_id)",
    r"CREATE INDEX idx_transfers_from_to ON transfers(from_account_id, to_account_id)",
];

const DOWN: &[&str] = &[
    r"DROP TABLE IF EXISTS transfers",
    r"DROP TABLE IF EXISTS entries",
    r"DROP TABLE IF EXISTS accounts",
];
