//! Database migration runner for the ledger schema.
//!
//! Reads `DATABASE_URL` (Postgres or SQLite). Usage:
//!   migrator up      - Create accounts, entries and transfers
//!   migrator down    - Drop them again
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations

use sea_orm_migration::prelude::*;
use tally_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing
    cli::run_cli(Migrator).await;
}
