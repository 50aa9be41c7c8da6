//! Database layer with `SeaORM` entities, ledger queries and the transaction store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for accounts, entries and transfers
//! - [`Queries`], the single-statement ledger accessors
//! - [`Store`], which runs units of work and transfers inside one transaction
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod queries;
pub mod store;

pub use error::classify;
pub use queries::Queries;
pub use store::{Store, TxQueries};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_shared::DatabaseConfig;

/// Establishes a connection to the database with default pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection pool sized and timed from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    Database::connect(options).await
}
