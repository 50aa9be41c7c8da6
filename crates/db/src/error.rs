//! Mapping from `SeaORM` errors to ledger errors.
//!
//! Driver errors are classified by their SQLSTATE (Postgres) or result code (`SQLite`).
//! Record-not-found is not decided here: the accessors know which record they looked
//! for and report it themselves.

use sea_orm::{DbErr, RuntimeErr};
use sqlx::sqlite::SqliteError;
use tally_core::ledger::LedgerError;

/// Converts a database error into the matching [`LedgerError`] kind.
#[must_use]
pub fn classify(err: DbErr) -> LedgerError {
    let class = match driver_code(&err) {
        Some(DriverCode::Postgres(code)) => classify_postgres(&code),
        Some(DriverCode::Sqlite(code)) => classify_sqlite(code),
        None if lost_connection(&err) => Some(ErrorClass::Transient),
        None => None,
    };

    match (class, err) {
        (Some(ErrorClass::Constraint), err) => LedgerError::Constraint(err.to_string()),
        (Some(ErrorClass::Transient), err)
        | (None, err @ (DbErr::ConnectionAcquire(_) | DbErr::Conn(_))) => {
            LedgerError::Transient(err.to_string())
        }
        (None, err) => LedgerError::Database(err.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorClass {
    Constraint,
    Transient,
}

#[derive(Debug, PartialEq, Eq)]
enum DriverCode {
    Postgres(String),
    Sqlite(i32),
}

/// Extracts the driver's error code, if the error came from the database itself.
fn driver_code(err: &DbErr) -> Option<DriverCode> {
    let runtime = match err {
        DbErr::Query(e) | DbErr::Exec(e) | DbErr::Conn(e) => e,
        _ => return None,
    };

    let RuntimeErr::SqlxError(sqlx_err) = runtime else {
        return None;
    };
    let db_err = sqlx_err.as_database_error()?;
    let code = db_err.code()?;

    if db_err.try_downcast_ref::<SqliteError>().is_some() {
        code.parse().ok().map(DriverCode::Sqlite)
    } else {
        Some(DriverCode::Postgres(code.into_owned()))
    }
}

/// True when the driver lost or could not reach its connection mid-statement.
fn lost_connection(err: &DbErr) -> bool {
    let (DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
    | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))
    | DbErr::Conn(RuntimeErr::SqlxError(sqlx_err))) = err
    else {
        return false;
    };

    matches!(
        sqlx_err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Classifies a Postgres SQLSTATE.
fn classify_postgres(code: &str) -> Option<ErrorClass> {
    match code {
        // serialization_failure, deadlock_detected, lock_not_available,
        // query_canceled, admin_shutdown
        "40001" | "40P01" | "55P03" | "57014" | "57P01" => Some(ErrorClass::Transient),
        // connection_exception class
        c if c.starts_with("08") => Some(ErrorClass::Transient),
        // integrity_constraint_violation class
        c if c.starts_with("23") => Some(ErrorClass::Constraint),
        _ => None,
    }
}

/// `SQLite` extended codes carry the primary code in their low byte.
fn classify_sqlite(code: i32) -> Option<ErrorClass> {
    match code & 0xff {
        // SQLITE_CONSTRAINT
        19 => Some(ErrorClass::Constraint),
        // SQLITE_BUSY, SQLITE_LOCKED
        5 | 6 => Some(ErrorClass::Transient),
        _ => None,
    }
}
