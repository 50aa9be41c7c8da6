//! `SeaORM` entity definitions for the ledger tables.

pub mod accounts;
pub mod entries;
pub mod transfers;

/// Entity aliases for glob import.
pub mod prelude {
    pub use super::accounts::Entity as Accounts;
    pub use super::entries::Entity as Entries;
    pub use super::transfers::Entity as Transfers;
}
