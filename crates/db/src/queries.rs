//! Ledger accessors over a `SeaORM` connection.
//!
//! [`Queries`] wraps anything that implements [`ConnectionTrait`]: the pooled
//! `DatabaseConnection` for standalone reads, or a `DatabaseTransaction` when the calls
//! must commit or roll back together. Each method issues a single statement.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tally_core::ledger::{Account, Entry, LedgerError, LedgerQueries, RecordKind, Transfer};
use tally_shared::types::{AccountId, EntryId, PageRequest, PageResponse, TransferId};
use tracing::debug;

use crate::entities::{accounts, entries, transfers};
use crate::error::classify;

/// Single-statement ledger accessors bound to one connection or transaction.
#[derive(Debug, Clone)]
pub struct Queries<C> {
    conn: C,
}

impl<C> Queries<C>
where
    C: ConnectionTrait,
{
    /// Binds the accessors to a connection or transaction.
    pub const fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    pub const fn connection(&self) -> &C {
        &self.conn
    }

    /// Releases the underlying connection, e.g. to commit a transaction.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Inserts an account with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns `Constraint` if the owner already has an account in this currency.
    pub async fn create_account(
        &self,
        owner: &str,
        currency: &str,
        balance: i64,
    ) -> Result<Account, LedgerError> {
        let model = accounts::ActiveModel {
            owner: Set(owner.to_string()),
            currency: Set(currency.to_string()),
            balance: Set(balance),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(classify)?;

        debug!(account_id = model.id, "Account created");
        Ok(model.into())
    }

    /// Lists accounts ordered by id, optionally restricted to one owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        owner: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<Account>, LedgerError> {
        let mut select = accounts::Entity::find();
        if let Some(owner) = owner {
            select = select.filter(accounts::Column::Owner.eq(owner));
        }

        let total = select.clone().count(&self.conn).await.map_err(classify)?;
        let rows = select
            .order_by_asc(accounts::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .map_err(classify)?;

        Ok(page_of(rows, page, total))
    }

    /// Lists the entries recorded against one account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        account_id: AccountId,
        page: PageRequest,
    ) -> Result<PageResponse<Entry>, LedgerError> {
        let select =
            entries::Entity::find().filter(entries::Column::AccountId.eq(account_id.into_inner()));

        let total = select.clone().count(&self.conn).await.map_err(classify)?;
        let rows = select
            .order_by_asc(entries::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .map_err(classify)?;

        Ok(page_of(rows, page, total))
    }

    /// Lists transfers touching an account.
    ///
    /// With only `from` (or only `to`) set, matches that side. With both set, matches
    /// transfers from `from` or to `to`. With neither, lists every transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transfers(
        &self,
        from: Option<AccountId>,
        to: Option<AccountId>,
        page: PageRequest,
    ) -> Result<PageResponse<Transfer>, LedgerError> {
        let mut select = transfers::Entity::find();
        if from.is_some() || to.is_some() {
            let condition = Condition::any()
                .add_option(from.map(|id| transfers::Column::FromAccountId.eq(id.into_inner())))
                .add_option(to.map(|id| transfers::Column::ToAccountId.eq(id.into_inner())));
            select = select.filter(condition);
        }

        let total = select.clone().count(&self.conn).await.map_err(classify)?;
        let rows = select
            .order_by_asc(transfers::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await
            .map_err(classify)?;

        Ok(page_of(rows, page, total))
    }
}

fn page_of<M, T>(rows: Vec<M>, page: PageRequest, total: u64) -> PageResponse<T>
where
    T: From<M>,
{
    PageResponse::new(
        rows.into_iter().map(T::from).collect(),
        page.page,
        page.per_page,
        total,
    )
}

#[async_trait]
impl<C> LedgerQueries for Queries<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.conn)
            .await
            .map_err(classify)?
            .map(Account::from)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    async fn get_entry(&self, id: EntryId) -> Result<Entry, LedgerError> {
        entries::Entity::find_by_id(id.into_inner())
            .one(&self.conn)
            .await
            .map_err(classify)?
            .map(Entry::from)
            .ok_or(LedgerError::NotFound {
                kind: RecordKind::Entry,
                id: id.into_inner(),
            })
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Transfer, LedgerError> {
        transfers::Entity::find_by_id(id.into_inner())
            .one(&self.conn)
            .await
            .map_err(classify)?
            .map(Transfer::from)
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
        let model = entries::ActiveModel {
            account_id: Set(account_id.into_inner()),
            amount: Set(amount),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(classify)?;

        Ok(model.into())
    }

    async fn create_transfer(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: i64,
    ) -> Result<Transfer, LedgerError> {
        let model = transfers::ActiveModel {
            from_account_id: Set(from_account_id.into_inner()),
            to_account_id: Set(to_account_id.into_inner()),
            amount: Set(amount),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(classify)?;

        Ok(model.into())
    }

    async fn add_account_balance(
        &self,
        id: AccountId,
        delta: i64,
    ) -> Result<Account, LedgerError> {
        // Read-modify-write in one statement; the row lock is held until commit.
        let updated = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .exec_with_returning(&self.conn)
            .await
            .map_err(classify)?;

        updated
            .into_iter()
            .next()
            .map(Account::from)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::new(model.id),
            owner: model.owner,
            currency: model.currency,
            balance: model.balance,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entries::Model> for Entry {
    fn from(model: entries::Model) -> Self {
        Self {
            id: EntryId::new(model.id),
            account_id: AccountId::new(model.account_id),
            amount: model.amount,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<transfers::Model> for Transfer {
    fn from(model: transfers::Model) -> Self {
        Self {
            id: TransferId::new(model.id),
            from_account_id: AccountId::new(model.from_account_id),
            to_account_id: AccountId::new(model.to_account_id),
            amount: model.amount,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
