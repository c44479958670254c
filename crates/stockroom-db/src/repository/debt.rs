//! # Debt Repository
//!
//! Amounts owed, listed by due date. Debts are deactivated, never deleted.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use stockroom_core::forms::DebtDraft;
use stockroom_core::{Debt, DebtFilter};
use tracing::debug;

use super::like;
use crate::error::{DbError, DbResult};

const SELECT_DEBT: &str = "SELECT id, name, amount_cents, due_date, status,
        created_at, updated_at, is_active
     FROM debts";

#[derive(Debug, Clone)]
pub struct DebtRepository {
    pool: SqlitePool,
}

impl DebtRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DebtRepository { pool }
    }

    /// Lists debts matching the filter, ordered by due date.
    ///
    /// ## Filter
    /// - `search` matches name or status
    /// - `due_date` is an exact match
    /// - `active` restricts on the active flag
    pub async fn list(&self, filter: &DebtFilter) -> DbResult<Vec<Debt>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_DEBT);

        let term = like(&filter.search);
        query
            .push(" WHERE (name LIKE ")
            .push_bind(term.clone())
            .push(" OR status LIKE ")
            .push_bind(term)
            .push(")");

        if let Some(due_date) = filter.due_date {
            query.push(" AND due_date = ").push_bind(due_date);
        }
        if let Some(active) = filter.active.as_flag() {
            query.push(" AND is_active = ").push_bind(active);
        }

        query.push(" ORDER BY due_date, id");

        let debts = query.build_query_as::<Debt>().fetch_all(&self.pool).await?;
        Ok(debts)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Debt>> {
        let debt = sqlx::query_as::<_, Debt>(&format!("{SELECT_DEBT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(debt)
    }

    pub async fn insert(&self, draft: &DebtDraft) -> DbResult<Debt> {
        debug!(name = %draft.name, due_date = %draft.due_date, "Inserting debt");

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO debts (name, amount_cents, due_date, status, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(&draft.name)
        .bind(draft.amount.cents())
        .bind(draft.due_date)
        .bind(&draft.status)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Debt", id))
    }

    pub async fn update(&self, id: i64, draft: &DebtDraft) -> DbResult<Debt> {
        debug!(id = %id, status = %draft.status, "Updating debt");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE debts SET
                name = ?2, amount_cents = ?3, due_date = ?4, status = ?5,
                is_active = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.amount.cents())
        .bind(draft.due_date)
        .bind(&draft.status)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Debt", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Debt", id))
    }
}
