//! # Expense Repository
//!
//! Expenses are booked against a department named on the form.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::ExpenseDraft;
use stockroom_core::Expense;
use tracing::debug;

use super::{like, NameLookup};
use crate::error::{DbError, DbResult};

const SELECT_EXPENSE: &str = "
    SELECT
        e.id,
        e.date,
        e.department_id,
        d.name AS department_name,
        e.description,
        e.amount_cents,
        e.created_at,
        e.updated_at,
        e.is_active
    FROM expenses e
    LEFT JOIN departments d ON d.id = e.department_id";

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists expenses whose date or description contains `search`, by id.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "{SELECT_EXPENSE} WHERE e.date LIKE ?1 OR e.description LIKE ?1 ORDER BY e.id"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!("{SELECT_EXPENSE} WHERE e.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(expense)
    }

    /// Inserts a new expense.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No active department with that name
    pub async fn insert(&self, draft: &ExpenseDraft) -> DbResult<Expense> {
        debug!(date = %draft.date, amount = %draft.amount, "Inserting expense");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let department_id = NameLookup::Department.resolve(&mut tx, &draft.department).await?;

        let id = sqlx::query(
            "INSERT INTO expenses (
                date, department_id, description, amount_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(draft.date)
        .bind(department_id)
        .bind(&draft.description)
        .bind(draft.amount.cents())
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", id))
    }

    pub async fn update(&self, id: i64, draft: &ExpenseDraft) -> DbResult<Expense> {
        debug!(id = %id, "Updating expense");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let department_id = NameLookup::Department.resolve(&mut tx, &draft.department).await?;

        let result = sqlx::query(
            "UPDATE expenses SET
                date = ?2, department_id = ?3, description = ?4, amount_cents = ?5,
                is_active = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(id)
        .bind(draft.date)
        .bind(department_id)
        .bind(&draft.description)
        .bind(draft.amount.cents())
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::{ExpenseForm, NameForm};

    fn rent() -> ExpenseForm {
        ExpenseForm {
            date: "2024-03-01".into(),
            department: "Operations".into(),
            description: "March rent".into(),
            amount: "500.00".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_expense_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.departments()
            .insert(&NameForm::new("Operations").validate().unwrap())
            .await
            .unwrap();
        let repo = db.expenses();

        let created = repo.insert(&rent().validate().unwrap()).await.unwrap();
        assert_eq!(created.department_name.as_deref(), Some("Operations"));
        assert_eq!(created.amount().cents(), 50_000);

        // date and description are both searchable
        assert_eq!(repo.list("2024-03").await.unwrap().len(), 1);
        assert_eq!(repo.list("rent").await.unwrap().len(), 1);
        assert!(repo.list("payroll").await.unwrap().is_empty());

        let mut edit = rent();
        edit.amount = "525.50".into();
        let updated = repo.update(created.id, &edit.validate().unwrap()).await.unwrap();
        assert_eq!(updated.amount().cents(), 52_550);

        repo.delete(created.id).await.unwrap();
        assert!(repo.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_department_aborts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.expenses().insert(&rent().validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Department"));
        assert!(db.expenses().list("").await.unwrap().is_empty());
    }
}
