//! # Department Repository
//!
//! Departments that expenses are booked against.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::NameDraft;
use stockroom_core::Department;
use tracing::debug;

use super::like;
use crate::error::{on_duplicate, DbError, DbResult};

const SELECT_DEPARTMENT: &str =
    "SELECT id, name, created_at, updated_at, is_active FROM departments";

#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DepartmentRepository { pool }
    }

    /// Lists departments whose name contains `search`, ordered by name.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(&format!(
            "{SELECT_DEPARTMENT} WHERE name LIKE ?1 ORDER BY name"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>(&format!("{SELECT_DEPARTMENT} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(department)
    }

    /// Inserts a new department.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, draft: &NameDraft) -> DbResult<Department> {
        debug!(name = %draft.name, "Inserting department");

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO departments (name, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(&draft.name)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Department", &draft.name))?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Department", id))
    }

    pub async fn update(&self, id: i64, draft: &NameDraft) -> DbResult<Department> {
        debug!(id = %id, "Updating department");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE departments SET name = ?2, is_active = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Department", &draft.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Department", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Department", id))
    }

    /// Deletes a department.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such department
    /// * `Err(DbError::ForeignKeyViolation)` - Expenses still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting department");

        let result = sqlx::query("DELETE FROM departments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Department", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::NameForm;

    #[tokio::test]
    async fn test_department_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.departments();

        let ops = repo.insert(&NameForm::new("Operations").validate().unwrap()).await.unwrap();
        repo.insert(&NameForm::new("Marketing").validate().unwrap()).await.unwrap();

        let names: Vec<String> = repo.list("").await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["Marketing", "Operations"]);

        let renamed = repo
            .update(ops.id, &NameForm::new("Ops").validate().unwrap())
            .await
            .unwrap();
        assert_eq!(renamed.name, "Ops");

        let err = repo
            .insert(&NameForm::new("Marketing").validate().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        repo.delete(ops.id).await.unwrap();
        assert!(repo.get_by_id(ops.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(ops.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_referenced_department_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dept = db
            .departments()
            .insert(&NameForm::new("Operations").validate().unwrap())
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO expenses (date, department_id, description, amount_cents)
             VALUES ('2024-03-01', ?1, 'Rent', 50000)",
        )
        .bind(dept.id)
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.departments().delete(dept.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.departments().get_by_id(dept.id).await.unwrap().is_some());
    }
}
