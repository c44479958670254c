//! # Category Repository
//!
//! Database operations for product categories.
//!
//! Categories are never deleted; deactivate them instead. Products keep
//! their category id either way.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::NameDraft;
use stockroom_core::Category;
use tracing::debug;

use super::like;
use crate::error::{on_duplicate, DbError, DbResult};

const SELECT_CATEGORY: &str =
    "SELECT id, name, created_at, updated_at, is_active FROM categories";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories whose name contains `search`, ordered by name.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "{SELECT_CATEGORY} WHERE name LIKE ?1 ORDER BY name"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - The stored row
    /// * `Err(DbError::UniqueViolation)` - Name already exists; nothing is written
    pub async fn insert(&self, draft: &NameDraft) -> DbResult<Category> {
        debug!(name = %draft.name, "Inserting category");

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO categories (name, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(&draft.name)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Category", &draft.name))?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Updates a category's name and active flag.
    pub async fn update(&self, id: i64, draft: &NameDraft) -> DbResult<Category> {
        debug!(id = %id, "Updating category");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE categories SET name = ?2, is_active = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Category", &draft.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Counts active categories.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::NameForm;

    #[tokio::test]
    async fn test_duplicate_category_leaves_table_unchanged() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let draft = NameForm::new("Beverages").validate().unwrap();
        repo.insert(&draft).await.unwrap();

        let err = repo.insert(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "Category" && value == "Beverages"
        ));
        assert_eq!(repo.list("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        for name in ["Snacks", "Beverages", "Bakery"] {
            repo.insert(&NameForm::new(name).validate().unwrap()).await.unwrap();
        }

        let names: Vec<String> = repo.list("").await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Bakery", "Beverages", "Snacks"]);

        let matched = repo.list("bev").await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Beverages");
    }

    #[tokio::test]
    async fn test_update_and_deactivate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo.insert(&NameForm::new("Drinks").validate().unwrap()).await.unwrap();
        let mut form = NameForm::new("Beverages");
        form.is_active = false;

        let updated = repo.update(created.id, &form.validate().unwrap()).await.unwrap();
        assert_eq!(updated.name, "Beverages");
        assert!(!updated.is_active);
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.update(99, &form.validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
