//! # Warehouse Repository
//!
//! Storage locations. Names are not unique; products pick the first active
//! warehouse with a matching name. Warehouses are deactivated, never deleted.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::WarehouseDraft;
use stockroom_core::Warehouse;
use tracing::debug;

use super::like;
use crate::error::{DbError, DbResult};

const SELECT_WAREHOUSE: &str =
    "SELECT id, name, location, capacity, created_at, updated_at, is_active FROM warehouses";

#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

impl WarehouseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        WarehouseRepository { pool }
    }

    /// Lists warehouses whose name or location contains `search`, by id.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "{SELECT_WAREHOUSE} WHERE name LIKE ?1 OR location LIKE ?1 ORDER BY id"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(warehouses)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let warehouse =
            sqlx::query_as::<_, Warehouse>(&format!("{SELECT_WAREHOUSE} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(warehouse)
    }

    pub async fn insert(&self, draft: &WarehouseDraft) -> DbResult<Warehouse> {
        debug!(name = %draft.name, "Inserting warehouse");

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO warehouses (name, location, capacity, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(&draft.name)
        .bind(&draft.location)
        .bind(draft.capacity)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Warehouse", id))
    }

    pub async fn update(&self, id: i64, draft: &WarehouseDraft) -> DbResult<Warehouse> {
        debug!(id = %id, "Updating warehouse");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE warehouses
             SET name = ?2, location = ?3, capacity = ?4, is_active = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.location)
        .bind(draft.capacity)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Warehouse", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Warehouse", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::WarehouseForm;

    fn form(name: &str, location: &str) -> WarehouseForm {
        WarehouseForm {
            name: name.into(),
            location: location.into(),
            capacity: "500".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_list_matches_name_or_location() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.warehouses();

        repo.insert(&form("Main", "Harbour Road").validate().unwrap()).await.unwrap();
        repo.insert(&form("Overflow", "Airport").validate().unwrap()).await.unwrap();

        assert_eq!(repo.list("").await.unwrap().len(), 2);
        let by_location = repo.list("harbour").await.unwrap();
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].name, "Main");
        assert_eq!(by_location[0].capacity, 500);
    }

    #[tokio::test]
    async fn test_update_warehouse() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.warehouses();

        let main = repo.insert(&form("Main", "Dock").validate().unwrap()).await.unwrap();
        let mut edit = form("Main", "Dock 2");
        edit.capacity = "750".into();

        let updated = repo.update(main.id, &edit.validate().unwrap()).await.unwrap();
        assert_eq!(updated.location, "Dock 2");
        assert_eq!(updated.capacity, 750);

        let err = repo.update(42, &edit.validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
