//! # Supplier Repository

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::SupplierDraft;
use stockroom_core::Supplier;
use tracing::debug;

use super::like;
use crate::error::{on_duplicate, DbError, DbResult};

const SELECT_SUPPLIER: &str = "SELECT id, name, contact, phone, email, address,
        created_at, updated_at, is_active
     FROM suppliers";

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists suppliers matching `search` on name, contact, phone or email.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "{SELECT_SUPPLIER}
             WHERE name LIKE ?1 OR contact LIKE ?1 OR phone LIKE ?1 OR email LIKE ?1
             ORDER BY id"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!("{SELECT_SUPPLIER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Inserts a new supplier.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Supplier name already exists
    pub async fn insert(&self, draft: &SupplierDraft) -> DbResult<Supplier> {
        debug!(name = %draft.name, "Inserting supplier");

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO suppliers
                (name, contact, phone, email, address, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        )
        .bind(&draft.name)
        .bind(&draft.contact)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.address)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Supplier", &draft.name))?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    pub async fn update(&self, id: i64, draft: &SupplierDraft) -> DbResult<Supplier> {
        debug!(id = %id, "Updating supplier");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE suppliers SET
                name = ?2, contact = ?3, phone = ?4, email = ?5, address = ?6,
                is_active = ?7, updated_at = ?8
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.contact)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.address)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Supplier", &draft.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }

    /// Counts active suppliers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::SupplierForm;

    fn leafco() -> SupplierForm {
        SupplierForm {
            name: "Leafco".into(),
            contact: "Sam Reyes".into(),
            phone: "555-0100".into(),
            email: "orders@leafco.test".into(),
            address: "1 Estate Road".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_supplier_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let created = repo.insert(&leafco().validate().unwrap()).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        // search on email
        assert_eq!(repo.list("leafco.test").await.unwrap().len(), 1);
        assert!(repo.list("nobody").await.unwrap().is_empty());

        let mut edit = leafco();
        edit.phone = "555-0199".into();
        let updated = repo.update(created.id, &edit.validate().unwrap()).await.unwrap();
        assert_eq!(updated.phone, "555-0199");

        let err = repo.insert(&leafco().validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
