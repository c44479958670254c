//! # Damaged Goods Repository
//!
//! Damaged stock written off against a product.
//!
//! ## Stock Effect
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert  │ product.quantity −= qty                                      │
//! │  update  │ same product: −= (new − old)                                 │
//! │          │ other product: old += old_qty, new −= new_qty                │
//! │  delete  │ product.quantity += qty                                      │
//! │                                                                         │
//! │  Each row write and its stock change commit in one transaction.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use stockroom_core::forms::DamageDraft;
use stockroom_core::{DamageFilter, DamageRecord, StockChange};
use tracing::{debug, info};

use super::{apply_stock_change, like, NameLookup};
use crate::error::{DbError, DbResult};

const SELECT_DAMAGE: &str = "
    SELECT
        d.id,
        d.product_id,
        p.name AS product_name,
        d.date,
        d.qty,
        d.reason,
        d.created_at,
        d.updated_at,
        d.is_active
    FROM damage_products d
    JOIN products p ON p.id = d.product_id";

/// Repository for damaged-goods records.
#[derive(Debug, Clone)]
pub struct DamageRepository {
    pool: SqlitePool,
    allow_negative_stock: bool,
}

impl DamageRepository {
    pub fn new(pool: SqlitePool, allow_negative_stock: bool) -> Self {
        DamageRepository {
            pool,
            allow_negative_stock,
        }
    }

    /// Lists damage records matching the filter, ordered by id.
    ///
    /// ## Filter
    /// - `search` matches product name or reason
    /// - `product` is an exact product name
    /// - `from` / `to` bound the date, inclusive
    pub async fn list(&self, filter: &DamageFilter) -> DbResult<Vec<DamageRecord>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_DAMAGE);

        let term = like(&filter.search);
        query
            .push(" WHERE (p.name LIKE ")
            .push_bind(term.clone())
            .push(" OR d.reason LIKE ")
            .push_bind(term)
            .push(")");

        if let Some(product) = &filter.product {
            query.push(" AND p.name = ").push_bind(product.clone());
        }
        if let Some(from) = filter.from {
            query.push(" AND d.date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND d.date <= ").push_bind(to);
        }

        query.push(" ORDER BY d.id");

        let records = query
            .build_query_as::<DamageRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<DamageRecord>> {
        let record = sqlx::query_as::<_, DamageRecord>(&format!("{SELECT_DAMAGE} WHERE d.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Records damaged goods and removes them from stock.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No active product with that name
    /// * `Err(DbError::Core(InsufficientStock))` - Negative stock disallowed
    pub async fn insert(&self, draft: &DamageDraft) -> DbResult<DamageRecord> {
        debug!(product = %draft.product, qty = draft.qty, "Recording damaged goods");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let product_id = NameLookup::Product.resolve(&mut tx, &draft.product).await?;

        let id = sqlx::query(
            "INSERT INTO damage_products (
                product_id, date, qty, reason, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(product_id)
        .bind(draft.date)
        .bind(draft.qty)
        .bind(&draft.reason)
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        apply_stock_change(
            &mut tx,
            &StockChange::remove(product_id, draft.qty),
            self.allow_negative_stock,
        )
        .await?;

        tx.commit().await?;

        info!(id, product_id, qty = draft.qty, "Damaged goods recorded");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Damage record", id))
    }

    /// Updates a damage record, moving stock between products if needed.
    pub async fn update(&self, id: i64, draft: &DamageDraft) -> DbResult<DamageRecord> {
        debug!(id = %id, "Updating damage record");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let previous: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, qty FROM damage_products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (old_product, old_qty) =
            previous.ok_or_else(|| DbError::not_found("Damage record", id))?;

        let product_id = NameLookup::Product.resolve(&mut tx, &draft.product).await?;

        sqlx::query(
            "UPDATE damage_products SET
                product_id = ?2, date = ?3, qty = ?4, reason = ?5,
                is_active = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(id)
        .bind(product_id)
        .bind(draft.date)
        .bind(draft.qty)
        .bind(&draft.reason)
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for change in StockChange::reassign(old_product, old_qty, product_id, draft.qty) {
            apply_stock_change(&mut tx, &change, self.allow_negative_stock).await?;
        }

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Damage record", id))
    }

    /// Deletes a damage record and returns its quantity to stock.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting damage record");

        let mut tx = self.pool.begin().await?;

        let previous: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, qty FROM damage_products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, qty) = previous.ok_or_else(|| DbError::not_found("Damage record", id))?;

        sqlx::query("DELETE FROM damage_products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        apply_stock_change(
            &mut tx,
            &StockChange::restore(product_id, qty),
            self.allow_negative_stock,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{on_hand, seed_product, seed_reference_data};
    use crate::{Database, DbConfig, DbError};
    use chrono::NaiveDate;
    use stockroom_core::forms::DamageForm;
    use stockroom_core::{CoreError, DamageFilter};

    fn damage(product: &str, date: &str, qty: &str, reason: &str) -> DamageForm {
        DamageForm {
            product: product.into(),
            date: date.into(),
            qty: qty.into(),
            reason: reason.into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_damage_moves_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        let tea = seed_product(&db, "TEA-01", "Green Tea", "1.20", "2.50", 20).await;
        let rooibos = seed_product(&db, "TEA-02", "Rooibos", "1.00", "2.00", 10).await;
        let repo = db.damages();

        let record = repo
            .insert(&damage("Green Tea", "2024-03-02", "2", "Torn bag").validate().unwrap())
            .await
            .unwrap();
        assert_eq!(record.product_name, "Green Tea");
        assert_eq!(on_hand(&db, tea.id).await, 18);

        // same product, 2 → 3
        repo.update(record.id, &damage("Green Tea", "2024-03-02", "3", "Torn bag").validate().unwrap())
            .await
            .unwrap();
        assert_eq!(on_hand(&db, tea.id).await, 17);

        // moved to another product
        repo.update(record.id, &damage("Rooibos", "2024-03-02", "4", "Wet").validate().unwrap())
            .await
            .unwrap();
        assert_eq!(on_hand(&db, tea.id).await, 20);
        assert_eq!(on_hand(&db, rooibos.id).await, 6);

        repo.delete(record.id).await.unwrap();
        assert_eq!(on_hand(&db, rooibos.id).await, 10);
        assert!(repo.get_by_id(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_product_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .damages()
            .insert(&damage("Ghost", "2024-03-02", "1", "Lost").validate().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Product"));
        assert!(db.damages().list(&DamageFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back() {
        let db = Database::new(DbConfig::in_memory().allow_negative_stock(false))
            .await
            .unwrap();
        seed_reference_data(&db).await;
        let tea = seed_product(&db, "TEA-01", "Green Tea", "1.20", "2.50", 1).await;

        let err = db
            .damages()
            .insert(&damage("Green Tea", "2024-03-02", "2", "Crushed").validate().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InsufficientStock { .. })));
        assert_eq!(on_hand(&db, tea.id).await, 1);
        assert!(db.damages().list(&DamageFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        seed_product(&db, "TEA-01", "Green Tea", "1.20", "2.50", 20).await;
        seed_product(&db, "TEA-02", "Rooibos", "1.00", "2.00", 10).await;
        let repo = db.damages();

        repo.insert(&damage("Green Tea", "2024-03-02", "1", "Torn bag").validate().unwrap())
            .await
            .unwrap();
        repo.insert(&damage("Rooibos", "2024-04-10", "1", "Expired").validate().unwrap())
            .await
            .unwrap();
        repo.insert(&damage("Green Tea", "2024-05-20", "1", "Expired").validate().unwrap())
            .await
            .unwrap();

        let expired = repo
            .list(&DamageFilter {
                search: "expired".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(expired.len(), 2);

        let tea_only = repo
            .list(&DamageFilter {
                product: Some("Green Tea".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(tea_only.len(), 2);

        let april = repo
            .list(&DamageFilter {
                from: NaiveDate::from_ymd_opt(2024, 4, 1),
                to: NaiveDate::from_ymd_opt(2024, 4, 30),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(april.len(), 1);
        assert_eq!(april[0].product_name, "Rooibos");
    }
}
