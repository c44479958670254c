//! # Product Repository
//!
//! Database operations for products and the inventory overview.
//!
//! ## Key Operations
//! - Substring search on name and SKU
//! - CRUD with category/warehouse resolved by name
//! - Inventory overview (on hand, damaged, sold)
//!
//! ## Name Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductDraft { category: "Beverages", warehouse: "Main", ... }        │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  SELECT id FROM categories WHERE name = 'Beverages' AND is_active = 1  │
//! │  SELECT id FROM warehouses WHERE name = 'Main'      AND is_active = 1  │
//! │       │        └─ no row → NotFound, ROLLBACK, nothing written         │
//! │       ▼                                                                 │
//! │  INSERT INTO products (..., category_id, warehouse_id, ...)            │
//! │       ▼  COMMIT                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `quantity` on the form is the opening (or corrected) balance. After that,
//! sales and damage records move it.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::forms::ProductDraft;
use stockroom_core::{InventoryLine, Product};
use tracing::debug;

use super::{like, NameLookup};
use crate::error::{on_duplicate, DbError, DbResult};

const SELECT_PRODUCT: &str = "
    SELECT
        p.id,
        p.sku,
        p.name,
        p.description,
        p.category_id,
        c.name AS category_name,
        p.warehouse_id,
        w.name AS warehouse_name,
        p.cost_cents,
        p.price_cents,
        p.quantity,
        p.created_at,
        p.updated_at,
        p.is_active
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN warehouses w ON w.id = p.warehouse_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Substring search on name or SKU
/// let results = repo.list("tea").await?;
///
/// // Get by ID
/// let product = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products whose name or SKU contains `search`, ordered by id.
    ///
    /// An empty search returns every product, active or not.
    pub async fn list(&self, search: &str) -> DbResult<Vec<Product>> {
        debug!(search = %search, "Listing products");

        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.name LIKE ?1 OR p.sku LIKE ?1 ORDER BY p.id"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Product list loaded");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.sku = ?1"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with joined names
    /// * `Err(DbError::NotFound)` - Category or warehouse name unknown
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, draft: &ProductDraft) -> DbResult<Product> {
        debug!(sku = %draft.sku, "Inserting product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let category_id = NameLookup::Category.resolve(&mut tx, &draft.category).await?;
        let warehouse_id = NameLookup::Warehouse.resolve(&mut tx, &draft.warehouse).await?;

        let id = sqlx::query(
            "INSERT INTO products (
                sku, name, description, category_id, warehouse_id,
                cost_cents, price_cents, quantity, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        )
        .bind(&draft.sku)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(category_id)
        .bind(warehouse_id)
        .bind(draft.cost.cents())
        .bind(draft.price.cents())
        .bind(draft.quantity)
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(on_duplicate("SKU", &draft.sku))?
        .last_insert_rowid();

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Updates an existing product, including its on-hand quantity.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product, category or warehouse unknown
    /// * `Err(DbError::UniqueViolation)` - SKU belongs to another product
    pub async fn update(&self, id: i64, draft: &ProductDraft) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let category_id = NameLookup::Category.resolve(&mut tx, &draft.category).await?;
        let warehouse_id = NameLookup::Warehouse.resolve(&mut tx, &draft.warehouse).await?;

        let result = sqlx::query(
            "UPDATE products SET
                sku = ?2,
                name = ?3,
                description = ?4,
                category_id = ?5,
                warehouse_id = ?6,
                cost_cents = ?7,
                price_cents = ?8,
                quantity = ?9,
                is_active = ?10,
                updated_at = ?11
            WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.sku)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(category_id)
        .bind(warehouse_id)
        .bind(draft.cost.cents())
        .bind(draft.price.cents())
        .bind(draft.quantity)
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(on_duplicate("SKU", &draft.sku))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Sales or damage records still
    ///   reference it; deactivate it instead
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Per-product stock overview: on hand, total damaged, total sold.
    ///
    /// Every sale and damage row counts, active or not, matching how the
    /// on-hand balance was moved.
    pub async fn inventory(&self, search: &str) -> DbResult<Vec<InventoryLine>> {
        let lines = sqlx::query_as::<_, InventoryLine>(
            "SELECT
                p.id,
                p.name,
                c.name AS category_name,
                p.price_cents,
                p.quantity,
                COALESCE((SELECT SUM(d.qty) FROM damage_products d WHERE d.product_id = p.id), 0)
                    AS damaged,
                COALESCE((SELECT SUM(s.qty) FROM sales s WHERE s.product_id = p.id), 0)
                    AS sold
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.name LIKE ?1
            ORDER BY p.id",
        )
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::repository::test_support::seed_reference_data;
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::forms::ProductForm;

    fn green_tea() -> ProductForm {
        ProductForm {
            sku: "TEA-01".into(),
            name: "Green Tea".into(),
            description: "Loose leaf".into(),
            category: "Beverages".into(),
            warehouse: "Main".into(),
            cost: "1.20".into(),
            price: "2.50".into(),
            quantity: "20".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_resolves_names() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;

        let product = db.products().insert(&green_tea().validate().unwrap()).await.unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Beverages"));
        assert_eq!(product.warehouse_name.as_deref(), Some("Main"));
        assert_eq!(product.price().cents(), 250);
        assert_eq!(product.quantity, 20);

        let by_sku = db.products().get_by_sku("TEA-01").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);
    }

    #[tokio::test]
    async fn test_unknown_category_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;

        let mut form = green_tea();
        form.category = "Hardware".into();

        let err = db.products().insert(&form.validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Category"));
        assert!(db.products().list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;

        db.products().insert(&green_tea().validate().unwrap()).await.unwrap();
        let err = db.products().insert(&green_tea().validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "TEA-01"));
    }

    #[tokio::test]
    async fn test_list_update_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        let repo = db.products();

        let tea = repo.insert(&green_tea().validate().unwrap()).await.unwrap();
        let mut rooibos = green_tea();
        rooibos.sku = "TEA-02".into();
        rooibos.name = "Rooibos".into();
        repo.insert(&rooibos.validate().unwrap()).await.unwrap();

        // sku search
        assert_eq!(repo.list("tea-0").await.unwrap().len(), 2);
        assert_eq!(repo.list("rooi").await.unwrap().len(), 1);

        let mut edit = green_tea();
        edit.quantity = "35".into();
        edit.is_active = false;
        let updated = repo.update(tea.id, &edit.validate().unwrap()).await.unwrap();
        assert_eq!(updated.quantity, 35);
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(tea.id).await.unwrap();
        assert!(repo.get_by_id(tea.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(tea.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_inventory_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        let tea = db.products().insert(&green_tea().validate().unwrap()).await.unwrap();

        for (table, qty) in [("sales", 3), ("sales", 2), ("damage_products", 1)] {
            let sql = if table == "sales" {
                "INSERT INTO sales (receipt_no, date, product_id, qty) VALUES ('R', '2024-03-01', ?1, ?2)"
            } else {
                "INSERT INTO damage_products (product_id, date, qty, reason) VALUES (?1, '2024-03-01', ?2, 'Torn')"
            };
            sqlx::query(sql)
                .bind(tea.id)
                .bind(qty)
                .execute(db.pool())
                .await
                .unwrap();
        }

        let lines = db.products().inventory("green").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].sold, 5);
        assert_eq!(lines[0].damaged, 1);
        assert_eq!(lines[0].category_name.as_deref(), Some("Beverages"));

        assert!(db.products().inventory("coffee").await.unwrap().is_empty());
    }
}
