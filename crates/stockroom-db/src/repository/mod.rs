//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.sales().record(&draft)                                     │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── list(&self, &filter)                                              │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── record(&self, &draft)      ─┐                                     │
//! │  ├── update(&self, id, &edit)    ├─ apply_stock_change() in the        │
//! │  └── delete(&self, id, restock) ─┘  same transaction                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] / [`department::DepartmentRepository`] - Named reference data
//! - [`warehouse::WarehouseRepository`] / [`supplier::SupplierRepository`] - Locations and vendors
//! - [`product::ProductRepository`] - Products and the inventory overview
//! - [`expense::ExpenseRepository`] / [`debt::DebtRepository`] - Bookkeeping
//! - [`damage::DamageRepository`] / [`sale::SaleRepository`] - Stock-moving records
//! - [`user::UserRepository`] - Accounts, registration, login
//! - [`report::ReportRepository`] / [`dashboard::DashboardRepository`] - Aggregates

pub mod category;
pub mod damage;
pub mod dashboard;
pub mod debt;
pub mod department;
pub mod expense;
pub mod product;
pub mod report;
pub mod sale;
pub mod supplier;
pub mod user;
pub mod warehouse;

use sqlx::SqliteConnection;
use stockroom_core::stock::{ensure_available, StockChange};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Wraps a search term for a substring `LIKE` match.
///
/// An empty term becomes `%%`, which matches every row.
pub(crate) fn like(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Applies one stock change to `products.quantity`.
///
/// Must run on the transaction that writes the sale or damage row, so the
/// row and the balance commit together.
///
/// ## Returns
/// * `Ok(i64)` - The new on-hand quantity
/// * `Err(DbError::NotFound)` - Product doesn't exist
/// * `Err(DbError::Core(InsufficientStock))` - Negative stock is disallowed
/// * `Err(DbError::Core(Overflow))` - The balance would leave the `i64` range
pub(crate) async fn apply_stock_change(
    conn: &mut SqliteConnection,
    change: &StockChange,
    allow_negative: bool,
) -> DbResult<i64> {
    let row: Option<(String, i64)> =
        sqlx::query_as("SELECT sku, quantity FROM products WHERE id = ?1")
            .bind(change.product_id)
            .fetch_optional(&mut *conn)
            .await?;

    let (sku, on_hand) = row.ok_or_else(|| DbError::not_found("Product", change.product_id))?;

    let balance = ensure_available(&sku, on_hand, change, allow_negative)?;
    if balance < 0 {
        warn!(sku = %sku, balance, "Stock balance below zero");
    }

    sqlx::query("UPDATE products SET quantity = ?2 WHERE id = ?1")
        .bind(change.product_id)
        .bind(balance)
        .execute(&mut *conn)
        .await?;

    debug!(product_id = change.product_id, change = change.change, balance, "Stock adjusted");
    Ok(balance)
}

/// Name-based references entered on forms.
///
/// Forms name the category, warehouse, department or product; writes
/// resolve the name to an id among active rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameLookup {
    Category,
    Warehouse,
    Department,
    Product,
}

impl NameLookup {
    fn entity(&self) -> &'static str {
        match self {
            NameLookup::Category => "Category",
            NameLookup::Warehouse => "Warehouse",
            NameLookup::Department => "Department",
            NameLookup::Product => "Product",
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            NameLookup::Category => {
                "SELECT id FROM categories WHERE name = ?1 AND is_active = 1 ORDER BY id LIMIT 1"
            }
            NameLookup::Warehouse => {
                "SELECT id FROM warehouses WHERE name = ?1 AND is_active = 1 ORDER BY id LIMIT 1"
            }
            NameLookup::Department => {
                "SELECT id FROM departments WHERE name = ?1 AND is_active = 1 ORDER BY id LIMIT 1"
            }
            NameLookup::Product => {
                "SELECT id FROM products WHERE name = ?1 AND is_active = 1 ORDER BY id LIMIT 1"
            }
        }
    }

    /// Resolves `name` to the id of the first active match.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No active row carries that name
    pub(crate) async fn resolve(&self, conn: &mut SqliteConnection, name: &str) -> DbResult<i64> {
        let id: Option<i64> = sqlx::query_scalar(self.sql())
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        id.ok_or_else(|| DbError::not_found(self.entity(), name))
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockroom_core::CoreError;

    async fn seed_product(db: &Database, quantity: i64) -> i64 {
        sqlx::query(
            "INSERT INTO products (sku, name, cost_cents, price_cents, quantity)
             VALUES ('TEA-01', 'Green Tea', 120, 250, ?1)",
        )
        .bind(quantity)
        .execute(db.pool())
        .await
        .unwrap()
        .last_insert_rowid()
    }

    #[test]
    fn test_like_wraps_term() {
        assert_eq!(like(" tea "), "%tea%");
        assert_eq!(like(""), "%%");
    }

    #[tokio::test]
    async fn test_apply_stock_change() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = seed_product(&db, 3).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = apply_stock_change(&mut conn, &StockChange::remove(id, 5), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InsufficientStock { .. })));

        let balance = apply_stock_change(&mut conn, &StockChange::remove(id, 5), true)
            .await
            .unwrap();
        assert_eq!(balance, -2);

        let err = apply_stock_change(&mut conn, &StockChange::remove(999, 1), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_apply_stock_change_at_i64_limits() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = seed_product(&db, i64::MAX - 1).await;
        let low = seed_low(&db).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let balance = apply_stock_change(&mut conn, &StockChange::restore(id, 1), true)
            .await
            .unwrap();
        assert_eq!(balance, i64::MAX);

        let err = apply_stock_change(&mut conn, &StockChange::restore(id, 1), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Overflow { .. })));

        // the failed change left the column untouched and still an integer
        let (quantity, kind): (i64, String) =
            sqlx::query_as("SELECT quantity, typeof(quantity) FROM products WHERE id = ?1")
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert_eq!(quantity, i64::MAX);
        assert_eq!(kind, "integer");

        let err = apply_stock_change(&mut conn, &StockChange::remove(low, 2), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Overflow { .. })));
    }

    async fn seed_low(db: &Database) -> i64 {
        sqlx::query(
            "INSERT INTO products (sku, name, cost_cents, price_cents, quantity)
             VALUES ('TEA-02', 'Black Tea', 120, 250, ?1)",
        )
        .bind(i64::MIN + 1)
        .execute(db.pool())
        .await
        .unwrap()
        .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_name_lookup_skips_inactive_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO warehouses (name, location, capacity, is_active) VALUES ('Main', 'Dock', 10, 0)")
            .execute(db.pool())
            .await
            .unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = NameLookup::Warehouse.resolve(&mut conn, "Main").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Warehouse"));

        sqlx::query("INSERT INTO warehouses (name, location, capacity) VALUES ('Main', 'Yard', 10)")
            .execute(&mut *conn)
            .await
            .unwrap();
        assert_eq!(NameLookup::Warehouse.resolve(&mut conn, "Main").await.unwrap(), 2);
    }
}
