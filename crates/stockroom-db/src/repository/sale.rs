//! # Sale Repository
//!
//! Database operations for recorded sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Write Flow                                   │
//! │                                                                         │
//! │  record(draft)                                                         │
//! │    BEGIN                                                                │
//! │    ├── products.quantity −= qty   (NotFound / InsufficientStock abort) │
//! │    └── INSERT INTO sales                                               │
//! │    COMMIT                                                               │
//! │                                                                         │
//! │  update(id, edit)                   admin only (checked by caller)     │
//! │    BEGIN                                                                │
//! │    ├── read previous qty + product                                     │
//! │    ├── products.quantity −= (new − old)   (skipped when equal)         │
//! │    └── UPDATE sales (receipt, qty, notes, is_active, updated_at)       │
//! │    COMMIT                                                               │
//! │                                                                         │
//! │  delete(id, restock)                admin only (checked by caller)     │
//! │    BEGIN                                                                │
//! │    ├── DELETE FROM sales                                               │
//! │    └── products.quantity += qty   (only when restock)                  │
//! │    COMMIT                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product and date of a sale are fixed once recorded.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use stockroom_core::forms::{SaleDraft, SaleEdit};
use stockroom_core::{Sale, SaleFilter, StockChange};
use tracing::{debug, info};

use super::{apply_stock_change, like};
use crate::error::{DbError, DbResult};

const SELECT_SALE: &str = "
    SELECT
        s.id,
        s.receipt_no,
        s.date,
        s.product_id,
        p.name AS product_name,
        s.qty,
        s.notes,
        p.cost_cents AS unit_cost_cents,
        p.price_cents AS unit_price_cents,
        s.created_at,
        s.updated_at,
        s.is_active
    FROM sales s
    JOIN products p ON p.id = s.product_id";

/// Repository for sale database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.sales();
///
/// let sale = repo.record(&draft).await?;
/// repo.update(sale.id, &edit).await?;
/// repo.delete(sale.id, false).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    allow_negative_stock: bool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool, allow_negative_stock: bool) -> Self {
        SaleRepository {
            pool,
            allow_negative_stock,
        }
    }

    /// Lists sales matching the filter, newest first.
    ///
    /// ## Filter
    /// - `search` matches the product name
    /// - `from` / `to` bound the sale date, inclusive
    /// - `active` restricts on the active flag
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(search = %filter.search, "Listing sales");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_SALE);
        query.push(" WHERE p.name LIKE ").push_bind(like(&filter.search));

        if let Some(from) = filter.from {
            query.push(" AND s.date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND s.date <= ").push_bind(to);
        }
        if let Some(active) = filter.active.as_flag() {
            query.push(" AND s.is_active = ").push_bind(active);
        }

        query.push(" ORDER BY s.date DESC, s.id DESC");

        let sales = query.build_query_as::<Sale>().fetch_all(&self.pool).await?;

        debug!(count = sales.len(), "Sales loaded");
        Ok(sales)
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE s.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Records a new sale and takes its quantity out of stock.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The stored sale
    /// * `Err(DbError::NotFound)` - Product doesn't exist; nothing is written
    /// * `Err(DbError::Core(InsufficientStock))` - Negative stock disallowed
    pub async fn record(&self, draft: &SaleDraft) -> DbResult<Sale> {
        debug!(
            receipt_no = %draft.receipt_no,
            product_id = draft.product_id,
            qty = draft.qty,
            "Recording sale"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        apply_stock_change(
            &mut tx,
            &StockChange::remove(draft.product_id, draft.qty),
            self.allow_negative_stock,
        )
        .await?;

        let id = sqlx::query(
            "INSERT INTO sales (
                receipt_no, date, product_id, qty, notes, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        )
        .bind(&draft.receipt_no)
        .bind(draft.date)
        .bind(draft.product_id)
        .bind(draft.qty)
        .bind(&draft.notes)
        .bind(draft.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!(id, receipt_no = %draft.receipt_no, qty = draft.qty, "Sale recorded");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Edits a sale, applying only the quantity delta to stock.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Sale doesn't exist
    pub async fn update(&self, id: i64, edit: &SaleEdit) -> DbResult<Sale> {
        debug!(id = %id, qty = edit.qty, "Updating sale");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let previous: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, qty FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, old_qty) = previous.ok_or_else(|| DbError::not_found("Sale", id))?;

        if let Some(change) = StockChange::requantify(product_id, old_qty, edit.qty) {
            apply_stock_change(&mut tx, &change, self.allow_negative_stock).await?;
        }

        sqlx::query(
            "UPDATE sales SET
                receipt_no = ?2, qty = ?3, notes = ?4, is_active = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&edit.receipt_no)
        .bind(edit.qty)
        .bind(&edit.notes)
        .bind(edit.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Deletes a sale.
    ///
    /// Stock is left as it is unless `restock` is set, in which case the
    /// sale's quantity goes back to the product.
    pub async fn delete(&self, id: i64, restock: bool) -> DbResult<()> {
        debug!(id = %id, restock, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let previous: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, qty FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (product_id, qty) = previous.ok_or_else(|| DbError::not_found("Sale", id))?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if restock {
            apply_stock_change(
                &mut tx,
                &StockChange::restore(product_id, qty),
                self.allow_negative_stock,
            )
            .await?;
        }

        tx.commit().await?;

        info!(id, restock, "Sale deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
