//! # Dashboard Repository
//!
//! Headline figures and chart series for the dashboard, read in one
//! snapshot.

use sqlx::SqlitePool;
use stockroom_core::{ChartPoint, DashboardSummary, UNCATEGORIZED};
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Computes the dashboard figures.
    ///
    /// ## Arguments
    /// * `low_stock_threshold` - Products at or below this quantity count as low stock
    pub async fn summary(&self, low_stock_threshold: i64) -> DbResult<DashboardSummary> {
        debug!(low_stock_threshold, "Computing dashboard summary");

        // Read transaction keeps every figure on the same snapshot
        let mut tx = self.pool.begin().await?;

        let (total_products, total_quantity, top_quantity, low_stock_count): (i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    COALESCE(SUM(CASE WHEN is_active = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(quantity), 0),
                    COALESCE(MAX(quantity), 0),
                    COALESCE(SUM(CASE WHEN quantity <= ?1 THEN 1 ELSE 0 END), 0)
                 FROM products",
            )
            .bind(low_stock_threshold)
            .fetch_one(&mut *tx)
            .await?;

        let total_sales_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(s.qty * p.price_cents), 0)
             FROM sales s
             JOIN products p ON p.id = s.product_id",
        )
        .fetch_one(&mut *tx)
        .await?;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;

        let total_suppliers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&mut *tx)
            .await?;

        let total_expenses_cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount_cents), 0) FROM expenses")
                .fetch_one(&mut *tx)
                .await?;

        let sales_by_category = sqlx::query_as::<_, ChartPoint>(
            "SELECT
                COALESCE(c.name, ?1) AS label,
                SUM(s.qty * p.price_cents) AS value_cents
             FROM sales s
             JOIN products p ON p.id = s.product_id
             LEFT JOIN categories c ON c.id = p.category_id
             GROUP BY label
             ORDER BY label",
        )
        .bind(UNCATEGORIZED)
        .fetch_all(&mut *tx)
        .await?;

        let expenses_by_department = sqlx::query_as::<_, ChartPoint>(
            "SELECT
                d.name AS label,
                SUM(e.amount_cents) AS value_cents
             FROM expenses e
             JOIN departments d ON d.id = e.department_id
             GROUP BY d.name
             ORDER BY d.name",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_products,
            total_quantity,
            total_sales_cents,
            total_categories,
            total_suppliers,
            total_expenses_cents,
            top_quantity,
            low_stock_threshold,
            low_stock_count,
            sales_by_category,
            expenses_by_department,
        })
    }
}
