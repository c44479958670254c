//! # Report Repository
//!
//! Per-product sales totals for a year or a single month.
//!
//! ## Aggregate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  active sales ⋈ active products                                        │
//! │    WHERE year(date) = Y [AND month(date) = M]                          │
//! │    GROUP BY product name                                               │
//! │                                                                         │
//! │  Product    │ Total Qty │ Total Cost      │ Total Sales                 │
//! │  ───────────┼───────────┼─────────────────┼────────────────────         │
//! │  Green Tea  │ Σ qty     │ Σ qty × cost    │ Σ qty × price               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cost and price are the product's current values, not those at sale time.

use sqlx::SqlitePool;
use stockroom_core::{ReportLine, ReportPeriod, SalesReport};
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Years that have at least one sale, newest first.
    pub async fn available_years(&self) -> DbResult<Vec<i32>> {
        let years: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS year
             FROM sales
             WHERE date IS NOT NULL
             ORDER BY year DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(years.into_iter().map(|y| y as i32).collect())
    }

    /// Builds the sales report for a period.
    ///
    /// An empty report is returned as such; it is not an error.
    pub async fn sales_report(&self, period: ReportPeriod) -> DbResult<SalesReport> {
        debug!(year = period.year, month = ?period.month, "Building sales report");

        let year = format!("{:04}", period.year);
        let month = period.month.map(|m| format!("{m:02}"));

        let lines = sqlx::query_as::<_, ReportLine>(
            "SELECT
                p.name AS product_name,
                SUM(s.qty) AS total_qty,
                SUM(s.qty * p.cost_cents) AS total_cost_cents,
                SUM(s.qty * p.price_cents) AS total_sales_cents
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.is_active = 1
              AND p.is_active = 1
              AND strftime('%Y', s.date) = ?1
              AND (?2 IS NULL OR strftime('%m', s.date) = ?2)
            GROUP BY p.name
            ORDER BY p.name",
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        debug!(lines = lines.len(), "Sales report built");
        Ok(SalesReport { period, lines })
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{seed_product, seed_reference_data};
    use crate::{Database, DbConfig};
    use stockroom_core::forms::{SaleEditForm, SaleForm};
    use stockroom_core::ReportPeriod;

    async fn sell(db: &Database, product_id: i64, date: &str, qty: i64) -> i64 {
        let form = SaleForm {
            receipt_no: "R".into(),
            date: date.into(),
            product: product_id.to_string(),
            qty: qty.to_string(),
            notes: String::new(),
            is_active: true,
        };
        db.sales().record(&form.validate().unwrap()).await.unwrap().id
    }

    #[tokio::test]
    async fn test_report_groups_by_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        let tea = seed_product(&db, "TEA-01", "Green Tea", "1.00", "2.00", 100).await;
        let rooibos = seed_product(&db, "TEA-02", "Rooibos", "0.75", "2.50", 100).await;

        sell(&db, rooibos.id, "2024-03-02", 2).await;
        sell(&db, tea.id, "2024-03-05", 1).await;
        sell(&db, tea.id, "2024-03-20", 2).await;
        sell(&db, tea.id, "2024-04-01", 10).await;
        sell(&db, tea.id, "2023-03-01", 10).await;

        let march = db
            .reports()
            .sales_report(ReportPeriod { year: 2024, month: Some(3) })
            .await
            .unwrap();
        assert_eq!(march.lines.len(), 2);
        assert_eq!(march.lines[0].product_name, "Green Tea");
        assert_eq!(march.lines[0].total_qty, 3);
        assert_eq!(march.lines[0].total_cost_cents, 300);
        assert_eq!(march.lines[0].total_sales_cents, 600);
        assert_eq!(march.lines[1].product_name, "Rooibos");
        assert_eq!(march.lines[1].total_cost_cents, 150);
        assert_eq!(march.lines[1].total_sales_cents, 500);

        let year = db
            .reports()
            .sales_report(ReportPeriod { year: 2024, month: None })
            .await
            .unwrap();
        assert_eq!(year.total_qty(), 15);

        assert_eq!(db.reports().available_years().await.unwrap(), vec![2024, 2023]);
    }

    #[tokio::test]
    async fn test_inactive_sales_are_excluded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_reference_data(&db).await;
        let tea = seed_product(&db, "TEA-01", "Green Tea", "1.00", "2.00", 100).await;

        let id = sell(&db, tea.id, "2024-03-05", 4).await;
        let edit = SaleEditForm {
            receipt_no: "R".into(),
            qty: "4".into(),
            notes: String::new(),
            is_active: false,
        };
        db.sales().update(id, &edit.validate().unwrap()).await.unwrap();

        let report = db
            .reports()
            .sales_report(ReportPeriod { year: 2024, month: Some(3) })
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_empty_report_is_not_an_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let report = db
            .reports()
            .sales_report(ReportPeriod { year: 1999, month: None })
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(db.reports().available_years().await.unwrap().is_empty());
    }
}
