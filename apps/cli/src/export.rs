//! # Text Export
//!
//! Writes fixed-layout text files into the reports directory.
//!
//! - Sales report: one file per period, `sales_report_<year>_<month|all>.txt`
//! - Product and sales lists: `<products|sales>_<YYYYmmdd_HHMMSS>.txt`, the
//!   same columns the list command prints
//!
//! A sales report file looks like:
//!
//! ```text
//! Sales Report for 2024-03
//!
//! +-----------+-----------+------------+-------------+
//! | Product   | Total Qty | Total Cost | Total Sales |
//! +=================================================+
//! | Green Tea |         3 |      $3.00 |       $6.00 |
//! | Rooibos   |         2 |      $1.50 |       $5.00 |
//! |-----------+-----------+------------+-------------|
//! | Total     |         5 |      $4.50 |      $11.00 |
//! +-----------+-----------+------------+-------------+
//! ```

use chrono::NaiveDateTime;
use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::{CellAlignment, Table};
use std::path::{Path, PathBuf};
use stockroom_core::{SalesReport, ValidationError};
use tracing::info;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::render::TableRow;

/// Renders the report table (title, lines, totals row).
pub fn render_report(report: &SalesReport, config: &AppConfig) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL_CONDENSED)
        .set_header(vec!["Product", "Total Qty", "Total Cost", "Total Sales"]);

    for line in &report.lines {
        table.add_row(vec![
            line.product_name.clone(),
            line.total_qty.to_string(),
            config.format_currency(line.total_cost_cents),
            config.format_currency(line.total_sales_cents),
        ]);
    }

    table.add_row(vec![
        "Total".to_string(),
        report.total_qty().to_string(),
        config.format_currency(report.total_cost().cents()),
        config.format_currency(report.total_sales().cents()),
    ]);

    for index in 1..4 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    format!("{}\n\n{}\n", report.period.title(), table)
}

/// Writes the report to `dir/<period file name>`, creating `dir` if needed.
///
/// ## Returns
/// * `Ok(path)` - The written file
/// * `Err(VALIDATION_ERROR)` - The period has no sales ("No data to export")
pub fn write_report(report: &SalesReport, config: &AppConfig, dir: &Path) -> Result<PathBuf, ApiError> {
    if report.is_empty() {
        return Err(ValidationError::NothingToExport.into());
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(report.period.file_name());
    std::fs::write(&path, render_report(report, config))?;

    info!(path = %path.display(), lines = report.lines.len(), "Report exported");
    Ok(path)
}

// =============================================================================
// List Export
// =============================================================================

/// A snapshot of a list screen written to `<stem>_<YYYYmmdd_HHMMSS>.txt`.
#[derive(Debug, Clone, Copy)]
pub struct ListExport<'a> {
    stem: &'a str,
    title: &'a str,
    at: NaiveDateTime,
}

impl<'a> ListExport<'a> {
    pub fn new(stem: &'a str, title: &'a str, at: NaiveDateTime) -> Self {
        ListExport { stem, title, at }
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}.txt", self.stem, self.at.format("%Y%m%d_%H%M%S"))
    }

    /// Title line with the export time, a blank line, then the table.
    pub fn render<T: TableRow>(&self, rows: &[T], config: &AppConfig) -> String {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL_CONDENSED).set_header(T::headers());
        for row in rows {
            table.add_row(row.cells(config));
        }

        format!(
            "{}    {}\n\n{}\n",
            self.title,
            self.at.format("%Y-%m-%d %H:%M:%S"),
            table
        )
    }

    /// Writes the rows to `dir`, creating it if needed.
    ///
    /// ## Returns
    /// * `Ok(path)` - The written file
    /// * `Err(VALIDATION_ERROR)` - `rows` is empty ("No data to export")
    pub fn write<T: TableRow>(&self, rows: &[T], config: &AppConfig, dir: &Path) -> Result<PathBuf, ApiError> {
        if rows.is_empty() {
            return Err(ValidationError::NothingToExport.into());
        }

        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render(rows, config))?;

        info!(path = %path.display(), rows = rows.len(), "List exported");
        Ok(path)
    }
}
