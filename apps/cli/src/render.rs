//! # Output Rendering
//!
//! Everything a command returns is printed either as a table (default) or
//! as pretty JSON (`--json`). Logs go to stderr, so stdout carries only
//! the result.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use serde::Serialize;
use stockroom_core::{
    Category, ChartPoint, DamageRecord, DashboardSummary, Debt, Department, Expense, InventoryLine,
    SalesReport, Session, Supplier, User, Warehouse,
};

use crate::commands::product::ProductDto;
use crate::commands::sale::SaleDto;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::export;

/// A value that can be shown as one table row.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self, config: &AppConfig) -> Vec<String>;
}

pub struct Output<'a> {
    json: bool,
    config: &'a AppConfig,
}

impl<'a> Output<'a> {
    pub fn new(json: bool, config: &'a AppConfig) -> Self {
        Output { json, config }
    }

    pub fn rows<T: TableRow + Serialize>(&self, rows: &[T]) -> Result<(), ApiError> {
        if self.json {
            return print_json(&rows);
        }
        if rows.is_empty() {
            println!("No records.");
            return Ok(());
        }
        println!("{}", table(rows, self.config));
        Ok(())
    }

    pub fn row<T: TableRow + Serialize>(&self, row: &T) -> Result<(), ApiError> {
        if self.json {
            return print_json(row);
        }
        println!("{}", table(std::slice::from_ref(row), self.config));
        Ok(())
    }

    /// Confirmation for operations without a result value (deletes).
    pub fn done(&self, message: &str) -> Result<(), ApiError> {
        if self.json {
            return print_json(&serde_json::json!({ "ok": true, "message": message }));
        }
        println!("{}", message);
        Ok(())
    }

    pub fn session(&self, session: &Session) -> Result<(), ApiError> {
        if self.json {
            return print_json(session);
        }
        println!(
            "Logged in as {} ({}), role {}",
            session.display_name, session.username, session.role
        );
        Ok(())
    }

    pub fn years(&self, years: &[i32]) -> Result<(), ApiError> {
        if self.json {
            return print_json(&years);
        }
        if years.is_empty() {
            println!("No sales recorded yet.");
        }
        for year in years {
            println!("{}", year);
        }
        Ok(())
    }

    pub fn report(&self, report: &SalesReport) -> Result<(), ApiError> {
        if self.json {
            return print_json(report);
        }
        if report.is_empty() {
            println!("{}\n\nNo data.", report.period.title());
            return Ok(());
        }
        print!("{}", export::render_report(report, self.config));
        Ok(())
    }

    pub fn dashboard(&self, summary: &DashboardSummary) -> Result<(), ApiError> {
        if self.json {
            return print_json(summary);
        }

        let money = |cents: i64| self.config.format_currency(cents);
        let mut figures = Table::new();
        figures.load_preset(UTF8_FULL_CONDENSED);
        figures.set_header(vec!["Figure", "Value"]);
        figures.add_row(vec!["Active products".to_string(), summary.total_products.to_string()]);
        figures.add_row(vec!["Units on hand".to_string(), summary.total_quantity.to_string()]);
        figures.add_row(vec!["Sales".to_string(), money(summary.total_sales_cents)]);
        figures.add_row(vec!["Categories".to_string(), summary.total_categories.to_string()]);
        figures.add_row(vec!["Suppliers".to_string(), summary.total_suppliers.to_string()]);
        figures.add_row(vec!["Expenses".to_string(), money(summary.total_expenses_cents)]);
        figures.add_row(vec!["Highest quantity".to_string(), summary.top_quantity.to_string()]);
        figures.add_row(vec![
            format!("Low stock (≤ {})", summary.low_stock_threshold),
            summary.low_stock_count.to_string(),
        ]);
        println!("{}", figures);

        println!("\nSales by category");
        println!("{}", chart_table(&summary.sales_by_category, self.config));
        println!("\nExpenses by department");
        println!("{}", chart_table(&summary.expenses_by_department, self.config));
        Ok(())
    }
}

/// Prints a failed command: JSON on stdout with `--json`, otherwise
/// `error[CODE]: message` on stderr.
pub fn print_error(err: &ApiError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(payload) => println!("{}", payload),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ApiError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Could not serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn table<T: TableRow>(rows: &[T], config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(T::headers());
    for row in rows {
        table.add_row(row.cells(config));
    }
    table
}

fn chart_table(points: &[ChartPoint], config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec!["Label", "Value"]);
    for point in points {
        table.add_row(vec![point.label.clone(), config.format_currency(point.value_cents)]);
    }
    table
}

fn active(flag: bool) -> String {
    let label = if flag { "yes" } else { "no" };
    label.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

// =============================================================================
// Row Layouts
// =============================================================================

impl TableRow for Category {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), active(self.is_active)]
    }
}

impl TableRow for Department {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), active(self.is_active)]
    }
}

impl TableRow for Warehouse {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Location", "Capacity", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.location.clone(),
            self.capacity.to_string(),
            active(self.is_active),
        ]
    }
}

impl TableRow for Supplier {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Contact", "Phone", "Email", "Address", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.contact.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
            active(self.is_active),
        ]
    }
}

impl TableRow for ProductDto {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "SKU", "Name", "Category", "Warehouse", "Cost", "Price", "Qty", "Active"]
    }

    fn cells(&self, config: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.sku.clone(),
            self.name.clone(),
            or_dash(self.category_name.as_deref()),
            or_dash(self.warehouse_name.as_deref()),
            self.cost_cents
                .map(|c| config.format_currency(c))
                .unwrap_or_else(|| "-".to_string()),
            config.format_currency(self.price_cents),
            self.quantity.to_string(),
            active(self.is_active),
        ]
    }
}

impl TableRow for Expense {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Date", "Department", "Description", "Amount", "Active"]
    }

    fn cells(&self, config: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            or_dash(self.department_name.as_deref()),
            self.description.clone(),
            config.format_currency(self.amount_cents),
            active(self.is_active),
        ]
    }
}

impl TableRow for Debt {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Amount", "Due", "Status", "Active"]
    }

    fn cells(&self, config: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            config.format_currency(self.amount_cents),
            self.due_date.to_string(),
            self.status.clone(),
            active(self.is_active),
        ]
    }
}

impl TableRow for DamageRecord {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Date", "Product", "Qty", "Reason", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.product_name.clone(),
            self.qty.to_string(),
            self.reason.clone(),
            active(self.is_active),
        ]
    }
}

impl TableRow for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Username", "Name", "Role", "Active"]
    }

    fn cells(&self, _: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.display_name(),
            self.role.to_string(),
            active(self.is_active),
        ]
    }
}

impl TableRow for SaleDto {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Date", "Receipt", "Product", "Qty", "Unit Cost", "Unit Price", "Total", "Active"]
    }

    fn cells(&self, config: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.receipt_no.clone(),
            self.product_name.clone(),
            self.qty.to_string(),
            self.unit_cost_cents
                .map(|c| config.format_currency(c))
                .unwrap_or_else(|| "-".to_string()),
            config.format_currency(self.unit_price_cents),
            config.format_currency(self.total_cents),
            active(self.is_active),
        ]
    }
}

impl TableRow for InventoryLine {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Category", "Price", "On Hand", "Damaged", "Sold"]
    }

    fn cells(&self, config: &AppConfig) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.category_name.as_deref()),
            config.format_currency(self.price_cents),
            self.quantity.to_string(),
            self.damaged.to_string(),
            self.sold.to_string(),
        ]
    }
}
