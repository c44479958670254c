//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data           Stock-bearing             Bookkeeping         │
//! │  ──────────────           ─────────────             ───────────         │
//! │  Category                 Product ◄─────┐           Expense             │
//! │  Department                 ▲ quantity  │           Debt                │
//! │  Warehouse                  │           │                               │
//! │  Supplier                 Sale ─────────┤  each row decrements the      │
//! │  User                     DamageRecord ─┘  product's running balance    │
//! │                                                                         │
//! │  Read models: InventoryLine, SalesReport, DashboardSummary             │
//! │  Actor:       Session (explicit, passed to every operation)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Rows are keyed by SQLite integer ids. Business keys (SKU, username,
//! category/department/supplier name) are unique where the schema says so.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Role & Session
// =============================================================================

/// Account role. The first registered account is `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May edit/delete sales and manage accounts.
    Admin,
    /// Day-to-day data entry.
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "user".to_string()],
            }),
        }
    }
}

/// The authenticated actor, handed explicitly to every operation.
///
/// ## Lifecycle
/// ```text
/// login(username, password)
///      │
///      ▼
/// Session { id, user_id, role, ... }
///      │
///      ├──► sales::record(&session, ...)
///      ├──► sales::update(&session, ...)   ← require_admin()
///      └──► users::delete(&session, ...)   ← require_admin()
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Opens a session for an authenticated user.
    pub fn new(user: &User) -> Self {
        Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.display_name(),
            role: user.role,
            started_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `PermissionDenied` unless the session is an admin.
    ///
    /// ## Arguments
    /// * `action` - Short description used in the error ("delete sale")
    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                action: action.to_string(),
            })
        }
    }
}

// =============================================================================
// Active Filter
// =============================================================================

/// Tri-state filter on the `is_active` flag used by list screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActiveFilter {
    /// The `is_active` value to match, or `None` for no restriction.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ActiveFilter::All => None,
            ActiveFilter::Active => Some(true),
            ActiveFilter::Inactive => Some(false),
        }
    }
}

impl FromStr for ActiveFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ActiveFilter::All),
            "active" => Ok(ActiveFilter::Active),
            "inactive" => Ok(ActiveFilter::Inactive),
            _ => Err(ValidationError::NotAllowed {
                field: "active filter".to_string(),
                allowed: vec!["all".into(), "active".into(), "inactive".into()],
            }),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// SHA-256 hex digest. Never leaves the process in serialized output.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// Reference Data
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A storage location products are assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
///
/// `quantity` is a running balance: it starts at the value entered on the
/// product form and is decremented by every sale and damage record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    /// Joined from `categories` for display.
    pub category_name: Option<String>,
    pub warehouse_id: Option<i64>,
    /// Joined from `warehouses` for display.
    pub warehouse_name: Option<String>,
    pub cost_cents: i64,
    pub price_cents: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Bookkeeping
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub description: String,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// An amount owed, tracked until its status says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Debt {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Damaged goods written off against a product's stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DamageRecord {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub date: NaiveDate,
    pub qty: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one product.
///
/// Unit cost and price are joined from the product at read time; the sale
/// row itself stores only the quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub receipt_no: String,
    pub date: NaiveDate,
    pub product_id: i64,
    pub product_name: String,
    pub qty: i64,
    pub notes: String,
    pub unit_cost_cents: i64,
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Sale {
    /// `qty × price`.
    ///
    /// ## Returns
    /// * `Err(CoreError::Overflow)` - The total does not fit in `i64` cents
    pub fn total(&self) -> CoreResult<Money> {
        Money::from_cents(self.unit_price_cents)
            .multiply_quantity(self.qty)
            .ok_or_else(|| CoreError::Overflow {
                what: format!("Total for sale {}", self.id),
            })
    }
}

// =============================================================================
// List Filters
// =============================================================================

/// Filter for the sales list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Product-name substring.
    pub search: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub active: ActiveFilter,
}

/// Filter for the debts list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtFilter {
    /// Matches name or status.
    pub search: String,
    pub due_date: Option<NaiveDate>,
    pub active: ActiveFilter,
}

/// Filter for the damaged-goods list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageFilter {
    /// Matches product name or reason.
    pub search: String,
    /// Exact product name.
    pub product: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// =============================================================================
// Inventory View
// =============================================================================

/// One row of the inventory overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryLine {
    pub id: i64,
    pub name: String,
    pub category_name: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
    pub damaged: i64,
    pub sold: i64,
}

// =============================================================================
// Sales Report
// =============================================================================

/// The year and optional month a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: Option<u32>,
}

impl ReportPeriod {
    /// `"Sales Report for 2024"` or `"Sales Report for 2024-03"`.
    pub fn title(&self) -> String {
        match self.month {
            Some(month) => format!("Sales Report for {}-{:02}", self.year, month),
            None => format!("Sales Report for {}", self.year),
        }
    }

    /// `sales_report_2024_03.txt` or `sales_report_2024_all.txt`.
    pub fn file_name(&self) -> String {
        match self.month {
            Some(month) => format!("sales_report_{}_{:02}.txt", self.year, month),
            None => format!("sales_report_{}_all.txt", self.year),
        }
    }
}

/// Per-product totals for a report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReportLine {
    pub product_name: String,
    pub total_qty: i64,
    pub total_cost_cents: i64,
    pub total_sales_cents: i64,
}

/// The aggregate behind the report screen.
///
/// An empty report is a normal outcome ("no data"), not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub lines: Vec<ReportLine>,
}

impl SalesReport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line quantities, saturating like the money totals.
    pub fn total_qty(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.total_qty))
    }

    pub fn total_cost(&self) -> Money {
        self.lines
            .iter()
            .map(|l| Money::from_cents(l.total_cost_cents))
            .sum()
    }

    pub fn total_sales(&self) -> Money {
        self.lines
            .iter()
            .map(|l| Money::from_cents(l.total_sales_cents))
            .sum()
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// One bar of a dashboard chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ChartPoint {
    pub label: String,
    pub value_cents: i64,
}

/// Headline figures and chart series for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_quantity: i64,
    pub total_sales_cents: i64,
    pub total_categories: i64,
    pub total_suppliers: i64,
    pub total_expenses_cents: i64,
    pub top_quantity: i64,
    pub low_stock_threshold: i64,
    pub low_stock_count: i64,
    pub sales_by_category: Vec<ChartPoint>,
    pub expenses_by_department: Vec<ChartPoint>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            username: "ada".to_string(),
            password_hash: "x".to_string(),
            role,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    #[test]
    fn test_session_from_user() {
        let session = Session::new(&user(Role::User));
        assert_eq!(session.user_id, 7);
        assert_eq!(session.display_name, "Ada Okafor");
        assert!(!session.is_admin());
        assert!(matches!(
            session.require_admin("delete sale"),
            Err(CoreError::PermissionDenied { .. })
        ));

        let admin = Session::new(&user(Role::Admin));
        assert!(admin.require_admin("delete sale").is_ok());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&user(Role::Admin)).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }

    #[test]
    fn test_role_and_filter_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());

        assert_eq!("inactive".parse::<ActiveFilter>().unwrap(), ActiveFilter::Inactive);
        assert_eq!(ActiveFilter::Active.as_flag(), Some(true));
        assert_eq!(ActiveFilter::All.as_flag(), None);
    }

    #[test]
    fn test_report_period_naming() {
        let month = ReportPeriod { year: 2024, month: Some(3) };
        assert_eq!(month.title(), "Sales Report for 2024-03");
        assert_eq!(month.file_name(), "sales_report_2024_03.txt");

        let year = ReportPeriod { year: 2024, month: None };
        assert_eq!(year.title(), "Sales Report for 2024");
        assert_eq!(year.file_name(), "sales_report_2024_all.txt");
    }

    #[test]
    fn test_report_totals() {
        let report = SalesReport {
            period: ReportPeriod { year: 2024, month: None },
            lines: vec![
                ReportLine {
                    product_name: "Green Tea".into(),
                    total_qty: 3,
                    total_cost_cents: 300,
                    total_sales_cents: 600,
                },
                ReportLine {
                    product_name: "Rooibos".into(),
                    total_qty: 2,
                    total_cost_cents: 150,
                    total_sales_cents: 500,
                },
            ],
        };
        assert!(!report.is_empty());
        assert_eq!(report.total_qty(), 5);
        assert_eq!(report.total_cost().cents(), 450);
        assert_eq!(report.total_sales().cents(), 1100);
    }

    fn sale(qty: i64, unit_price_cents: i64) -> Sale {
        let now = Utc::now();
        Sale {
            id: 3,
            receipt_no: "R-1".to_string(),
            date: now.date_naive(),
            product_id: 1,
            product_name: "Green Tea".to_string(),
            qty,
            notes: String::new(),
            unit_cost_cents: 120,
            unit_price_cents,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    #[test]
    fn test_sale_total() {
        assert_eq!(sale(5, 250).total().unwrap().cents(), 1250);

        let err = sale(100_000_000_000_000_000, 250).total().unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
        assert_eq!(err.to_string(), "Total for sale 3 is out of range");
    }

    #[test]
    fn test_report_totals_saturate() {
        let line = ReportLine {
            product_name: "Green Tea".into(),
            total_qty: i64::MAX,
            total_cost_cents: i64::MAX,
            total_sales_cents: i64::MAX,
        };
        let report = SalesReport {
            period: ReportPeriod { year: 2024, month: None },
            lines: vec![line.clone(), line],
        };

        assert_eq!(report.total_qty(), i64::MAX);
        assert_eq!(report.total_cost().cents(), i64::MAX);
        assert_eq!(report.total_sales().cents(), i64::MAX);
    }
}
