//! # Command Line Definition
//!
//! ```text
//! stockroom [--db PATH] [--json] [--user NAME --password PW] <screen> <action> [fields]
//!
//!   register   --first-name --last-name        (uses --user / --password)
//!   login                                      (checks credentials, prints session)
//!   category   list | add | update
//!   department list | add | update | delete
//!   warehouse  list | add | update
//!   supplier   list | add | update | delete
//!   product    list | get | add | update | delete
//!   expense    list | add | update | delete
//!   debt       list | add | update
//!   damage     list | add | update | delete
//!   user       list | add | update | delete    (admin)
//!   sale       list | add | update | delete    (update/delete: admin)
//!   report     years | show | export
//!   dashboard
//!   inventory
//! ```
//!
//! Form fields are taken as raw text and validated by the same form types
//! every other entry point uses, so a blank field reports "x is required"
//! rather than a clap usage error.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stockroom_core::forms::{
    DamageForm, DebtForm, ExpenseForm, NameForm, ProductForm, RegistrationForm, ReportForm,
    SaleEditForm, SaleForm, SupplierForm, UserForm, WarehouseForm,
};
use stockroom_core::validation::parse_optional_date;
use stockroom_core::{ActiveFilter, DamageFilter, DebtFilter, SaleFilter, ValidationError};

use crate::config::{AppConfig, ConfigError, ENV_DB_PATH};

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Inventory and sales bookkeeping")]
pub struct Cli {
    /// Database file (overrides STOCKROOM_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Username to open a session with
    #[arg(long, short = 'u', global = true, env = "STOCKROOM_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment configuration with `--db` taking precedence.
    pub fn config(&self) -> Result<AppConfig, ConfigError> {
        AppConfig::from_vars(|name| match (&self.db, name) {
            (Some(path), ENV_DB_PATH) => Some(path.to_string_lossy().into_owned()),
            _ => std::env::var(name).ok(),
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account from --user / --password (the first account is admin)
    Register(RegisterArgs),
    /// Check credentials and show the session
    Login,
    /// Product categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Expense departments
    Department {
        #[command(subcommand)]
        action: DepartmentAction,
    },
    Warehouse {
        #[command(subcommand)]
        action: WarehouseAction,
    },
    Supplier {
        #[command(subcommand)]
        action: SupplierAction,
    },
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    Debt {
        #[command(subcommand)]
        action: DebtAction,
    },
    /// Damaged goods (adjusts stock)
    Damage {
        #[command(subcommand)]
        action: DamageAction,
    },
    /// Accounts (admin only)
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Sales (adjusts stock)
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },
    /// Sales reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Headline figures and chart series
    Dashboard,
    /// On-hand, damaged and sold quantities per product
    Inventory(SearchArgs),
}

// =============================================================================
// Shared Arguments
// =============================================================================

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Substring to match
    #[arg(long, short, default_value = "")]
    pub search: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
}

impl RegisterArgs {
    pub fn form(&self, username: Option<&str>, password: Option<&str>) -> RegistrationForm {
        RegistrationForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: username.unwrap_or_default().to_string(),
            password: password.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Args)]
pub struct NameArgs {
    #[arg(default_value = "")]
    pub name: String,
    /// Store the row as inactive
    #[arg(long)]
    pub inactive: bool,
}

impl NameArgs {
    pub fn form(&self) -> NameForm {
        NameForm {
            name: self.name.clone(),
            is_active: !self.inactive,
        }
    }
}

// =============================================================================
// Reference Data
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    List(SearchArgs),
    Add(NameArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: NameArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum DepartmentAction {
    List(SearchArgs),
    Add(NameArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: NameArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct WarehouseArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub capacity: String,
    #[arg(long)]
    pub inactive: bool,
}

impl WarehouseArgs {
    pub fn form(&self) -> WarehouseForm {
        WarehouseForm {
            name: self.name.clone(),
            location: self.location.clone(),
            capacity: self.capacity.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum WarehouseAction {
    List(SearchArgs),
    Add(WarehouseArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: WarehouseArgs,
    },
}

#[derive(Debug, Args)]
pub struct SupplierArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long)]
    pub inactive: bool,
}

impl SupplierArgs {
    pub fn form(&self) -> SupplierForm {
        SupplierForm {
            name: self.name.clone(),
            contact: self.contact.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SupplierAction {
    List(SearchArgs),
    Add(SupplierArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SupplierArgs,
    },
    Delete {
        id: i64,
    },
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long, default_value = "")]
    pub sku: String,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Category name
    #[arg(long, default_value = "")]
    pub category: String,
    /// Warehouse name
    #[arg(long, default_value = "")]
    pub warehouse: String,
    /// Unit cost, e.g. 1.20
    #[arg(long, default_value = "")]
    pub cost: String,
    /// Unit price, e.g. 2.50
    #[arg(long, default_value = "")]
    pub price: String,
    /// On-hand quantity
    #[arg(long, default_value = "")]
    pub quantity: String,
    #[arg(long)]
    pub inactive: bool,
}

impl ProductArgs {
    pub fn form(&self) -> ProductForm {
        ProductForm {
            sku: self.sku.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            warehouse: self.warehouse.clone(),
            cost: self.cost.clone(),
            price: self.price.clone(),
            quantity: self.quantity.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    List(SearchArgs),
    Get {
        id: i64,
    },
    Add(ProductArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProductArgs,
    },
    Delete {
        id: i64,
    },
    /// Write the filtered list to the reports directory
    Export(SearchArgs),
}

// =============================================================================
// Expenses & Debts
// =============================================================================

#[derive(Debug, Args)]
pub struct ExpenseArgs {
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,
    /// Department name
    #[arg(long, default_value = "")]
    pub department: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub amount: String,
    #[arg(long)]
    pub inactive: bool,
}

impl ExpenseArgs {
    pub fn form(&self) -> ExpenseForm {
        ExpenseForm {
            date: self.date.clone(),
            department: self.department.clone(),
            description: self.description.clone(),
            amount: self.amount.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ExpenseAction {
    List(SearchArgs),
    Add(ExpenseArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ExpenseArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct DebtArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub amount: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub due_date: String,
    #[arg(long, default_value = "")]
    pub status: String,
    #[arg(long)]
    pub inactive: bool,
}

impl DebtArgs {
    pub fn form(&self) -> DebtForm {
        DebtForm {
            name: self.name.clone(),
            amount: self.amount.clone(),
            due_date: self.due_date.clone(),
            status: self.status.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Args)]
pub struct DebtListArgs {
    /// Matches name or status
    #[arg(long, short, default_value = "")]
    pub search: String,
    /// Exact due date, YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub due: String,
    /// all | active | inactive
    #[arg(long, default_value = "all")]
    pub active: String,
}

impl DebtListArgs {
    pub fn filter(&self) -> Result<DebtFilter, ValidationError> {
        Ok(DebtFilter {
            search: self.search.clone(),
            due_date: parse_optional_date("due date", &self.due)?,
            active: self.active.parse::<ActiveFilter>()?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum DebtAction {
    List(DebtListArgs),
    Add(DebtArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: DebtArgs,
    },
}

// =============================================================================
// Damaged Goods
// =============================================================================

#[derive(Debug, Args)]
pub struct DamageArgs {
    /// Product name
    #[arg(long, default_value = "")]
    pub product: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub qty: String,
    #[arg(long, default_value = "")]
    pub reason: String,
    #[arg(long)]
    pub inactive: bool,
}

impl DamageArgs {
    pub fn form(&self) -> DamageForm {
        DamageForm {
            product: self.product.clone(),
            date: self.date.clone(),
            qty: self.qty.clone(),
            reason: self.reason.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Args)]
pub struct DamageListArgs {
    /// Matches product name or reason
    #[arg(long, short, default_value = "")]
    pub search: String,
    /// Exact product name
    #[arg(long)]
    pub product: Option<String>,
    #[arg(long, default_value = "")]
    pub from: String,
    #[arg(long, default_value = "")]
    pub to: String,
}

impl DamageListArgs {
    pub fn filter(&self) -> Result<DamageFilter, ValidationError> {
        Ok(DamageFilter {
            search: self.search.clone(),
            product: self
                .product
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            from: parse_optional_date("from", &self.from)?,
            to: parse_optional_date("to", &self.to)?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum DamageAction {
    List(DamageListArgs),
    Add(DamageArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: DamageArgs,
    },
    Delete {
        id: i64,
    },
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Args)]
pub struct UserArgs {
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub username: String,
    /// Required for `add`; leave out on `update` to keep the current one
    #[arg(long, default_value = "")]
    pub set_password: String,
    /// admin | user
    #[arg(long, default_value = "user")]
    pub role: String,
    #[arg(long)]
    pub inactive: bool,
}

impl UserArgs {
    pub fn form(&self) -> UserForm {
        UserForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            password: self.set_password.clone(),
            role: self.role.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UserAction {
    List(SearchArgs),
    Add(UserArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: UserArgs,
    },
    Delete {
        id: i64,
    },
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Args)]
pub struct SaleArgs {
    #[arg(long, default_value = "")]
    pub receipt: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,
    /// Product id, or "id: name" as shown by `product list`
    #[arg(long, default_value = "")]
    pub product: String,
    #[arg(long, default_value = "")]
    pub qty: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long)]
    pub inactive: bool,
}

impl SaleArgs {
    pub fn form(&self) -> SaleForm {
        SaleForm {
            receipt_no: self.receipt.clone(),
            date: self.date.clone(),
            product: self.product.clone(),
            qty: self.qty.clone(),
            notes: self.notes.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Args)]
pub struct SaleEditArgs {
    #[arg(long, default_value = "")]
    pub receipt: String,
    #[arg(long, default_value = "")]
    pub qty: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long)]
    pub inactive: bool,
}

impl SaleEditArgs {
    pub fn form(&self) -> SaleEditForm {
        SaleEditForm {
            receipt_no: self.receipt.clone(),
            qty: self.qty.clone(),
            notes: self.notes.clone(),
            is_active: !self.inactive,
        }
    }
}

#[derive(Debug, Args)]
pub struct SaleListArgs {
    /// Product-name substring
    #[arg(long, short, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "")]
    pub from: String,
    #[arg(long, default_value = "")]
    pub to: String,
    /// all | active | inactive
    #[arg(long, default_value = "all")]
    pub active: String,
}

impl SaleListArgs {
    pub fn filter(&self) -> Result<SaleFilter, ValidationError> {
        Ok(SaleFilter {
            search: self.search.clone(),
            from: parse_optional_date("from", &self.from)?,
            to: parse_optional_date("to", &self.to)?,
            active: self.active.parse::<ActiveFilter>()?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum SaleAction {
    List(SaleListArgs),
    Add(SaleArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SaleEditArgs,
    },
    Delete {
        id: i64,
        /// Return the sold quantity to stock
        #[arg(long)]
        restock: bool,
    },
    /// Write the filtered list to the reports directory
    Export(SaleListArgs),
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, default_value = "")]
    pub year: String,
    /// 01-12, or "All" / blank for the whole year
    #[arg(long, default_value = "")]
    pub month: String,
}

impl ReportArgs {
    pub fn form(&self) -> ReportForm {
        ReportForm {
            year: self.year.clone(),
            month: self.month.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ReportAction {
    /// Years that have sales
    Years,
    Show(ReportArgs),
    /// Write the report to the reports directory
    Export(ReportArgs),
}
