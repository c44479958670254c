//! # Forms
//!
//! Raw operator input for every data-entry screen, and the validated drafts
//! the repositories accept.
//!
//! ## Flow
//! ```text
//! ProductForm { sku: " TEA-01 ", cost: "1.20", quantity: "20", ... }
//!      │
//!      │  .validate()   ← required fields, numbers, dates (no I/O)
//!      ▼
//! ProductDraft { sku: "TEA-01", cost: Money(120), quantity: 20, ... }
//!      │
//!      │  db.products().insert(&draft)   ← name lookups, UNIQUE checks
//!      ▼
//! Product { id: 1, ... }
//! ```
//!
//! Forms hold text exactly as typed so that the validation notice can quote
//! it back. Drafts that reference other rows by name (category, warehouse,
//! department, product) keep the name; the repository resolves it among
//! active rows inside the write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{ReportPeriod, Role};
use crate::validation::{
    optional, parse_count, parse_date, parse_integer, parse_money, parse_month,
    parse_product_ref, parse_quantity, parse_year, require, validate_sku, ValidationResult,
};

fn default_active() -> bool {
    true
}

// =============================================================================
// Categories / Departments
// =============================================================================

/// Single-name screens (categories, departments).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameForm {
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDraft {
    pub name: String,
    pub is_active: bool,
}

impl NameForm {
    pub fn new(name: impl Into<String>) -> Self {
        NameForm {
            name: name.into(),
            is_active: true,
        }
    }

    pub fn validate(&self) -> ValidationResult<NameDraft> {
        Ok(NameDraft {
            name: require("name", &self.name)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Warehouses
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseForm {
    pub name: String,
    pub location: String,
    pub capacity: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseDraft {
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub is_active: bool,
}

impl WarehouseForm {
    pub fn validate(&self) -> ValidationResult<WarehouseDraft> {
        Ok(WarehouseDraft {
            name: require("name", &self.name)?,
            location: require("location", &self.location)?,
            capacity: parse_count("capacity", &self.capacity)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Suppliers
// =============================================================================

/// Every supplier field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierForm {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub is_active: bool,
}

impl SupplierForm {
    pub fn validate(&self) -> ValidationResult<SupplierDraft> {
        Ok(SupplierDraft {
            name: require("name", &self.name)?,
            contact: require("contact", &self.contact)?,
            phone: require("phone", &self.phone)?,
            email: require("email", &self.email)?,
            address: require("address", &self.address)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductForm {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category name, resolved among active categories.
    pub category: String,
    /// Warehouse name, resolved among active warehouses.
    pub warehouse: String,
    pub cost: String,
    pub price: String,
    pub quantity: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub warehouse: String,
    pub cost: Money,
    pub price: Money,
    pub quantity: i64,
    pub is_active: bool,
}

impl ProductForm {
    pub fn validate(&self) -> ValidationResult<ProductDraft> {
        Ok(ProductDraft {
            sku: validate_sku(&self.sku)?,
            name: require("name", &self.name)?,
            description: optional("description", &self.description)?,
            category: require("category", &self.category)?,
            warehouse: require("warehouse", &self.warehouse)?,
            cost: parse_money("cost", &self.cost)?,
            price: parse_money("price", &self.price)?,
            quantity: parse_integer("quantity", &self.quantity)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub date: String,
    /// Department name, resolved among active departments.
    pub department: String,
    pub description: String,
    pub amount: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub department: String,
    pub description: String,
    pub amount: Money,
    pub is_active: bool,
}

impl ExpenseForm {
    pub fn validate(&self) -> ValidationResult<ExpenseDraft> {
        Ok(ExpenseDraft {
            date: parse_date("date", &self.date)?,
            department: require("department", &self.department)?,
            description: require("description", &self.description)?,
            amount: parse_money("amount", &self.amount)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Debts
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtForm {
    pub name: String,
    pub amount: String,
    pub due_date: String,
    /// Free text ("pending", "paid", ...).
    pub status: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtDraft {
    pub name: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub status: String,
    pub is_active: bool,
}

impl DebtForm {
    pub fn validate(&self) -> ValidationResult<DebtDraft> {
        Ok(DebtDraft {
            name: require("name", &self.name)?,
            amount: parse_money("amount", &self.amount)?,
            due_date: parse_date("due date", &self.due_date)?,
            status: require("status", &self.status)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Damaged Goods
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageForm {
    /// Product name, resolved among active products.
    pub product: String,
    pub date: String,
    pub qty: String,
    pub reason: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageDraft {
    pub product: String,
    pub date: NaiveDate,
    pub qty: i64,
    pub reason: String,
    pub is_active: bool,
}

impl DamageForm {
    pub fn validate(&self) -> ValidationResult<DamageDraft> {
        Ok(DamageDraft {
            product: require("product", &self.product)?,
            date: parse_date("date", &self.date)?,
            qty: parse_quantity("qty", &self.qty)?,
            reason: require("reason", &self.reason)?,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Sales
// =============================================================================

/// New sale entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleForm {
    pub receipt_no: String,
    pub date: String,
    /// `"<id>"` or `"<id>: <name>"`.
    pub product: String,
    pub qty: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub receipt_no: String,
    pub date: NaiveDate,
    pub product_id: i64,
    pub qty: i64,
    pub notes: String,
    pub is_active: bool,
}

impl SaleForm {
    pub fn validate(&self) -> ValidationResult<SaleDraft> {
        Ok(SaleDraft {
            receipt_no: require("receipt no", &self.receipt_no)?,
            date: parse_date("date", &self.date)?,
            product_id: parse_product_ref(&self.product)?,
            qty: parse_quantity("qty", &self.qty)?,
            notes: self.notes.trim().to_string(),
            is_active: self.is_active,
        })
    }
}

/// Edit of an existing sale. Product and date are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleEditForm {
    pub receipt_no: String,
    pub qty: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEdit {
    pub receipt_no: String,
    pub qty: i64,
    pub notes: String,
    pub is_active: bool,
}

impl SaleEditForm {
    pub fn validate(&self) -> ValidationResult<SaleEdit> {
        Ok(SaleEdit {
            receipt_no: require("receipt no", &self.receipt_no)?,
            qty: parse_quantity("qty", &self.qty)?,
            notes: self.notes.trim().to_string(),
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Users
// =============================================================================

/// Self-registration (login screen).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> ValidationResult<Registration> {
        Ok(Registration {
            first_name: require("first name", &self.first_name)?,
            last_name: require("last name", &self.last_name)?,
            username: require("username", &self.username)?,
            password: require_password(&self.password)?,
        })
    }
}

/// Account management screen (admin only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// Blank on update keeps the current password.
    #[serde(default)]
    pub password: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// `None` means "leave the stored hash alone".
    pub password: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

impl UserForm {
    /// Validates a new account: the password is required.
    pub fn validate_new(&self) -> ValidationResult<UserDraft> {
        let mut draft = self.validate_common()?;
        draft.password = Some(require_password(&self.password)?);
        Ok(draft)
    }

    /// Validates an edit: a blank password keeps the old one.
    pub fn validate_update(&self) -> ValidationResult<UserDraft> {
        let mut draft = self.validate_common()?;
        if !self.password.is_empty() {
            draft.password = Some(require_password(&self.password)?);
        }
        Ok(draft)
    }

    fn validate_common(&self) -> ValidationResult<UserDraft> {
        Ok(UserDraft {
            first_name: require("first name", &self.first_name)?,
            last_name: require("last name", &self.last_name)?,
            username: require("username", &self.username)?,
            password: None,
            role: require("role", &self.role)?.parse()?,
            is_active: self.is_active,
        })
    }
}

// Passwords are not trimmed; only an all-blank value is rejected.
fn require_password(password: &str) -> ValidationResult<String> {
    require("password", password)?;
    Ok(password.to_string())
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportForm {
    pub year: String,
    /// `"01"`..`"12"`, or blank / `"All"` for the whole year.
    #[serde(default)]
    pub month: String,
}

impl ReportForm {
    pub fn validate(&self) -> ValidationResult<ReportPeriod> {
        Ok(ReportPeriod {
            year: parse_year(&self.year)?,
            month: parse_month(&self.month)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
