//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate contains the domain of Stockroom, a small inventory and sales
//! bookkeeping application, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  `stockroom` CLI (apps/cli)                     │   │
//! │  │    login ──► sale add ──► report show ──► dashboard            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands::*(&state, &session, form)    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   forms   │  │   stock   │  │   auth    │  │   │
//! │  │   │  Product  │  │ *Form →   │  │ StockChg  │  │  sha256   │  │   │
//! │  │   │  Session  │  │  *Draft   │  │  deltas   │  │  roles    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockroom-db (Database Layer)                  │   │
//! │  │         SQLite, migrations, repositories, transactions          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, `Session`, filters, report and dashboard models
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`forms`] - Raw form input and the validated drafts repositories accept
//! - [`validation`] - Field parsers (required, numbers, dates, references)
//! - [`stock`] - On-hand quantity deltas for sales and damage records
//! - [`auth`] - Password digests and first-account role assignment
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::forms::SaleForm;
//! use stockroom_core::stock::StockChange;
//!
//! let draft = SaleForm {
//!     receipt_no: "R-1001".into(),
//!     date: "2024-03-09".into(),
//!     product: "1: Green Tea".into(),
//!     qty: "5".into(),
//!     notes: String::new(),
//!     is_active: true,
//! }
//! .validate()
//! .unwrap();
//!
//! let change = StockChange::remove(draft.product_id, draft.qty);
//! assert_eq!(change.change, -5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod forms;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stock::StockChange;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products at or below this quantity count as low stock on the dashboard
/// unless configured otherwise.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Chart label for sales of products without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Maximum length of free-text fields.
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum SKU length.
pub const MAX_SKU_LEN: usize = 50;

/// Largest quantity a form accepts (sale, damage, opening stock, capacity).
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest money amount a form accepts, in cents (10,000,000.00).
///
/// `MAX_QUANTITY × MAX_AMOUNT_CENTS` stays below `i64::MAX`, so a line
/// total built from form input always fits.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000;
