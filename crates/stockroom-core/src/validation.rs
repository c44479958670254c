//! # Validation Module
//!
//! Parsers and checks that turn raw form text into typed values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form parsing (THIS MODULE, via forms.rs)                     │
//! │  ├── Required fields, numeric/date parsing, sign checks                │
//! │  └── Fails with ValidationError; the database is never touched         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository lookups (stockroom-db)                            │
//! │  └── Category/warehouse/department/product by name → NotFound          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints → UniqueViolation ("already exists")           │
//! │  └── Foreign key constraints → ForeignKeyViolation                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_quantity, parse_date};
//!
//! assert_eq!(parse_quantity("qty", "5").unwrap(), 5);
//! assert!(parse_quantity("qty", "0").is_err());
//! assert!(parse_date("date", "2024-02-30").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_QUANTITY, MAX_SKU_LEN, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format used by every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Text
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_TEXT_LEN`] characters
pub fn require(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    check_length(field, value, MAX_TEXT_LEN)?;
    Ok(value.to_string())
}

/// Trims an optional value; blank becomes `None`.
pub fn optional(field: &str, value: &str) -> ValidationResult<Option<String>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    check_length(field, value, MAX_TEXT_LEN)?;
    Ok(Some(value.to_string()))
}

fn check_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert_eq!(validate_sku(" TEA-01 ").unwrap(), "TEA-01");
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<String> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    check_length("sku", sku, MAX_SKU_LEN)?;

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(sku.to_string())
}

// =============================================================================
// Numbers
// =============================================================================

/// Parses a required integer field.
pub fn parse_integer(field: &str, value: &str) -> ValidationResult<i64> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    value.parse::<i64>().map_err(|_| ValidationError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parses a quantity that must be strictly positive (sales, damage).
///
/// ## User Workflow
/// ```text
/// Operator enters qty: "0"
///      │
///      ▼
/// parse_quantity("qty", "0") ← THIS FUNCTION
///      │
///      ├── not a number? → "qty must be a number"
///      ├── qty <= 0?     → "qty must be positive"
///      ├── qty too big?  → "qty must be between 1 and 1000000000"
///      └── OK            → record the sale
/// ```
pub fn parse_quantity(field: &str, value: &str) -> ValidationResult<i64> {
    let qty = parse_integer(field, value)?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(qty)
}

/// Parses a count that may be zero but not negative (opening stock, capacity).
pub fn parse_count(field: &str, value: &str) -> ValidationResult<i64> {
    let count = parse_integer(field, value)?;

    if !(0..=MAX_QUANTITY).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(count)
}

/// Parses a non-negative money amount (`"12.50"`).
pub fn parse_money(field: &str, value: &str) -> ValidationResult<Money> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    let amount = Money::parse(value).ok_or_else(|| ValidationError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })?;

    if amount.is_negative() || amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS / 100,
        });
    }

    Ok(amount)
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a required `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parses an optional `YYYY-MM-DD` date; blank becomes `None`.
pub fn parse_optional_date(field: &str, value: &str) -> ValidationResult<Option<NaiveDate>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

/// Parses a report year (1900-9999).
pub fn parse_year(value: &str) -> ValidationResult<i32> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required("year"));
    }

    let year = parse_integer("year", value)?;
    if !(1900..=9999).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: 1900,
            max: 9999,
        });
    }

    Ok(year as i32)
}

/// Parses a report month: blank or `"all"` means the whole year.
pub fn parse_month(value: &str) -> ValidationResult<Option<u32>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let month = parse_integer("month", value)?;
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(Some(month as u32))
}

// =============================================================================
// References
// =============================================================================

/// Parses a product reference as shown in pickers: `"12"` or `"12: Green Tea"`.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_product_ref;
///
/// assert_eq!(parse_product_ref("12: Green Tea").unwrap(), 12);
/// assert_eq!(parse_product_ref("12").unwrap(), 12);
/// assert!(parse_product_ref("Green Tea").is_err());
/// ```
pub fn parse_product_ref(value: &str) -> ValidationResult<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required("product"));
    }

    let id_part = value.split_once(':').map_or(value, |(id, _)| id).trim();

    match id_part.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: "expected '<id>' or '<id>: <name>'".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
