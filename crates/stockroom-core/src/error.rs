//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule failures (role, login, stock)    │
//! │  └── ValidationError  - Form input failures (before any DB call)       │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Operator     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The session's role does not allow the requested operation.
    ///
    /// ## When This Occurs
    /// - A `user` session edits or deletes a sale
    /// - A `user` session adds, edits or deletes an account
    #[error("Permission denied: {action} requires an admin session")]
    PermissionDenied { action: String },

    /// Username/password pair did not match an active account.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Insufficient stock to complete a sale or damage record.
    ///
    /// ## When This Occurs
    /// Only when negative stock is disallowed by configuration:
    /// ```text
    /// Record sale (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: on hand = 3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "TEA-01", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A stock balance or money total no longer fits in `i64`.
    ///
    /// Form limits keep new rows well inside the range; this guards the
    /// arithmetic against rows written before those limits existed.
    #[error("{what} is out of range")]
    Overflow { what: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while turning raw form text into typed drafts, so the database
/// is never touched when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field does not parse as a number.
    #[error("{field} must be a number (got '{value}')")]
    InvalidNumber { field: String, value: String },

    /// Field does not parse as a `YYYY-MM-DD` calendar date.
    #[error("{field} must be a date in YYYY-MM-DD format (got '{value}')")]
    InvalidDate { field: String, value: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. SKU characters, product reference).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A report export was requested for a period without sales.
    #[error("No data to export")]
    NothingToExport,
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
