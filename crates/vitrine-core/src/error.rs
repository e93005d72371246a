//! # Error Types
//!
//! Domain-specific error types for vitrine-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrine-core errors (this file)                                        │
//! │  ├── CoreError        - Session / gating violations                     │
//! │  ├── ValidationError  - Product form failures (shown as a warning)      │
//! │  └── AuthError        - Bad credentials (shown as an error)             │
//! │                                                                         │
//! │  vitrine-db errors    └── DbError   - Database failures                 │
//! │  vitrine-blob errors  └── BlobError - Storage failures                  │
//! │                                                                         │
//! │  storefront errors    └── ApiError  - What the UI client sees           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and authentication failures are not fatal: the handlers turn
//! them into a [`crate::view::Notice`] on the re-rendered page.

use thiserror::Error;

use crate::session::Page;

// =============================================================================
// Core Error
// =============================================================================

/// Session and business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A create/update/delete was attempted without logging in.
    #[error("Operator login required")]
    NotAuthenticated,

    /// The requested action is not available on the current page.
    ///
    /// ## When This Occurs
    /// - Pressing "back" or "finalize" outside the checkout page
    /// - Buying a product before the login page has been passed
    #[error("Cannot {action} while on the {page:?} page")]
    InvalidTransition { page: Page, action: &'static str },

    /// Checkout was reached without a selected product.
    #[error("No product selected")]
    NoProductSelected,

    /// Product id does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// A create or update that fails validation never reaches the gateways.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Auth Error
// =============================================================================

/// Login failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username unknown or password mismatch. The two cases are not
    /// distinguished in the message.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            page: Page::Login,
            action: "finalize a purchase",
        };
        assert_eq!(
            err.to_string(),
            "Cannot finalize a purchase while on the Login page"
        );
        assert_eq!(
            CoreError::ProductNotFound(42).to_string(),
            "Product not found: 42"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must be positive");
    }
}
