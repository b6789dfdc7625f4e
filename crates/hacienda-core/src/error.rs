//! # Error Types
//!
//! Domain-specific error types for hacienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  hacienda-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  hacienda-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Tauri API errors (in app)                                          │
//! │  └── ApiError         - What the frontend sees (serialized)         │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (category, status, field)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::FacturaStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are caught at the command layer and translated to user notifications.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale line references a category with no price in the price list.
    ///
    /// ## When This Occurs
    /// - Pricing step of the wizard confirmed without a price for every
    ///   category in the selection
    ///
    /// The legacy behavior (price silently taken as zero, or an average of
    /// the known prices) produced wrong totals; a missing price is a hard
    /// error here and the operation aborts with no partial state.
    #[error("No price defined for category '{category}'")]
    MissingCategoryPrice { category: String },

    /// Requested status change violates the factura state machine.
    ///
    /// ## When This Occurs
    /// - Paying a factura that was never emitted
    /// - Annulling an already paid factura
    /// - Any transition out of a terminal state
    #[error("Factura cannot go from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: FacturaStatus,
        to: FacturaStatus,
    },

    /// A sale has more lots than the configured maximum.
    #[error("Sale cannot have more than {max} lots")]
    TooManyLots { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive (> 0).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative (>= 0).
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed CUIT).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A counter may never move backward.
    ///
    /// Guards the numbering invariant: `last_number` is monotonically
    /// non-decreasing over a configuration's lifetime.
    #[error("{field} cannot decrease from {current} to {requested}")]
    MustNotDecrease {
        field: String,
        current: i64,
        requested: i64,
    },
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
        let err = CoreError::MissingCategoryPrice {
            category: "Novillo".to_string(),
        };
        assert_eq!(err.to_string(), "No price defined for category 'Novillo'");

        let err = CoreError::InvalidStatusTransition {
            from: FacturaStatus::Pagada,
            to: FacturaStatus::Anulada,
        };
        assert_eq!(err.to_string(), "Factura cannot go from Pagada to Anulada");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "buyer".to_string(),
        };
        assert_eq!(err.to_string(), "buyer is required");

        let err = ValidationError::MustNotDecrease {
            field: "last_number".to_string(),
            current: 42,
            requested: 7,
        };
        assert_eq!(err.to_string(), "last_number cannot decrease from 42 to 7");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "punto_venta".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
