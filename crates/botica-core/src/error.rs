//! # Error Types
//!
//! Domain-specific error types for botica-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError → CoreError → DbError (botica-db) → ApiError (apps/api)
//! ```
//!
//! The `#[error]` strings double as the client-facing messages for business
//! rule violations, so they match the wording the legacy API used
//! ("Insufficient stock for ...", "Only pending orders can be edited").

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and domain logic failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A requested order line references a medication that does not exist.
    #[error("Medication with ID {0} not found")]
    MedicationNotFound(i32),

    /// Remaining stock cannot cover the requested quantity.
    #[error("Insufficient stock for {description}")]
    InsufficientStock {
        description: String,
        available: i32,
        requested: i32,
    },

    /// An order must carry at least one line.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// Edit or delete attempted on an order that left the Pending state.
    #[error("Only pending orders can be edited")]
    OrderNotPending { id: i32, status: OrderStatus },

    /// Integer overflow while totaling an order.
    #[error("Order total exceeds the representable amount")]
    AmountOverflow,

    /// Input validation failure (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Invalid format (bad email, too many price decimals, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },
}

impl ValidationError {
    /// The wire name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustBeNonNegative { field } => field,
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_error_messages_match_legacy_wording() {
        let err = CoreError::MedicationNotFound(42);
        assert_eq!(err.to_string(), "Medication with ID 42 not found");

        let err = CoreError::InsufficientStock {
            description: "Paracetamol 500mg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(err.to_string(), "Insufficient stock for Paracetamol 500mg");

        let err = CoreError::OrderNotPending {
            id: 7,
            status: OrderStatus::Approved,
        };
        assert_eq!(err.to_string(), "Only pending orders can be edited");
    }

    #[test]
    fn validation_error_messages() {
        let err = ValidationError::Required {
            field: "descripcionMed".to_string(),
        };
        assert_eq!(err.to_string(), "descripcionMed is required");

        let err = ValidationError::TooShort {
            field: "nombre".to_string(),
            min: 2,
        };
        assert_eq!(err.to_string(), "nombre must be at least 2 characters");
    }

    #[test]
    fn validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "cantidadRequerida".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
