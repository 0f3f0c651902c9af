//! # Validation Module
//!
//! Input validation rules, applied by the API layer before any business
//! logic or database work runs. Field names in errors use the wire names
//! so clients see the field they actually sent.

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MIN_NAME_LEN, MIN_PASSWORD_LEN};

/// Result type for validation checks.
pub type ValidationResult = Result<(), ValidationError>;

/// Validates an email address.
///
/// Deliberately loose: one `@` with a non-empty local part and a domain
/// containing a dot. Real validation happens when the mailbox is used.
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a registration password.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validates a person name field (`nombre`, `apellido`).
pub fn validate_name(field: &str, value: &str) -> ValidationResult {
    if value.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a medication description.
pub fn validate_description(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "descripcionMed".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i32) -> ValidationResult {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a requested order-line quantity.
pub fn validate_quantity(quantity: i32) -> ValidationResult {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "cantidadRequerida".to_string(),
        });
    }
    Ok(())
}

/// Validates a sale price. Decimal precision is already enforced by the
/// [`Money`] deserializer; this rejects negative amounts.
pub fn validate_price(field: &str, price: Money) -> ValidationResult {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(validate_email("user@pharmacy.com").is_ok());
        assert!(validate_email("  user@pharmacy.com  ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@pharmacy.com").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("abcdef").is_ok());
        assert!(validate_password("abcde").is_err());
    }

    #[test]
    fn name_minimum_length_counts_chars_not_bytes() {
        assert!(validate_name("nombre", "Jo").is_ok());
        assert!(validate_name("nombre", "Ñé").is_ok());
        assert!(validate_name("nombre", "J").is_err());
        assert!(validate_name("apellido", "  ").is_err());
    }

    #[test]
    fn stock_and_quantity_bounds() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(validate_price("precioVentaUni", Money::from_cents(0)).is_ok());
        assert!(validate_price("precioVentaUni", Money::from_cents(-1)).is_err());
    }
}
