//! # Order Pricing
//!
//! The validation half of the order-creation workflow, as a pure function.
//!
//! ## Workflow Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /ordenes                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fetch each requested medication          (botica-db)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_order()  ← THIS MODULE                                           │
//! │    missing medication?  → error, nothing written                        │
//! │    stock < requested?   → error, nothing written                        │
//! │    snapshot description + unit price, subtotal, running total           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  one transaction: insert order + lines, decrement stock (botica-db)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping pricing out of the transaction keeps the user-facing failures
//! cheap; the transaction re-checks stock with a conditional decrement so
//! two racing orders cannot overdraw a medication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Medication;

/// One requested line in an incoming order body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    #[serde(rename = "CodMedicamento")]
    pub medication_id: i32,
    #[serde(rename = "cantidadRequerida")]
    pub quantity: i32,
}

/// A validated line carrying the snapshots to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub medication_id: i32,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// The result of pricing a whole order.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

/// Validates and prices an order against the fetched medications.
///
/// `items` pairs each request with the catalog row found for it (`None`
/// when the id matched nothing). Requests are processed in order; the
/// first failure aborts the whole operation, so a partially valid order
/// never produces a partial result.
pub fn price_order(items: &[(LineRequest, Option<Medication>)]) -> CoreResult<PricedOrder> {
    if items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = Money::zero();
    let mut seen = HashSet::with_capacity(items.len());

    for (request, medication) in items {
        // Each line becomes one (order, medication) row in storage.
        if !seen.insert(request.medication_id) {
            return Err(ValidationError::InvalidFormat {
                field: "detalles".to_string(),
                reason: "duplicate CodMedicamento".to_string(),
            }
            .into());
        }

        if request.quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "cantidadRequerida".to_string(),
            }
            .into());
        }

        let medication = medication
            .as_ref()
            .ok_or(CoreError::MedicationNotFound(request.medication_id))?;

        if medication.stock < request.quantity {
            return Err(CoreError::InsufficientStock {
                description: medication.description.clone(),
                available: medication.stock,
                requested: request.quantity,
            });
        }

        let subtotal = medication
            .unit_price
            .checked_mul(request.quantity as i64)
            .ok_or(CoreError::AmountOverflow)?;
        total = total.checked_add(subtotal).ok_or(CoreError::AmountOverflow)?;

        lines.push(PricedLine {
            medication_id: medication.id,
            description: medication.description.clone(),
            quantity: request.quantity,
            unit_price: medication.unit_price,
            subtotal,
        });
    }

    Ok(PricedOrder { lines, total })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn medication(id: i32, description: &str, stock: i32, price_cents: i64) -> Medication {
        Medication {
            id,
            description: description.to_string(),
            manufactured_at: None,
            expires_at: None,
            presentation: None,
            stock,
            unit_price: Money::from_cents(price_cents),
            pack_price: None,
            type_id: None,
            brand: None,
            specialty_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            medication_type: None,
            specialty: None,
        }
    }

    fn request(medication_id: i32, quantity: i32) -> LineRequest {
        LineRequest {
            medication_id,
            quantity,
        }
    }

    #[test]
    fn prices_two_lines_and_totals_them() {
        // (medA, qty 2, 5.00) + (medB, qty 1, 3.00) = 13.00
        let items = vec![
            (request(1, 2), Some(medication(1, "medA", 10, 500))),
            (request(2, 1), Some(medication(2, "medB", 10, 300))),
        ];

        let priced = price_order(&items).unwrap();
        assert_eq!(priced.total, Money::from_cents(1300));
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].subtotal, Money::from_cents(1000));
        assert_eq!(priced.lines[0].description, "medA");
        assert_eq!(priced.lines[1].subtotal, Money::from_cents(300));
    }

    #[test]
    fn one_bad_line_fails_the_whole_order() {
        // Second line exceeds stock; the valid first line must not survive.
        let items = vec![
            (request(1, 2), Some(medication(1, "medA", 10, 500))),
            (request(2, 5), Some(medication(2, "medB", 3, 300))),
        ];

        let err = price_order(&items).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));
    }

    #[test]
    fn missing_medication_names_the_id() {
        let items = vec![(request(99, 1), None)];
        let err = price_order(&items).unwrap_err();
        assert_eq!(err.to_string(), "Medication with ID 99 not found");
    }

    #[test]
    fn stock_exactly_equal_to_request_is_allowed() {
        let items = vec![(request(1, 3), Some(medication(1, "medA", 3, 100)))];
        let priced = price_order(&items).unwrap();
        assert_eq!(priced.total, Money::from_cents(300));
    }

    #[test]
    fn empty_order_is_rejected() {
        assert!(matches!(price_order(&[]), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn duplicate_medication_ids_are_rejected() {
        // Two lines for the same medication would collide on the
        // (order, medication) storage key.
        let items = vec![
            (request(1, 2), Some(medication(1, "medA", 10, 500))),
            (request(1, 3), Some(medication(1, "medA", 10, 500))),
        ];

        let err = price_order(&items).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "detalles has invalid format: duplicate CodMedicamento"
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let items = vec![(request(1, 0), Some(medication(1, "medA", 3, 100)))];
        assert!(matches!(
            price_order(&items),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn snapshots_use_validation_time_price() {
        let items = vec![(request(1, 2), Some(medication(1, "medA", 5, 750)))];
        let priced = price_order(&items).unwrap();
        assert_eq!(priced.lines[0].unit_price, Money::from_cents(750));
        assert_eq!(priced.lines[0].subtotal, Money::from_cents(1500));
    }
}
