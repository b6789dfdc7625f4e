//! # Pricing Module
//!
//! Per-category totals for a sale: subtotal, IVA, total.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Sale Pricing                                    │
//! │                                                                     │
//! │  lots: [ {Novillo, 300 kg}, {Vaca, 200 kg}, {Novillo, 280 kg} ]    │
//! │  price list: { Novillo: $450/kg, Vaca: $380/kg }                   │
//! │        │                                                            │
//! │        ▼                                                            │
//! │  each line priced by ITS OWN category:                              │
//! │    300 × 450 + 200 × 380 + 280 × 450                               │
//! │        │                                                            │
//! │        ▼                                                            │
//! │  subtotal ──► IVA (21% if comprobante A, else 0) ──► total          │
//! │                                                                     │
//! │  A category without a price ABORTS the computation.                 │
//! │  Averaging the known prices is NOT a fallback.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Comprobante;
use crate::{MAX_LOT_WEIGHT_KG, MAX_SALE_LOTS};

// =============================================================================
// Inputs
// =============================================================================

/// One lot line to be priced: a weight and the category that prices it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub category: String,
    /// Weight in whole kilograms. Must be >= 0.
    pub weight_kg: i64,
}

impl SaleLine {
    pub fn new(category: impl Into<String>, weight_kg: i64) -> Self {
        SaleLine {
            category: category.into(),
            weight_kg,
        }
    }
}

/// Per-category unit prices (centavos per kilogram).
///
/// BTreeMap so iteration order is stable for display and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceList {
    prices: BTreeMap<String, i64>,
}

impl PriceList {
    pub fn new() -> Self {
        PriceList::default()
    }

    /// Sets the price for a category. Rejects negative prices.
    pub fn set(
        &mut self,
        category: impl Into<String>,
        price: Money,
    ) -> Result<(), ValidationError> {
        if price.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "unit_price".to_string(),
            });
        }
        self.prices.insert(category.into(), price.centavos());
        Ok(())
    }

    /// Looks up the price for a category, if one is defined.
    pub fn get(&self, category: &str) -> Option<Money> {
        self.prices.get(category).copied().map(Money::from_centavos)
    }

    /// Categories with a defined price, in stable order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// =============================================================================
// Output
// =============================================================================

/// Computed totals for a transaction.
///
/// Invariant: `total = subtotal + tax`, exactly (integer centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes subtotal, tax and total for a set of lot lines against a
/// per-category price list.
///
/// ## Rules
/// - subtotal = Σ(weight × price[category]); every line is priced by its
///   own category, independently, then summed
/// - tax = subtotal × 21% when the comprobante is class A, else zero
/// - total = subtotal + tax, exactly
///
/// ## Errors
/// - [`CoreError::MissingCategoryPrice`] when a line's category has no
///   price. The legacy system silently priced these as zero (or averaged
///   the known prices); both produced wrong facturas, so here the whole
///   computation aborts instead.
/// - [`ValidationError::MustBeNonNegative`] for a negative weight.
/// - [`ValidationError::OutOfRange`] for a weight above the lot cap.
/// - [`CoreError::TooManyLots`] above [`MAX_SALE_LOTS`].
pub fn compute_totals(
    lines: &[SaleLine],
    prices: &PriceList,
    comprobante: Comprobante,
) -> CoreResult<Totals> {
    if lines.len() > MAX_SALE_LOTS {
        return Err(CoreError::TooManyLots { max: MAX_SALE_LOTS });
    }

    let mut subtotal = Money::zero();
    for line in lines {
        validate_weight(line.weight_kg)?;

        let unit_price = prices.get(&line.category).ok_or_else(|| {
            CoreError::MissingCategoryPrice {
                category: line.category.clone(),
            }
        })?;

        subtotal += unit_price.multiply_weight(line.weight_kg);
    }

    Ok(apply_tax(subtotal, comprobante))
}

/// Flat-price variant: every line priced at the same rate per kilogram.
///
/// Same contract as [`compute_totals`] with a single-price list.
pub fn compute_totals_flat(
    lines: &[SaleLine],
    unit_price: Money,
    comprobante: Comprobante,
) -> CoreResult<Totals> {
    if lines.len() > MAX_SALE_LOTS {
        return Err(CoreError::TooManyLots { max: MAX_SALE_LOTS });
    }
    if unit_price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        }
        .into());
    }

    let mut subtotal = Money::zero();
    for line in lines {
        validate_weight(line.weight_kg)?;
        subtotal += unit_price.multiply_weight(line.weight_kg);
    }

    Ok(apply_tax(subtotal, comprobante))
}

fn apply_tax(subtotal: Money, comprobante: Comprobante) -> Totals {
    let tax = if comprobante.iva_applies() {
        subtotal.calculate_tax(comprobante.tax_rate())
    } else {
        Money::zero()
    };

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

fn validate_weight(weight_kg: i64) -> Result<(), ValidationError> {
    if weight_kg < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "weight_kg".to_string(),
        });
    }
    if weight_kg > MAX_LOT_WEIGHT_KG {
        return Err(ValidationError::OutOfRange {
            field: "weight_kg".to_string(),
            min: 0,
            max: MAX_LOT_WEIGHT_KG,
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

    fn price_list(pairs: &[(&str, i64)]) -> PriceList {
        let mut prices = PriceList::new();
        for (category, pesos) in pairs {
            prices.set(*category, Money::from_pesos(*pesos)).unwrap();
        }
        prices
    }

    #[test]
    fn test_single_category_exact() {
        let lines = vec![SaleLine::new("Novillo", 300), SaleLine::new("Novillo", 150)];
        let prices = price_list(&[("Novillo", 450)]);

        let totals = compute_totals(&lines, &prices, Comprobante::B).unwrap();
        assert_eq!(totals.subtotal.pesos(), 450 * 450);
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_multi_category_summed_independently() {
        // 300×450 + 200×380 = 135.000 + 76.000 = 211.000
        let lines = vec![SaleLine::new("Novillo", 300), SaleLine::new("Vaca", 200)];
        let prices = price_list(&[("Novillo", 450), ("Vaca", 380)]);

        let totals = compute_totals(&lines, &prices, Comprobante::B).unwrap();
        assert_eq!(totals.subtotal.pesos(), 211_000);

        // The averaged-price shortcut would give (450+380)/2 × 500 = 207.500.
        // That result must never appear.
        assert_ne!(totals.subtotal.pesos(), 207_500);
    }

    #[test]
    fn test_missing_category_is_hard_error() {
        let lines = vec![SaleLine::new("Novillo", 300), SaleLine::new("Ternero", 100)];
        let prices = price_list(&[("Novillo", 450)]);

        let err = compute_totals(&lines, &prices, Comprobante::A).unwrap_err();
        match err {
            CoreError::MissingCategoryPrice { category } => {
                assert_eq!(category, "Ternero");
            }
            other => panic!("expected MissingCategoryPrice, got {other:?}"),
        }
    }

    #[test]
    fn test_iva_only_for_type_a() {
        let lines = vec![SaleLine::new("Novillo", 100)];
        let prices = price_list(&[("Novillo", 1000)]);

        // Subtotal $100.000 → A carries $21.000 IVA
        let a = compute_totals(&lines, &prices, Comprobante::A).unwrap();
        assert_eq!(a.subtotal.pesos(), 100_000);
        assert_eq!(a.tax.pesos(), 21_000);
        assert_eq!(a.total.pesos(), 121_000);

        // B, C and E carry none, regardless of subtotal
        for c in [Comprobante::B, Comprobante::C, Comprobante::E] {
            let t = compute_totals(&lines, &prices, c).unwrap();
            assert_eq!(t.tax, Money::zero());
            assert_eq!(t.total, t.subtotal);
        }
    }

    #[test]
    fn test_total_equals_subtotal_plus_tax_exactly() {
        // An amount whose 21% does not divide evenly
        let lines = vec![SaleLine::new("Vaca", 33)];
        let prices = price_list(&[("Vaca", 7)]);

        let totals = compute_totals(&lines, &prices, Comprobante::A).unwrap();
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn test_empty_lines() {
        let totals = compute_totals(&[], &PriceList::new(), Comprobante::A).unwrap();
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_zero_weight_line_is_allowed() {
        let lines = vec![SaleLine::new("Novillo", 0)];
        let prices = price_list(&[("Novillo", 450)]);
        let totals = compute_totals(&lines, &prices, Comprobante::A).unwrap();
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let lines = vec![SaleLine::new("Novillo", -1)];
        let prices = price_list(&[("Novillo", 450)]);
        assert!(matches!(
            compute_totals(&lines, &prices, Comprobante::A),
            Err(CoreError::Validation(ValidationError::MustBeNonNegative { .. }))
        ));
    }

    #[test]
    fn test_negative_price_rejected_at_set() {
        let mut prices = PriceList::new();
        assert!(prices.set("Novillo", Money::from_centavos(-1)).is_err());
    }

    #[test]
    fn test_flat_price_variant() {
        let lines = vec![SaleLine::new("Novillo", 300), SaleLine::new("Vaca", 200)];
        let totals =
            compute_totals_flat(&lines, Money::from_pesos(400), Comprobante::B).unwrap();
        assert_eq!(totals.subtotal.pesos(), 200_000);
        assert_eq!(totals.tax, Money::zero());
    }

    #[test]
    fn test_too_many_lots() {
        let lines: Vec<SaleLine> = (0..=MAX_SALE_LOTS)
            .map(|_| SaleLine::new("Novillo", 1))
            .collect();
        let prices = price_list(&[("Novillo", 450)]);
        assert!(matches!(
            compute_totals(&lines, &prices, Comprobante::A),
            Err(CoreError::TooManyLots { .. })
        ));
    }
}
