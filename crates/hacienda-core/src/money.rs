//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  On a 211.000-peso cattle sale, IVA computed in floats can drift    │
//! │  by centavos from what AFIP expects on the printed factura.         │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Centavos                                     │
//! │    Everything is i64 centavos; rounding happens exactly once,       │
//! │    in calculate_tax, and is explicit.                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hacienda_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let per_kg = Money::from_centavos(45_000); // $450,00 per kg
//!
//! // Weight × unit price
//! let line = per_kg.multiply_weight(300);    // $135.000,00
//! assert_eq!(line.centavos(), 13_500_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest peso unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for credit notes and refunds
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from whole pesos.
    ///
    /// ## Example
    /// ```rust
    /// use hacienda_core::money::Money;
    ///
    /// let price = Money::from_pesos(450); // $450,00
    /// assert_eq!(price.centavos(), 45_000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax for this amount at the given rate.
    ///
    /// ## Rounding
    /// Integer math with half-up rounding to the centavo:
    /// `(amount × bps + 5000) / 10000`. The result is exact to two decimal
    /// places; `total = net + tax` never drifts.
    ///
    /// ## Example
    /// ```rust
    /// use hacienda_core::money::Money;
    /// use hacienda_core::types::TaxRate;
    ///
    /// // $100.000,00 net at 21% IVA = $21.000,00
    /// let net = Money::from_centavos(10_000_000);
    /// let iva = net.calculate_tax(TaxRate::IVA);
    /// assert_eq!(iva.centavos(), 2_100_000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 to prevent overflow on large amounts
        let tax_centavos = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_centavos(tax_centavos as i64)
    }

    /// Multiplies a per-kilogram price by a weight in kilograms.
    ///
    /// ## Example
    /// ```rust
    /// use hacienda_core::money::Money;
    ///
    /// let per_kg = Money::from_pesos(450);
    /// let line_total = per_kg.multiply_weight(300);
    /// assert_eq!(line_total.pesos(), 135_000);
    /// ```
    #[inline]
    pub const fn multiply_weight(&self, kg: i64) -> Self {
        Money(self.0 * kg)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. The frontend formats for display
/// (es-AR locale) itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.pesos().abs(), self.centavos_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (weights, quantities).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(45_099);
        assert_eq!(money.centavos(), 45_099);
        assert_eq!(money.pesos(), 450);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_from_pesos() {
        assert_eq!(Money::from_pesos(450).centavos(), 45_000);
        assert_eq!(Money::from_pesos(-5).centavos(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_centavos(45_099)), "$450.99");
        assert_eq!(format!("{}", Money::from_centavos(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_centavos(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_centavos(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centavos(1000);
        let b = Money::from_centavos(500);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        let result: Money = a * 3;
        assert_eq!(result.centavos(), 3000);
    }

    #[test]
    fn test_iva_on_round_amount() {
        // $100.000,00 at 21% = $21.000,00 and total is exact
        let net = Money::from_pesos(100_000);
        let iva = net.calculate_tax(TaxRate::IVA);
        assert_eq!(iva.centavos(), 2_100_000);
        assert_eq!((net + iva).pesos(), 121_000);
    }

    #[test]
    fn test_tax_rounding_to_centavo() {
        // $0,33 at 21% = 6.93 centavos → 7 centavos (half-up)
        let amount = Money::from_centavos(33);
        let tax = amount.calculate_tax(TaxRate::IVA);
        assert_eq!(tax.centavos(), 7);

        // Zero rate never produces tax
        let zero = amount.calculate_tax(TaxRate::zero());
        assert_eq!(zero.centavos(), 0);
    }

    #[test]
    fn test_multiply_weight() {
        let per_kg = Money::from_pesos(450);
        assert_eq!(per_kg.multiply_weight(300).pesos(), 135_000);
        assert_eq!(per_kg.multiply_weight(0).centavos(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_centavos(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().centavos(), 100);
    }

    /// Large sale totals must not overflow the intermediate tax product.
    #[test]
    fn test_tax_on_large_amount() {
        // 10 billion pesos in centavos
        let net = Money::from_centavos(1_000_000_000_000);
        let iva = net.calculate_tax(TaxRate::IVA);
        assert_eq!(iva.centavos(), 210_000_000_000);
    }
}
