//! # Domain Types
//!
//! Core domain types used throughout Hacienda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │     Sale       │  │    Factura     │  │     Party      │        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  id (UUID)     │  │  id (UUID)     │  │  id (UUID)     │        │
//! │  │  buyer_id      │  │  number        │  │  name          │        │
//! │  │  total         │  │  comprobante   │  │  cuit          │        │
//! │  │  lots[]        │  │  status        │  │  kind          │        │
//! │  └────────────────┘  └────────────────┘  └────────────────┘        │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │  Comprobante   │  │ FacturaStatus  │  │    Animal      │        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  A │ B │ C │ E │  │  Pendiente     │  │  tag           │        │
//! │  │  A carries IVA │  │  Emitida       │  │  category      │        │
//! │  └────────────────┘  │  Pagada        │  │  weight_kg     │        │
//! │                      │  Anulada       │  └────────────────┘        │
//! │                      └────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: factura `number`, animal `tag`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::IVA_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 2100 bps = 21% (Argentine IVA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Standard IVA rate applied to type-A comprobantes.
    pub const IVA: TaxRate = TaxRate(IVA_RATE_BPS);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Comprobante (fiscal document class)
// =============================================================================

/// Fiscal document class under Argentine tax rules.
///
/// The class determines the IVA treatment of the document: class A
/// discriminates 21% IVA; B, C and E carry none in this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
pub enum Comprobante {
    A,
    B,
    C,
    E,
}

impl Comprobante {
    /// Whether IVA applies to this document class.
    #[inline]
    pub const fn iva_applies(&self) -> bool {
        matches!(self, Comprobante::A)
    }

    /// The tax rate this class carries: 21% for A, zero otherwise.
    #[inline]
    pub const fn tax_rate(&self) -> TaxRate {
        if self.iva_applies() {
            TaxRate::IVA
        } else {
            TaxRate::zero()
        }
    }

    /// Single-letter code, as printed in the document header box.
    pub const fn letter(&self) -> &'static str {
        match self {
            Comprobante::A => "A",
            Comprobante::B => "B",
            Comprobante::C => "C",
            Comprobante::E => "E",
        }
    }

    /// Document title, e.g. "FACTURA A".
    pub fn title(&self) -> String {
        format!("FACTURA {}", self.letter())
    }
}

// =============================================================================
// Factura Status
// =============================================================================

/// The lifecycle status of a factura.
///
/// ## State Machine
/// ```text
/// pendiente ──► emitida ──┬──► pagada   (terminal)
///                         └──► anulada  (terminal)
/// ```
/// There is no transition out of `Pagada` or `Anulada`, and a factura is
/// never renumbered: the number is assigned exactly once at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FacturaStatus {
    /// Draft: created but not yet fiscally emitted.
    Pendiente,
    /// Emitted: the document exists for tax purposes.
    Emitida,
    /// Annulled: voided after emission (or abandoned draft).
    Anulada,
    /// Paid in full.
    Pagada,
}

impl FacturaStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub const fn can_transition_to(&self, next: FacturaStatus) -> bool {
        use FacturaStatus::*;
        matches!(
            (self, next),
            (Pendiente, Emitida) | (Emitida, Pagada) | (Emitida, Anulada)
        )
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, FacturaStatus::Pagada | FacturaStatus::Anulada)
    }
}

impl Default for FacturaStatus {
    fn default() -> Self {
        FacturaStatus::Pendiente
    }
}

// =============================================================================
// Factura
// =============================================================================

/// A fiscal invoice.
///
/// `number` is assigned exactly once at issuance from the numbering
/// configuration and is immutable afterwards; only `status`, `notes` and
/// `due_date` may change over the document's life.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Factura {
    pub id: String,
    /// Formatted number, e.g. `0001-00000042-A`. Never reassigned.
    pub number: String,
    pub comprobante: Comprobante,
    pub punto_venta: i64,
    /// Counterparty reference (Party id). The factura references, but does
    /// not own, the party record.
    pub buyer_id: String,
    /// Originating sale, when the factura was generated from one.
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    pub net_centavos: i64,
    pub tax_centavos: i64,
    pub total_centavos: i64,
    pub status: FacturaStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Factura {
    /// Returns the net amount as Money.
    #[inline]
    pub fn net(&self) -> Money {
        Money::from_centavos(self.net_centavos)
    }

    /// Returns the tax amount as Money.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_centavos(self.tax_centavos)
    }

    /// Returns the total amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_centavos(self.total_centavos)
    }

    /// Checks the `total = net + tax` invariant.
    #[inline]
    pub fn totals_consistent(&self) -> bool {
        self.net_centavos + self.tax_centavos == self.total_centavos
    }

    /// Applies a status transition, enforcing the state machine.
    pub fn transition_to(&mut self, next: FacturaStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

// =============================================================================
// Factura Item
// =============================================================================

/// A line item on a factura.
/// Uses snapshot pattern: category and price are frozen at issuance time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct FacturaItem {
    pub id: String,
    pub factura_id: String,
    /// Printed concept, e.g. "Novillo - caravana AR1234".
    pub concept: String,
    /// Pricing category at issuance time (frozen).
    pub category: String,
    /// Weight in whole kilograms.
    pub weight_kg: i64,
    /// Price per kilogram in centavos at issuance time (frozen).
    pub unit_price_centavos: i64,
    /// Line total (weight × unit price).
    pub line_total_centavos: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl FacturaItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_centavos(self.unit_price_centavos)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_centavos(self.line_total_centavos)
    }
}

// =============================================================================
// Party (buyer / supplier)
// =============================================================================

/// The role a counterparty plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Buyer,
    Supplier,
}

/// A counterparty: a buyer of hacienda or a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Party {
    pub id: String,
    pub name: String,
    /// Argentine taxpayer id, 11 digits (dashes optional on input).
    pub cuit: Option<String>,
    pub address: Option<String>,
    pub kind: PartyKind,
    /// Soft delete flag.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Animal (inventory)
// =============================================================================

/// Inventory state of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AnimalState {
    Available,
    Sold,
}

/// A head of cattle in inventory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Animal {
    pub id: String,
    /// Ear-tag (caravana) - business identifier.
    pub tag: String,
    /// Pricing category, e.g. "Novillo", "Vaca", "Ternero".
    pub category: String,
    /// Last weighed weight, in whole kilograms.
    pub weight_kg: i64,
    pub state: AnimalState,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A registered sale: a buyer, a set of lots, and computed totals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub buyer_id: String,
    pub comprobante: Comprobante,
    pub subtotal_centavos: i64,
    pub tax_centavos: i64,
    pub total_centavos: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A lot line in a sale.
/// Uses snapshot pattern to freeze animal data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLot {
    pub id: String,
    pub sale_id: String,
    pub animal_id: String,
    /// Ear-tag at time of sale (frozen).
    pub tag_snapshot: String,
    /// Category at time of sale (frozen).
    pub category_snapshot: String,
    /// Weight at time of sale (frozen).
    pub weight_kg: i64,
    /// Price per kg in centavos at time of sale (frozen).
    pub unit_price_centavos: i64,
    /// Line total (weight × unit price).
    pub line_total_centavos: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleLot {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_centavos(self.line_total_centavos)
    }
}

// =============================================================================
// Company Profile
// =============================================================================

/// Issuer identity printed in the factura header block.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyProfile {
    pub name: String,
    pub cuit: String,
    pub address_lines: Vec<String>,
    /// Gross-income registration (ingresos brutos), if any.
    pub iibb: Option<String>,
    /// IVA responsibility line, e.g. "IVA Responsable Inscripto".
    pub responsibility: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            name: "Hacienda S.A.".to_string(),
            cuit: "30-00000000-7".to_string(),
            address_lines: vec!["Ruta 5 km 123".to_string(), "Trenque Lauquen, Buenos Aires".to_string()],
            iibb: None,
            responsibility: "IVA Responsable Inscripto".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comprobante_tax_rules() {
        assert!(Comprobante::A.iva_applies());
        assert_eq!(Comprobante::A.tax_rate().bps(), 2100);

        for c in [Comprobante::B, Comprobante::C, Comprobante::E] {
            assert!(!c.iva_applies());
            assert!(c.tax_rate().is_zero());
        }
    }

    #[test]
    fn test_comprobante_title() {
        assert_eq!(Comprobante::A.title(), "FACTURA A");
        assert_eq!(Comprobante::E.letter(), "E");
    }

    #[test]
    fn test_status_machine_allowed() {
        use FacturaStatus::*;
        assert!(Pendiente.can_transition_to(Emitida));
        assert!(Emitida.can_transition_to(Pagada));
        assert!(Emitida.can_transition_to(Anulada));
    }

    #[test]
    fn test_status_machine_forbidden() {
        use FacturaStatus::*;
        // No exit from terminal states
        assert!(!Pagada.can_transition_to(Anulada));
        assert!(!Anulada.can_transition_to(Emitida));
        // No skipping emission
        assert!(!Pendiente.can_transition_to(Pagada));
        assert!(!Pendiente.can_transition_to(Anulada));
        // No going back
        assert!(!Emitida.can_transition_to(Pendiente));
    }

    #[test]
    fn test_factura_transition() {
        let mut factura = sample_factura();
        assert_eq!(factura.status, FacturaStatus::Pendiente);

        factura.transition_to(FacturaStatus::Emitida).unwrap();
        factura.transition_to(FacturaStatus::Pagada).unwrap();

        let err = factura.transition_to(FacturaStatus::Anulada).unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::InvalidStatusTransition { .. }
        ));
    }

    #[test]
    fn test_totals_consistent() {
        let factura = sample_factura();
        assert!(factura.totals_consistent());
    }

    fn sample_factura() -> Factura {
        let now = Utc::now();
        Factura {
            id: "f-1".to_string(),
            number: "0001-00000001-A".to_string(),
            comprobante: Comprobante::A,
            punto_venta: 1,
            buyer_id: "p-1".to_string(),
            sale_id: None,
            issue_date: now.date_naive(),
            due_date: None,
            net_centavos: 10_000_000,
            tax_centavos: 2_100_000,
            total_centavos: 12_100_000,
            status: FacturaStatus::Pendiente,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
