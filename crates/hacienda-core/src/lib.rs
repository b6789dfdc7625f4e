//! # hacienda-core: Pure Business Logic for Hacienda
//!
//! This crate is the **heart** of the back-office. It contains the invoice
//! numbering, pricing and status rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Hacienda Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                     Frontend (WebView)                        │  │
//! │  │   Sale Wizard ──► Animal Picker ──► Pricing ──► Factura UI    │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │ Tauri IPC                          │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                      Tauri Commands                           │  │
//! │  │   wizard_confirm, create_invoice, save_invoice_pdf, ...       │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │              ★ hacienda-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────────────┐  │  │
//! │  │  │  money  │ │ pricing │ │ numbering│ │  types/validation │  │  │
//! │  │  │  Money  │ │ Totals  │ │  format  │ │  Factura, Party   │  │  │
//! │  │  │ TaxRate │ │ per-cat │ │  config  │ │  status machine   │  │  │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └───────────────────┘  │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                  hacienda-db (Database Layer)                 │  │
//! │  │        SQLite queries, migrations, numbering counter          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Factura, Party, Animal, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Per-category totals for a sale (subtotal / IVA / total)
//! - [`numbering`] - Numbering configuration and formatted invoice numbers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in centavos (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use hacienda_core::money::Money;
//! use hacienda_core::types::TaxRate;
//!
//! // Create money from centavos (never from floats!)
//! let net = Money::from_centavos(10_000_000); // $100.000,00
//!
//! // IVA at 21% for a type-A comprobante
//! let iva = net.calculate_tax(TaxRate::IVA);
//! assert_eq!(iva.centavos(), 2_100_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use hacienda_core::Money` instead of
// `use hacienda_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use numbering::NumberingConfig;
pub use pricing::{compute_totals, compute_totals_flat, PriceList, SaleLine, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// IVA rate for type-A comprobantes, in basis points (2100 = 21%).
///
/// Fixed by Argentine tax rules for this domain; other comprobante classes
/// carry no IVA in this slice.
pub const IVA_RATE_BPS: u32 = 2100;

/// Zero-padding width of the sequential part of an invoice number.
///
/// `prefix + {:08} + suffix`, e.g. `0001-00000042-A`.
pub const NUMBER_PAD_WIDTH: usize = 8;

/// Maximum length of a numbering prefix or suffix.
pub const MAX_AFFIX_LEN: usize = 10;

/// Maximum lots in a single sale.
///
/// ## Business Reason
/// Prevents runaway selections in the wizard and keeps a factura printable.
pub const MAX_SALE_LOTS: usize = 500;

/// Maximum weight of a single lot line, in kilograms.
///
/// ## Business Reason
/// A scale ticket above this is a typo, not an animal.
pub const MAX_LOT_WEIGHT_KG: i64 = 5_000;
