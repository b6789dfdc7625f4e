//! # hacienda-pdf: Invoice Document Rendering
//!
//! Renders a factura into a fixed-layout A4 PDF document.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PDF Rendering Flow                                │
//! │                                                                         │
//! │  Tauri Command (save_invoice_pdf / open_invoice_pdf / preview_...)     │
//! │       │                                                                 │
//! │       │  Factura + Party + items + CompanyProfile                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  hacienda-pdf (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   render_invoice(...) -> Vec<u8>                                │   │
//! │  │       │                                                         │   │
//! │  │       ├── page 1: header, counterparty, items table, totals    │   │
//! │  │       └── page N: continuation header + remaining items        │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼  Vec<u8>                                                        │
//! │  Desktop app decides presentation:                                     │
//! │    • save to chosen path                                               │
//! │    • temp file + OS viewer                                             │
//! │    • base64 data URI for the embedded preview                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! The same inputs always produce the same layout: the items table holds a
//! fixed number of rows per page, so page breaks depend only on the item
//! count, never on measured text widths.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod render;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{PdfError, PdfResult};
pub use render::{page_count, render_invoice, ROWS_PER_PAGE};
