//! # PDF Error Types

use thiserror::Error;

/// Errors raised while rendering an invoice document.
#[derive(Debug, Error)]
pub enum PdfError {
    /// A builtin font could not be registered with the document.
    #[error("Font registration failed: {0}")]
    Font(String),

    /// The finished document could not be serialized to bytes.
    #[error("Document serialization failed: {0}")]
    Serialize(String),

    /// The factura has no line items to print.
    #[error("Factura {number} has no line items")]
    EmptyDocument { number: String },
}

/// Result type for rendering operations.
pub type PdfResult<T> = Result<T, PdfError>;
