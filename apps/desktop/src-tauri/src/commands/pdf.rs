//! # PDF Commands
//!
//! Tauri commands for generating the factura document and presenting it.
//!
//! ## Presentation Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 One Renderer, Three Presentations                       │
//! │                                                                         │
//! │                    render_invoice() ──► Vec<u8>                         │
//! │                          │                                              │
//! │        ┌─────────────────┼──────────────────────┐                       │
//! │        ▼                 ▼                      ▼                       │
//! │  save_invoice_pdf  open_invoice_pdf    preview_invoice_pdf              │
//! │  write to a path   temp file + OS      base64 data URI for the          │
//! │  the user chose    default viewer      embedded <iframe> preview        │
//! │                                                                         │
//! │  The same bytes flow through all three: the document is rendered        │
//! │  once per command, never cached across status changes.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::Engine;
use std::path::PathBuf;
use tauri::State;
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DbState};
use hacienda_db::Database;
use hacienda_pdf::render_invoice;

/// Loads an invoice with its context and renders it to PDF bytes.
async fn render(
    db: &Database,
    config: &ConfigState,
    invoice_id: &str,
) -> Result<(String, Vec<u8>), ApiError> {
    let factura = db
        .invoices()
        .get_by_id(invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Factura", invoice_id))?;
    let items = db.invoices().get_items(invoice_id).await?;
    let buyer = db.parties().require(&factura.buyer_id).await?;

    let bytes = render_invoice(&factura, &buyer, &items, &config.company)?;
    Ok((factura.number, bytes))
}

/// Renders the invoice and writes it to a caller-chosen path.
///
/// ## Returns
/// The absolute path written, for display in the UI.
#[tauri::command]
pub async fn save_invoice_pdf(
    db: State<'_, DbState>,
    config: State<'_, ConfigState>,
    invoice_id: String,
    path: String,
) -> Result<String, ApiError> {
    debug!(invoice_id = %invoice_id, path = %path, "save_invoice_pdf command");

    let (number, bytes) = render(db.inner(), &config, &invoice_id).await?;

    let path = PathBuf::from(path);
    std::fs::write(&path, &bytes).map_err(|e| {
        ApiError::new(
            ErrorCode::PdfError,
            format!("Could not write {}: {}", path.display(), e),
        )
    })?;

    info!(number = %number, path = %path.display(), "Factura PDF saved");
    Ok(path.display().to_string())
}

/// Renders the invoice to a temporary file and opens it in the OS viewer.
#[tauri::command]
pub async fn open_invoice_pdf(
    db: State<'_, DbState>,
    config: State<'_, ConfigState>,
    invoice_id: String,
) -> Result<String, ApiError> {
    debug!(invoice_id = %invoice_id, "open_invoice_pdf command");

    let (number, bytes) = render(db.inner(), &config, &invoice_id).await?;

    let path = std::env::temp_dir().join(format!("factura-{}.pdf", number));
    std::fs::write(&path, &bytes).map_err(|e| {
        ApiError::new(
            ErrorCode::PdfError,
            format!("Could not write {}: {}", path.display(), e),
        )
    })?;

    open::that(&path).map_err(|e| {
        ApiError::new(
            ErrorCode::PdfError,
            format!("Could not open PDF viewer: {}", e),
        )
    })?;

    info!(number = %number, path = %path.display(), "Factura PDF opened");
    Ok(path.display().to_string())
}

/// Renders the invoice and returns it as a base64 data URI.
///
/// ## When Used
/// - The embedded preview pane, before the operator decides to save
///   or print
#[tauri::command]
pub async fn preview_invoice_pdf(
    db: State<'_, DbState>,
    config: State<'_, ConfigState>,
    invoice_id: String,
) -> Result<String, ApiError> {
    debug!(invoice_id = %invoice_id, "preview_invoice_pdf command");

    let (number, bytes) = render(db.inner(), &config, &invoice_id).await?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

    info!(number = %number, size = bytes.len(), "Factura PDF previewed");
    Ok(format!("data:application/pdf;base64,{}", encoded))
}
