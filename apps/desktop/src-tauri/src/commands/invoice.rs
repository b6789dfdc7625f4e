//! # Invoice Commands
//!
//! Tauri commands for creating facturas and driving their lifecycle.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_invoice(sale_id)                              │
//! │                                                                         │
//! │  1. Load the sale and its lots                                          │
//! │  2. Issue the next number ── single UPDATE..RETURNING, gapless          │
//! │  3. Build the factura: totals copied from the sale, status from         │
//! │     configuration (pendiente by default)                                │
//! │  4. Freeze the lots into factura items (concept, category, price)       │
//! │  5. Persist factura + items in one transaction                          │
//! │                                                                         │
//! │  The number is assigned exactly once; a factura is never renumbered.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{debug, info};
use uuid::Uuid;

use crate::commands::party::PartyDto;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use hacienda_core::{Comprobante, Factura, FacturaItem, FacturaStatus};

/// Invoice data sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub number: String,
    pub comprobante: Comprobante,
    pub punto_venta: i64,
    pub buyer_id: String,
    pub sale_id: Option<String>,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub net_centavos: i64,
    pub tax_centavos: i64,
    pub total_centavos: i64,
    pub status: FacturaStatus,
    pub notes: Option<String>,
}

impl From<Factura> for InvoiceDto {
    fn from(factura: Factura) -> Self {
        InvoiceDto {
            id: factura.id,
            number: factura.number,
            comprobante: factura.comprobante,
            punto_venta: factura.punto_venta,
            buyer_id: factura.buyer_id,
            sale_id: factura.sale_id,
            issue_date: factura.issue_date.format("%Y-%m-%d").to_string(),
            due_date: factura
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            net_centavos: factura.net_centavos,
            tax_centavos: factura.tax_centavos,
            total_centavos: factura.total_centavos,
            status: factura.status,
            notes: factura.notes,
        }
    }
}

/// Invoice line item data sent to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemDto {
    pub concept: String,
    pub category: String,
    pub weight_kg: i64,
    pub unit_price_centavos: i64,
    pub line_total_centavos: i64,
}

impl From<FacturaItem> for InvoiceItemDto {
    fn from(item: FacturaItem) -> Self {
        InvoiceItemDto {
            concept: item.concept,
            category: item.category,
            weight_kg: item.weight_kg,
            unit_price_centavos: item.unit_price_centavos,
            line_total_centavos: item.line_total_centavos,
        }
    }
}

/// Full invoice detail: header, items and counterparty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub invoice: InvoiceDto,
    pub items: Vec<InvoiceItemDto>,
    pub buyer: PartyDto,
}

/// Creates a factura from a registered sale.
///
/// ## Numbering
/// The sequential number is taken atomically from the active numbering
/// configuration for the sale's comprobante class. If that configuration
/// is inactive or missing, no factura is created and the counter is
/// untouched.
#[tauri::command]
pub async fn create_invoice(
    db: State<'_, DbState>,
    config: State<'_, ConfigState>,
    sale_id: String,
) -> Result<InvoiceDto, ApiError> {
    debug!(sale_id = %sale_id, "create_invoice command");

    let db = db.inner();

    let sale = db
        .sales()
        .get_by_id(&sale_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &sale_id))?;
    let lots = db.sales().get_lots(&sale_id).await?;

    if lots.is_empty() {
        return Err(ApiError::validation("Sale has no lots to invoice"));
    }

    // The serialization point: one row updated, one number out.
    let issued = db.numbering().issue_number(sale.comprobante).await?;

    let now = Utc::now();
    let issue_date = now.date_naive();
    let due_date = issue_date + Duration::days(config.due_days);

    let factura = Factura {
        id: Uuid::new_v4().to_string(),
        number: issued.formatted.clone(),
        comprobante: sale.comprobante,
        punto_venta: issued.punto_venta,
        buyer_id: sale.buyer_id.clone(),
        sale_id: Some(sale.id.clone()),
        issue_date,
        due_date: Some(due_date),
        net_centavos: sale.subtotal_centavos,
        tax_centavos: sale.tax_centavos,
        total_centavos: sale.total_centavos,
        status: config.initial_invoice_status,
        notes: None,
        created_at: now,
        updated_at: now,
    };

    let items: Vec<FacturaItem> = lots
        .iter()
        .map(|lot| FacturaItem {
            id: Uuid::new_v4().to_string(),
            factura_id: factura.id.clone(),
            concept: format!("{} - caravana {}", lot.category_snapshot, lot.tag_snapshot),
            category: lot.category_snapshot.clone(),
            weight_kg: lot.weight_kg,
            unit_price_centavos: lot.unit_price_centavos,
            line_total_centavos: lot.line_total_centavos,
            created_at: now,
        })
        .collect();

    db.invoices().insert_invoice(&factura, &items).await?;

    info!(
        id = %factura.id,
        number = %factura.number,
        total = %factura.total_centavos,
        "Factura created"
    );

    Ok(InvoiceDto::from(factura))
}

/// Lists recent invoices, newest first.
#[tauri::command]
pub async fn list_invoices(
    db: State<'_, DbState>,
    limit: Option<i64>,
) -> Result<Vec<InvoiceDto>, ApiError> {
    let limit = limit.unwrap_or(50).clamp(1, 500);
    debug!(limit = %limit, "list_invoices command");

    let facturas = db.inner().invoices().list_recent(limit).await?;
    Ok(facturas.into_iter().map(InvoiceDto::from).collect())
}

/// Returns one invoice with its items and counterparty.
#[tauri::command]
pub async fn get_invoice(
    db: State<'_, DbState>,
    invoice_id: String,
) -> Result<InvoiceDetail, ApiError> {
    debug!(invoice_id = %invoice_id, "get_invoice command");

    let db = db.inner();

    let factura = db
        .invoices()
        .get_by_id(&invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Factura", &invoice_id))?;
    let items = db.invoices().get_items(&invoice_id).await?;
    let buyer = db.parties().require(&factura.buyer_id).await?;

    Ok(InvoiceDetail {
        invoice: InvoiceDto::from(factura),
        items: items.into_iter().map(InvoiceItemDto::from).collect(),
        buyer: PartyDto::from(buyer),
    })
}

/// Emits a pending factura (pendiente → emitida).
#[tauri::command]
pub async fn emit_invoice(
    db: State<'_, DbState>,
    invoice_id: String,
) -> Result<InvoiceDto, ApiError> {
    debug!(invoice_id = %invoice_id, "emit_invoice command");

    let db = db.inner();
    db.invoices().emit(&invoice_id).await?;

    info!(invoice_id = %invoice_id, "Factura emitted");
    reload(db, &invoice_id).await
}

/// Marks an emitted factura as paid (emitida → pagada).
#[tauri::command]
pub async fn pay_invoice(
    db: State<'_, DbState>,
    invoice_id: String,
) -> Result<InvoiceDto, ApiError> {
    debug!(invoice_id = %invoice_id, "pay_invoice command");

    let db = db.inner();
    db.invoices().pay(&invoice_id).await?;

    info!(invoice_id = %invoice_id, "Factura paid");
    reload(db, &invoice_id).await
}

/// Annuls an emitted factura (emitida → anulada).
///
/// Annulment never frees the number: the sequence stays gapless in
/// issuance order and the annulled document remains on record.
#[tauri::command]
pub async fn annul_invoice(
    db: State<'_, DbState>,
    invoice_id: String,
) -> Result<InvoiceDto, ApiError> {
    debug!(invoice_id = %invoice_id, "annul_invoice command");

    let db = db.inner();
    db.invoices().annul(&invoice_id).await?;

    info!(invoice_id = %invoice_id, "Factura annulled");
    reload(db, &invoice_id).await
}

async fn reload(db: &hacienda_db::Database, invoice_id: &str) -> Result<InvoiceDto, ApiError> {
    let factura = db
        .invoices()
        .get_by_id(invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Factura", invoice_id))?;
    Ok(InvoiceDto::from(factura))
}
