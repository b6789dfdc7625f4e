//! # Invoice Layout
//!
//! Fixed-layout A4 rendering of a factura.
//!
//! ## Page Anatomy
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Issuer name            ┌───┐   FACTURA      │
//! │  address / CUIT / IIBB  │ A │   Nro  0001-…  │
//! │                         └───┘   Fecha  …     │
//! │ ───────────────────────────────────────────  │
//! │  SEÑOR(ES): buyer name                       │
//! │  buyer address / CUIT                        │
//! │ ───────────────────────────────────────────  │
//! │  CONCEPTO      CATEGORIA    KG   $/KG  IMPORTE│
//! │  …fixed-height rows, ROWS_PER_PAGE per page… │
//! │                                              │
//! │                        Subtotal      $ …     │
//! │                        IVA 21%       $ …     │
//! │                        TOTAL         $ …     │
//! │  notes                                       │
//! │  footer                                      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All coordinates are millimeters from the bottom-left corner (PDF
//! convention). Row height is constant, so pagination is a pure function
//! of the item count — see [`page_count`].

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use crate::error::{PdfError, PdfResult};
use hacienda_core::{CompanyProfile, Factura, FacturaItem, FacturaStatus, Money, Party};

// =============================================================================
// Layout Constants
// =============================================================================

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 15.0;
const RIGHT: f32 = PAGE_W - MARGIN;

/// Top edge of the items table on every page.
const TABLE_TOP: f32 = 222.0;

/// Height of one item row in millimeters.
const ROW_H: f32 = 6.0;

/// Items per page. Constant on purpose: page breaks depend only on the
/// item count, never on text measurement.
pub const ROWS_PER_PAGE: usize = 26;

// Column x positions (left edge for text, all columns left-aligned).
const COL_CONCEPT: f32 = MARGIN;
const COL_CATEGORY: f32 = 92.0;
const COL_WEIGHT: f32 = 128.0;
const COL_UNIT_PRICE: f32 = 148.0;
const COL_TOTAL: f32 = 172.0;

/// Number of pages a factura with `item_count` lines occupies.
pub fn page_count(item_count: usize) -> usize {
    item_count.div_ceil(ROWS_PER_PAGE).max(1)
}

// =============================================================================
// Fonts
// =============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn register(doc: &PdfDocumentReference) -> PdfResult<Self> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfError::Font(e.to_string()))?;
        Ok(Fonts { regular, bold })
    }
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Argentine currency format: 1234567.89 → "$ 1.234.567,89".
/// Negative amounts carry the sign before the symbol: "-$ 5,50".
fn fmt_money(amount: Money) -> String {
    let centavos = amount.centavos();
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    let pesos = abs / 100;
    let cents = abs % 100;

    let digits = pesos.to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");

    format!("{}$ {},{:02}", sign, grouped, cents)
}

fn fmt_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// =============================================================================
// Drawing Helpers
// =============================================================================

fn gray() -> Color {
    Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn hline(layer: &PdfLayerReference, y: f32, x1: f32, x2: f32, thickness: f32) {
    layer.set_outline_thickness(thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Open rectangle drawn as a closed line (the comprobante letter box).
fn rect_outline(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32) {
    layer.set_outline_thickness(0.75);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        is_closed: true,
    });
}

// =============================================================================
// Sections
// =============================================================================

/// Issuer block, comprobante letter box and document metadata.
fn draw_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    factura: &Factura,
    company: &CompanyProfile,
) {
    // Issuer identity, top-left
    layer.use_text(company.name.as_str(), 12.0, Mm(MARGIN), Mm(278.0), &fonts.bold);

    layer.set_fill_color(gray());
    let mut y = 272.0;
    for line in &company.address_lines {
        layer.use_text(line.as_str(), 8.5, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= 4.5;
    }
    layer.use_text(
        format!("CUIT: {}", company.cuit),
        8.5,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
    );
    y -= 4.5;
    if let Some(iibb) = &company.iibb {
        layer.use_text(
            format!("IIBB: {}", iibb),
            8.5,
            Mm(MARGIN),
            Mm(y),
            &fonts.regular,
        );
        y -= 4.5;
    }
    layer.use_text(company.responsibility.as_str(), 8.5, Mm(MARGIN), Mm(y), &fonts.regular);
    layer.set_fill_color(black());

    // Comprobante letter box, centered
    rect_outline(layer, 97.0, 268.0, 16.0, 16.0);
    layer.use_text(
        factura.comprobante.letter(),
        20.0,
        Mm(102.0),
        Mm(272.5),
        &fonts.bold,
    );

    // Document metadata, top-right
    layer.use_text(factura.comprobante.title(), 14.0, Mm(130.0), Mm(278.0), &fonts.bold);
    layer.use_text(
        format!("Nro: {}", factura.number),
        9.5,
        Mm(130.0),
        Mm(270.0),
        &fonts.regular,
    );
    layer.use_text(
        format!("Fecha: {}", fmt_date(factura.issue_date)),
        9.5,
        Mm(130.0),
        Mm(265.0),
        &fonts.regular,
    );
    if let Some(due) = factura.due_date {
        layer.use_text(
            format!("Vencimiento: {}", fmt_date(due)),
            9.5,
            Mm(130.0),
            Mm(260.0),
            &fonts.regular,
        );
    }

    // Annulled documents say so, loudly
    if factura.status == FacturaStatus::Anulada {
        layer.set_fill_color(Color::Rgb(Rgb::new(0.8, 0.1, 0.1, None)));
        layer.use_text("ANULADA", 16.0, Mm(130.0), Mm(252.0), &fonts.bold);
        layer.set_fill_color(black());
    }

    hline(layer, 250.0, MARGIN, RIGHT, 0.75);
}

/// Compact header for continuation pages.
fn draw_continuation_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    factura: &Factura,
    page: usize,
    pages: usize,
) {
    layer.use_text(
        format!(
            "{} {} — continuación (hoja {}/{})",
            factura.comprobante.title(),
            factura.number,
            page,
            pages
        ),
        10.0,
        Mm(MARGIN),
        Mm(278.0),
        &fonts.bold,
    );
    hline(layer, 274.0, MARGIN, RIGHT, 0.5);
}

/// Counterparty block.
fn draw_buyer(layer: &PdfLayerReference, fonts: &Fonts, buyer: &Party) {
    layer.set_fill_color(gray());
    layer.use_text("SEÑOR(ES):", 8.0, Mm(MARGIN), Mm(244.0), &fonts.bold);
    layer.set_fill_color(black());

    layer.use_text(buyer.name.as_str(), 11.0, Mm(MARGIN), Mm(238.0), &fonts.bold);

    layer.set_fill_color(gray());
    let mut y = 233.0;
    if let Some(address) = &buyer.address {
        layer.use_text(address.as_str(), 9.0, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= 4.5;
    }
    if let Some(cuit) = &buyer.cuit {
        layer.use_text(format!("CUIT: {}", cuit), 9.0, Mm(MARGIN), Mm(y), &fonts.regular);
    }
    layer.set_fill_color(black());
}

/// Column headers for the items table.
fn draw_table_header(layer: &PdfLayerReference, fonts: &Fonts) {
    let y = TABLE_TOP;
    layer.use_text("CONCEPTO", 8.5, Mm(COL_CONCEPT), Mm(y), &fonts.bold);
    layer.use_text("CATEGORIA", 8.5, Mm(COL_CATEGORY), Mm(y), &fonts.bold);
    layer.use_text("KG", 8.5, Mm(COL_WEIGHT), Mm(y), &fonts.bold);
    layer.use_text("$/KG", 8.5, Mm(COL_UNIT_PRICE), Mm(y), &fonts.bold);
    layer.use_text("IMPORTE", 8.5, Mm(COL_TOTAL), Mm(y), &fonts.bold);
    hline(layer, y - 2.0, MARGIN, RIGHT, 0.5);
}

/// One page worth of item rows. Returns the y position below the last row.
fn draw_items(layer: &PdfLayerReference, fonts: &Fonts, items: &[FacturaItem]) -> f32 {
    let mut y = TABLE_TOP - ROW_H - 1.0;

    for item in items {
        layer.use_text(item.concept.as_str(), 9.0, Mm(COL_CONCEPT), Mm(y), &fonts.regular);
        layer.use_text(item.category.as_str(), 9.0, Mm(COL_CATEGORY), Mm(y), &fonts.regular);
        layer.use_text(item.weight_kg.to_string(), 9.0, Mm(COL_WEIGHT), Mm(y), &fonts.regular);
        layer.use_text(fmt_money(item.unit_price()), 9.0, Mm(COL_UNIT_PRICE), Mm(y), &fonts.regular);
        layer.use_text(fmt_money(item.line_total()), 9.0, Mm(COL_TOTAL), Mm(y), &fonts.regular);
        y -= ROW_H;
    }

    y
}

/// Totals block, printed on the last page only.
fn draw_totals(layer: &PdfLayerReference, fonts: &Fonts, factura: &Factura, table_bottom: f32) {
    let mut y = table_bottom - 4.0;

    hline(layer, y + 3.0, COL_UNIT_PRICE - 10.0, RIGHT, 0.5);

    layer.set_fill_color(gray());
    layer.use_text("Subtotal", 9.5, Mm(COL_UNIT_PRICE - 10.0), Mm(y - 2.0), &fonts.regular);
    layer.set_fill_color(black());
    layer.use_text(fmt_money(factura.net()), 9.5, Mm(COL_TOTAL), Mm(y - 2.0), &fonts.regular);
    y -= ROW_H;

    if factura.comprobante.iva_applies() {
        layer.set_fill_color(gray());
        layer.use_text("IVA 21%", 9.5, Mm(COL_UNIT_PRICE - 10.0), Mm(y - 2.0), &fonts.regular);
        layer.set_fill_color(black());
        layer.use_text(fmt_money(factura.tax()), 9.5, Mm(COL_TOTAL), Mm(y - 2.0), &fonts.regular);
        y -= ROW_H;
    }

    hline(layer, y + 3.0, COL_UNIT_PRICE - 10.0, RIGHT, 1.0);
    layer.use_text("TOTAL", 11.0, Mm(COL_UNIT_PRICE - 10.0), Mm(y - 2.5), &fonts.bold);
    layer.use_text(fmt_money(factura.total()), 11.0, Mm(COL_TOTAL), Mm(y - 2.5), &fonts.bold);
}

/// Notes and footer, printed on the last page only.
fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, factura: &Factura) {
    if let Some(notes) = &factura.notes {
        layer.set_fill_color(gray());
        layer.use_text(format!("Observaciones: {}", notes), 8.5, Mm(MARGIN), Mm(36.0), &fonts.regular);
        layer.set_fill_color(black());
    }

    hline(layer, 30.0, MARGIN, RIGHT, 0.5);
    layer.set_fill_color(gray());
    layer.use_text(
        "Documento generado por Hacienda — conservar como comprobante de la operación.",
        7.5,
        Mm(MARGIN),
        Mm(25.0),
        &fonts.regular,
    );
    layer.set_fill_color(black());
}

// =============================================================================
// Entry Point
// =============================================================================

/// Renders a factura into PDF bytes.
///
/// ## Arguments
/// * `factura` - The document to render (number, dates, totals, status)
/// * `buyer` - Counterparty printed in the header block
/// * `items` - Line items; must not be empty
/// * `company` - Issuer identity for the letterhead
///
/// ## Errors
/// * `PdfError::EmptyDocument` - no line items
/// * `PdfError::Font` / `PdfError::Serialize` - library failures
pub fn render_invoice(
    factura: &Factura,
    buyer: &Party,
    items: &[FacturaItem],
    company: &CompanyProfile,
) -> PdfResult<Vec<u8>> {
    if items.is_empty() {
        return Err(PdfError::EmptyDocument {
            number: factura.number.clone(),
        });
    }

    let pages = page_count(items.len());
    debug!(number = %factura.number, items = items.len(), pages, "Rendering factura");

    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("{} {}", factura.comprobante.title(), factura.number),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Contenido",
    );
    let fonts = Fonts::register(&doc)?;

    for (page_idx, chunk) in items.chunks(ROWS_PER_PAGE).enumerate() {
        let layer = if page_idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Contenido");
            doc.get_page(page).get_layer(layer)
        };

        if page_idx == 0 {
            draw_header(&layer, &fonts, factura, company);
            draw_buyer(&layer, &fonts, buyer);
        } else {
            draw_continuation_header(&layer, &fonts, factura, page_idx + 1, pages);
        }

        draw_table_header(&layer, &fonts);
        let table_bottom = draw_items(&layer, &fonts, chunk);

        let is_last = page_idx == pages - 1;
        if is_last {
            draw_totals(&layer, &fonts, factura, table_bottom);
            draw_footer(&layer, &fonts, factura);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| PdfError::Serialize(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use hacienda_core::Comprobante;

    fn sample_factura(item_count: usize) -> (Factura, Party, Vec<FacturaItem>, CompanyProfile) {
        let now = Utc::now();

        let factura = Factura {
            id: "f1".to_string(),
            number: "0001-00000042-A".to_string(),
            comprobante: Comprobante::A,
            punto_venta: 1,
            buyer_id: "p1".to_string(),
            sale_id: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 10),
            net_centavos: 13_500_000,
            tax_centavos: 2_835_000,
            total_centavos: 16_335_000,
            status: FacturaStatus::Emitida,
            notes: Some("Retira en planta.".to_string()),
            created_at: now,
            updated_at: now,
        };

        let buyer = Party {
            id: "p1".to_string(),
            name: "Frigorífico del Sur SA".to_string(),
            cuit: Some("30-50001091-2".to_string()),
            address: Some("Ruta 5 km 120, Trenque Lauquen".to_string()),
            kind: hacienda_core::PartyKind::Buyer,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let items: Vec<FacturaItem> = (0..item_count)
            .map(|n| FacturaItem {
                id: format!("i{}", n),
                factura_id: "f1".to_string(),
                concept: format!("Novillo - caravana AR{:04}", n + 1),
                category: "Novillo".to_string(),
                weight_kg: 300,
                unit_price_centavos: 45_000,
                line_total_centavos: 13_500_000,
                created_at: now,
            })
            .collect();

        (factura, buyer, items, CompanyProfile::default())
    }

    #[test]
    fn test_renders_valid_pdf_bytes() {
        let (factura, buyer, items, company) = sample_factura(3);

        let bytes = render_invoice(&factura, &buyer, &items, &company).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_empty_items_rejected() {
        let (factura, buyer, _, company) = sample_factura(0);

        let err = render_invoice(&factura, &buyer, &[], &company).unwrap_err();
        assert!(matches!(err, PdfError::EmptyDocument { .. }));
    }

    #[test]
    fn test_pagination_is_a_pure_function_of_item_count() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(ROWS_PER_PAGE), 1);
        assert_eq!(page_count(ROWS_PER_PAGE + 1), 2);
        assert_eq!(page_count(3 * ROWS_PER_PAGE), 3);
    }

    #[test]
    fn test_multi_page_document_renders() {
        let (factura, buyer, items, company) = sample_factura(ROWS_PER_PAGE * 2 + 5);

        let bytes = render_invoice(&factura, &buyer, &items, &company).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // Three pages carry noticeably more content than one
        let (single_factura, single_buyer, single_items, single_company) = sample_factura(1);
        let single =
            render_invoice(&single_factura, &single_buyer, &single_items, &single_company).unwrap();
        assert!(bytes.len() > single.len());
    }

    #[test]
    fn test_renders_with_and_without_iibb() {
        let (factura, buyer, items, mut company) = sample_factura(2);

        // Default profile has no IIBB registration; the line is skipped
        assert!(company.iibb.is_none());
        let without = render_invoice(&factura, &buyer, &items, &company).unwrap();
        assert!(without.starts_with(b"%PDF"));

        company.iibb = Some("901-123456-7".to_string());
        let with = render_invoice(&factura, &buyer, &items, &company).unwrap();
        assert!(with.starts_with(b"%PDF"));
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(fmt_money(Money::from_centavos(0)), "$ 0,00");
        assert_eq!(fmt_money(Money::from_centavos(21_000_00)), "$ 21.000,00");
        assert_eq!(fmt_money(Money::from_centavos(1_234_567_89)), "$ 1.234.567,89");
        // Sign goes before the symbol, the Argentine way
        assert_eq!(fmt_money(Money::from_centavos(-5_50)), "-$ 5,50");
    }
}
