//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`HACIENDA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//! If hot-reloading is added later, we'd wrap in `RwLock`.

use serde::{Deserialize, Serialize};

use hacienda_core::{CompanyProfile, Comprobante, FacturaStatus};

/// Application configuration.
///
/// ## Fields
/// Most fields have sensible defaults for development.
/// Production deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Issuer identity printed in the factura header.
    pub company: CompanyProfile,

    /// Comprobante class pre-selected in the sale wizard.
    pub default_comprobante: Comprobante,

    /// Status a freshly created factura starts in.
    ///
    /// `Pendiente` keeps a review step before emission; operations that
    /// want facturas live immediately can configure `Emitida` instead.
    pub initial_invoice_status: FacturaStatus,

    /// Days added to the issue date to produce the due date.
    pub due_days: i64,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Company: placeholder issuer from `hacienda-core`
    /// - Comprobante: A (IVA discriminated)
    /// - Initial status: pendiente (draft first, emit explicitly)
    /// - Due: 30 days
    /// - Currency: ARS ($)
    fn default() -> Self {
        ConfigState {
            company: CompanyProfile::default(),
            default_comprobante: Comprobante::A,
            initial_invoice_status: FacturaStatus::Pendiente,
            due_days: 30,
            currency_code: "ARS".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `HACIENDA_COMPANY_NAME`: Override issuer name
    /// - `HACIENDA_CUIT`: Override issuer CUIT
    /// - `HACIENDA_COMPROBANTE`: Override default comprobante (A/B/C/E)
    /// - `HACIENDA_INITIAL_STATUS`: `pendiente` (default) or `emitida`
    /// - `HACIENDA_DUE_DAYS`: Override due-date offset
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(name) = std::env::var("HACIENDA_COMPANY_NAME") {
            config.company.name = name;
        }

        if let Ok(cuit) = std::env::var("HACIENDA_CUIT") {
            config.company.cuit = cuit;
        }

        if let Ok(comprobante) = std::env::var("HACIENDA_COMPROBANTE") {
            match comprobante.to_uppercase().as_str() {
                "A" => config.default_comprobante = Comprobante::A,
                "B" => config.default_comprobante = Comprobante::B,
                "C" => config.default_comprobante = Comprobante::C,
                "E" => config.default_comprobante = Comprobante::E,
                other => tracing::warn!("Ignoring unknown HACIENDA_COMPROBANTE: {}", other),
            }
        }

        if let Ok(status) = std::env::var("HACIENDA_INITIAL_STATUS") {
            match status.to_lowercase().as_str() {
                "pendiente" => config.initial_invoice_status = FacturaStatus::Pendiente,
                "emitida" => config.initial_invoice_status = FacturaStatus::Emitida,
                other => tracing::warn!("Ignoring unknown HACIENDA_INITIAL_STATUS: {}", other),
            }
        }

        if let Ok(days_str) = std::env::var("HACIENDA_DUE_DAYS") {
            if let Ok(days) = days_str.parse::<i64>() {
                config.due_days = days;
            }
        }

        config
    }

    /// Formats a centavo amount in the Argentine convention:
    /// dot as thousands separator, comma as decimal separator.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(123456789), "$ 1.234.567,89");
    /// ```
    pub fn format_currency(&self, centavos: i64) -> String {
        let whole = (centavos / 100).abs();
        let frac = (centavos % 100).abs();

        let digits = whole.to_string();
        let bytes = digits.as_bytes();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let mut first = true;
        for chunk in bytes.rchunks(3).rev() {
            if !first {
                grouped.push('.');
            }
            grouped.push_str(std::str::from_utf8(chunk).expect("ascii digits"));
            first = false;
        }

        format!(
            "{} {}{},{:02}",
            self.currency_symbol,
            if centavos < 0 { "-" } else { "" },
            grouped,
            frac
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$ 12,34");
        assert_eq!(config.format_currency(100), "$ 1,00");
        assert_eq!(config.format_currency(1), "$ 0,01");
        assert_eq!(config.format_currency(0), "$ 0,00");
    }

    #[test]
    fn test_format_currency_thousands_grouping() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(123456789), "$ 1.234.567,89");
        assert_eq!(config.format_currency(100000), "$ 1.000,00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234), "$ -12,34");
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.default_comprobante, Comprobante::A);
        assert_eq!(config.initial_invoice_status, FacturaStatus::Pendiente);
        assert_eq!(config.due_days, 30);
    }
}
