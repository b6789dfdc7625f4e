//! # Invoice Numbering
//!
//! Numbering configuration and formatted invoice numbers.
//!
//! ## How Numbering Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Invoice Number Issuance                         │
//! │                                                                     │
//! │  One NumberingConfig per comprobante class (A, B, C, E),            │
//! │  keyed by (comprobante, punto_venta).                               │
//! │                                                                     │
//! │  issue:  last_number ──► last_number + 1  (atomic, in hacienda-db)  │
//! │                │                                                    │
//! │                ▼                                                    │
//! │  format: prefix + zero-pad(next, 8) + suffix                        │
//! │          "0001-" + "00000042"       + "-A"                          │
//! │                                                                     │
//! │  Invariants:                                                        │
//! │  • last_number is monotonically non-decreasing, forever             │
//! │  • two callers never receive the same integer                       │
//! │  • the serialization point is the database UPDATE, nowhere else     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module owns the *rules* (validation, formatting). The atomic
//! increment lives in `hacienda-db::NumberingRepository`, the only place
//! that can serialize concurrent issuers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Comprobante;
use crate::{MAX_AFFIX_LEN, NUMBER_PAD_WIDTH};

// =============================================================================
// Numbering Configuration
// =============================================================================

/// Numbering configuration for one comprobante class.
///
/// Process-wide shared configuration: one instance per document class.
/// Facturas reference a snapshot of this at issuance time but never own it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct NumberingConfig {
    pub comprobante: Comprobante,
    /// Point-of-sale identifier, part of the numbering key. Must be >= 1.
    pub punto_venta: i64,
    /// Last issued sequential number. Monotonically non-decreasing.
    pub last_number: i64,
    /// Printed before the padded number, at most 10 characters.
    pub prefix: String,
    /// Printed after the padded number, at most 10 characters.
    pub suffix: String,
    /// Inactive configurations refuse to issue.
    pub active: bool,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl NumberingConfig {
    /// Creates a configuration with a fresh counter.
    pub fn new(comprobante: Comprobante, punto_venta: i64) -> Self {
        NumberingConfig {
            comprobante,
            punto_venta,
            last_number: 0,
            prefix: String::new(),
            suffix: String::new(),
            active: true,
            updated_at: Utc::now(),
        }
    }

    /// Validates the configuration. Enforced at configuration-edit time,
    /// before anything is persisted.
    ///
    /// ## Rules
    /// - `punto_venta` >= 1
    /// - `last_number` >= 0
    /// - prefix and suffix at most [`MAX_AFFIX_LEN`] characters
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.punto_venta < 1 {
            return Err(ValidationError::MustBePositive {
                field: "punto_venta".to_string(),
            });
        }

        if self.last_number < 0 {
            return Err(ValidationError::MustBeNonNegative {
                field: "last_number".to_string(),
            });
        }

        if self.prefix.chars().count() > MAX_AFFIX_LEN {
            return Err(ValidationError::TooLong {
                field: "prefix".to_string(),
                max: MAX_AFFIX_LEN,
            });
        }

        if self.suffix.chars().count() > MAX_AFFIX_LEN {
            return Err(ValidationError::TooLong {
                field: "suffix".to_string(),
                max: MAX_AFFIX_LEN,
            });
        }

        Ok(())
    }

    /// Formats a sequential number according to this configuration.
    ///
    /// ## Example
    /// ```rust
    /// use hacienda_core::numbering::NumberingConfig;
    /// use hacienda_core::types::Comprobante;
    ///
    /// let mut config = NumberingConfig::new(Comprobante::A, 1);
    /// config.prefix = "2024".to_string();
    /// config.suffix = "A".to_string();
    /// assert_eq!(config.format_number(7), "202400000007A");
    /// ```
    pub fn format_number(&self, number: i64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            number,
            self.suffix,
            width = NUMBER_PAD_WIDTH
        )
    }

    /// The number the next issuance would produce, without issuing it.
    pub fn peek_next(&self) -> String {
        self.format_number(self.last_number + 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        let mut config = NumberingConfig::new(Comprobante::A, 1);
        config.prefix = "2024".to_string();
        config.suffix = "A".to_string();

        // "2024" + 8-digit zero-padded number + "A"
        assert_eq!(config.format_number(7), "202400000007A");
    }

    #[test]
    fn test_format_fresh_config() {
        let config = NumberingConfig::new(Comprobante::B, 3);
        assert_eq!(config.peek_next(), "00000001");
    }

    #[test]
    fn test_format_wide_number_is_not_truncated() {
        let config = NumberingConfig::new(Comprobante::A, 1);
        // Padding is a minimum, not a cap
        assert_eq!(config.format_number(123_456_789), "123456789");
    }

    #[test]
    fn test_validate_ok() {
        let mut config = NumberingConfig::new(Comprobante::A, 1);
        config.prefix = "0001-".to_string();
        config.suffix = "-A".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_punto_venta() {
        let config = NumberingConfig::new(Comprobante::A, 0);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_negative_counter() {
        let mut config = NumberingConfig::new(Comprobante::A, 1);
        config.last_number = -1;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[test]
    fn test_validate_affix_length() {
        let mut config = NumberingConfig::new(Comprobante::A, 1);
        config.prefix = "x".repeat(11);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::TooLong { .. })
        ));

        config.prefix = "x".repeat(10);
        config.suffix = "y".repeat(11);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
