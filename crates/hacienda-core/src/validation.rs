//! # Validation Module
//!
//! Input validation utilities for Hacienda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Frontend (TypeScript)                                     │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Tauri Command (Rust)                                      │
//! │  ├── Type validation (deserialization)                              │
//! │  └── THIS MODULE: business rule validation                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                          │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hacienda_core::validation::{validate_cuit, validate_party_name};
//!
//! validate_party_name("Frigorífico del Oeste").unwrap();
//! validate_cuit("30-50001091-2").unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_LOT_WEIGHT_KG;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a party (buyer/supplier) name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_party_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an animal ear-tag (caravana).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Alphanumeric, hyphens and underscores only
pub fn validate_tag(tag: &str) -> ValidationResult<()> {
    let tag = tag.trim();

    if tag.is_empty() {
        return Err(ValidationError::Required {
            field: "tag".to_string(),
        });
    }

    if tag.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "tag".to_string(),
            max: 50,
        });
    }

    if !tag
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "tag".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a CUIT (Argentine taxpayer id) and returns its 11 digits.
///
/// Accepts `XX-XXXXXXXX-X` or bare digits. The last digit is a mod-11
/// check digit over the first ten with weights 5,4,3,2,7,6,5,4,3,2.
pub fn validate_cuit(cuit: &str) -> ValidationResult<String> {
    let digits: String = cuit.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 11 {
        return Err(ValidationError::InvalidFormat {
            field: "cuit".to_string(),
            reason: "must contain exactly 11 digits".to_string(),
        });
    }

    const WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];
    let sum: u32 = digits
        .chars()
        .take(10)
        .zip(WEIGHTS)
        .map(|(c, w)| c.to_digit(10).unwrap_or(0) * w)
        .sum();

    let expected = match 11 - (sum % 11) {
        11 => 0,
        10 => 9,
        d => d,
    };

    let last = digits
        .chars()
        .nth(10)
        .and_then(|c| c.to_digit(10))
        .unwrap_or(u32::MAX);

    if last != expected {
        return Err(ValidationError::InvalidFormat {
            field: "cuit".to_string(),
            reason: "check digit mismatch".to_string(),
        });
    }

    Ok(digits)
}

/// Validates an animal category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a weight in kilograms.
///
/// ## Rules
/// - Must be non-negative
/// - Must not exceed [`MAX_LOT_WEIGHT_KG`]
pub fn validate_weight_kg(weight_kg: i64) -> ValidationResult<()> {
    if weight_kg < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "weight_kg".to_string(),
        });
    }

    if weight_kg > MAX_LOT_WEIGHT_KG {
        return Err(ValidationError::OutOfRange {
            field: "weight_kg".to_string(),
            min: 0,
            max: MAX_LOT_WEIGHT_KG,
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: donated or written-off lots)
pub fn validate_price_centavos(centavos: i64) -> ValidationResult<()> {
    if centavos < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

/// Validates a punto de venta identifier (>= 1).
pub fn validate_punto_venta(punto_venta: i64) -> ValidationResult<()> {
    if punto_venta < 1 {
        return Err(ValidationError::MustBePositive {
            field: "punto_venta".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_name() {
        assert!(validate_party_name("Frigorífico del Oeste").is_ok());
        assert!(validate_party_name("   ").is_err());
        assert!(validate_party_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_tag() {
        assert!(validate_tag("AR-1234").is_ok());
        assert!(validate_tag("").is_err());
        assert!(validate_tag("AR 1234").is_err());
    }

    #[test]
    fn test_cuit_valid() {
        // 30-50001091-2: sum 5*3+4*0+3*5+2*0+7*0+6*0+5*1+4*0+3*9+2*1 = 64,
        // 11 - (64 % 11) = 2
        assert_eq!(validate_cuit("30-50001091-2").unwrap(), "30500010912");
        assert_eq!(validate_cuit("30500010912").unwrap(), "30500010912");
    }

    #[test]
    fn test_cuit_invalid() {
        assert!(validate_cuit("30-50001091-3").is_err()); // wrong check digit
        assert!(validate_cuit("123").is_err()); // too short
        assert!(validate_cuit("").is_err());
    }

    #[test]
    fn test_weight() {
        assert!(validate_weight_kg(0).is_ok());
        assert!(validate_weight_kg(450).is_ok());
        assert!(validate_weight_kg(-1).is_err());
        assert!(validate_weight_kg(MAX_LOT_WEIGHT_KG + 1).is_err());
    }

    #[test]
    fn test_price() {
        assert!(validate_price_centavos(0).is_ok());
        assert!(validate_price_centavos(45_000).is_ok());
        assert!(validate_price_centavos(-1).is_err());
    }

    #[test]
    fn test_punto_venta() {
        assert!(validate_punto_venta(1).is_ok());
        assert!(validate_punto_venta(0).is_err());
        assert!(validate_punto_venta(-5).is_err());
    }
}
