//! # API Error Type
//!
//! Unified error type for Tauri commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Hacienda                               │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  invoke('create_invoice')                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Domain Error? ─── CoreError::MissingPrice ────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('create_invoice')                                       │
//! │  } catch (e) {                                                          │
//! │    // e.message = "No price configured for category: Novillo"           │
//! │    // e.code = "MISSING_PRICE"                                          │
//! │    // e.severity = "warning"                                            │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tauri Error Serialization
//! Tauri requires errors to be serializable. We implement `Serialize`
//! and include a machine-readable `code`, a human-readable `message`,
//! and a `severity` hint so the frontend can pick the right notification.

use hacienda_core::CoreError;
use hacienda_db::DbError;
use hacienda_pdf::PdfError;
use serde::Serialize;

/// API error returned from Tauri commands.
///
/// ## Serialization
/// This is what the frontend receives when a command fails:
/// ```json
/// {
///   "code": "MISSING_PRICE",
///   "message": "No price configured for category: Novillo",
///   "severity": "warning"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// How loudly the frontend should surface this error
    pub severity: Severity,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await invoke('wizard_next_step');
/// } catch (e) {
///   switch (e.code) {
///     case 'MISSING_PRICE':
///       highlightPriceInput(e.message);
///       break;
///     case 'VALIDATION_ERROR':
///       showForm(e.message);
///       break;
///     default:
///       showError('An error occurred');
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Business logic error (422)
    BusinessLogic,

    /// Internal server error (500)
    Internal,

    /// Sale wizard operation failed
    WizardError,

    /// No price configured for an animal category
    MissingPrice,

    /// Numbering for the requested comprobante is disabled
    NumberingInactive,

    /// PDF rendering or presentation failed
    PdfError,
}

/// Severity hint for the frontend notification layer.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl ApiError {
    /// Creates a new API error with `Error` severity.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a new API error with an explicit severity.
    pub fn with_severity(code: ErrorCode, message: impl Into<String>, severity: Severity) -> Self {
        ApiError {
            code,
            message: message.into(),
            severity,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::with_severity(ErrorCode::ValidationError, message, Severity::Warning)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a wizard error.
    pub fn wizard(message: impl Into<String>) -> Self {
        ApiError::with_severity(ErrorCode::WizardError, message, Severity::Warning)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InactiveNumbering { comprobante } => ApiError::with_severity(
                ErrorCode::NumberingInactive,
                format!("Numbering for comprobante {} is inactive", comprobante),
                Severity::Warning,
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::Domain(e) => ApiError::from(e),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingCategoryPrice { category } => ApiError::with_severity(
                ErrorCode::MissingPrice,
                format!("No price defined for category '{}'", category),
                Severity::Warning,
            ),
            CoreError::InvalidStatusTransition { from, to } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Factura cannot go from {:?} to {:?}", from, to),
            ),
            CoreError::TooManyLots { max } => ApiError::with_severity(
                ErrorCode::BusinessLogic,
                format!("Sale cannot have more than {} lots", max),
                Severity::Warning,
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts PDF rendering errors to API errors.
impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::EmptyDocument { number } => ApiError::with_severity(
                ErrorCode::PdfError,
                format!("Factura {} has no line items to print", number),
                Severity::Warning,
            ),
            PdfError::Font(e) | PdfError::Serialize(e) => {
                tracing::error!("PDF rendering failed: {}", e);
                ApiError::new(ErrorCode::PdfError, "Could not generate the PDF document")
            }
        }
    }
}

/// Makes ApiError work as a Tauri command error.
///
/// Tauri requires the error type to implement `Into<tauri::ipc::InvokeError>`.
/// Since we implement `Serialize`, we can convert to JSON string.
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
