//! # hacienda-db: Database Layer for Hacienda
//!
//! This crate provides database access for the Hacienda back-office.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hacienda Data Flow                               │
//! │                                                                         │
//! │  Tauri Command (create_invoice)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   hacienda-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │ (numbering.rs) │    │  (embedded)  │ │   │
//! │  │   │               │    │                │    │              │ │   │
//! │  │   │ SqlitePool    │    │ NumberingRepo  │    │ 001_init.sql │ │   │
//! │  │   │ Connection    │◄───│ InvoiceRepo    │    │ ...          │ │   │
//! │  │   │ Management    │    │ SaleRepo       │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/Library/Application Support/com.hacienda.app/hacienda.db   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (numbering, invoice, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hacienda_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/db.sqlite");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let issued = db.numbering().issue_number(Comprobante::A).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::animal::AnimalRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::numbering::{IssuedNumber, NumberingRepository};
pub use repository::party::PartyRepository;
pub use repository::sale::SaleRepository;
