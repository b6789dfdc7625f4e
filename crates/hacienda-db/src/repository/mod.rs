//! # Repository Module
//!
//! Database repository implementations for Hacienda.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Tauri Command                                                         │
//! │       │                                                                 │
//! │       │  db.numbering().issue_number(Comprobante::A)                    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  NumberingRepository                                                   │
//! │  ├── issue_number(&self, comprobante)                                   │
//! │  ├── get(&self, comprobante)                                            │
//! │  └── save(&self, config)                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory SQLite)                                     │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`numbering::NumberingRepository`] - Invoice number issuance and config
//! - [`invoice::InvoiceRepository`] - Factura persistence and status machine
//! - [`party::PartyRepository`] - Buyer/supplier CRUD and search
//! - [`animal::AnimalRepository`] - Inventory listing
//! - [`sale::SaleRepository`] - Sale registration with lots

pub mod animal;
pub mod invoice;
pub mod numbering;
pub mod party;
pub mod sale;
