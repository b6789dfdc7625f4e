//! # Tauri Commands Module
//!
//! All commands exposed to the frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── party.rs     ◄─── Buyer/supplier listing and creation
//! ├── animal.rs    ◄─── Available animal queries
//! ├── wizard.rs    ◄─── Sale wizard steps and confirmation
//! ├── invoice.rs   ◄─── Invoice creation and lifecycle
//! ├── numbering.rs ◄─── Numbering configuration
//! ├── pdf.rs       ◄─── PDF generation and presentation
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ─────────────────                                                      │
//! │  import { invoke } from '@tauri-apps/api/core';                         │
//! │                                                                         │
//! │  const invoices = await invoke('list_invoices', {                       │
//! │    limit: 50                                                            │
//! │  });                                                                    │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  async fn list_invoices(                                                │
//! │      db: State<'_, DbState>,  ◄── Injected by Tauri                    │
//! │      limit: Option<i64>,      ◄── Optional param                       │
//! │  ) -> Result<Vec<InvoiceDto>, ApiError>                                 │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Frontend receives: InvoiceDto[]                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection (Option B)
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_parties(db: State<'_, DbState>, ...)
//!
//! // Only needs wizard
//! async fn wizard_get(wizard: State<'_, WizardState>)
//!
//! // Needs database, wizard and config
//! async fn wizard_confirm(db: State<'_, DbState>, wizard: State<'_, WizardState>, ...)
//! ```

pub mod animal;
pub mod config;
pub mod invoice;
pub mod numbering;
pub mod party;
pub mod pdf;
pub mod wizard;
