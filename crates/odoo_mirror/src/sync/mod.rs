//! Reconciliation engine.
//!
//! # Module Structure
//!
//! - [`strategy`] - `SyncStrategy`, the shared `run_sync` loop, `EntitySync`
//! - `contact` / `invoice` - the two Odoo entity strategies
//! - `orchestrator` - registry of kinds and the `sync_all` aggregate
//! - `types` - `SyncResult`, `EntitySyncResult`, `FullSyncResult`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use odoo_mirror::sync::SyncOrchestrator;
//!
//! let orchestrator = SyncOrchestrator::standard(Arc::new(client), Arc::new(db));
//! let full = orchestrator.sync_all().await;
//! println!("{} inserted, {} failed kinds", full.total_inserted(), full.error_count);
//! ```

mod contact;
mod errors;
mod invoice;
mod orchestrator;
pub mod strategy;
mod types;

pub use contact::ContactSyncStrategy;
pub use errors::{Result, SyncError};
pub use invoice::InvoiceSyncStrategy;
pub use orchestrator::{CONTACTS, INVOICES, SyncOrchestrator, SyncOrchestratorBuilder};
pub use strategy::{EntitySync, SyncStrategy, run_sync};
pub use types::{EntityOutcome, EntitySyncResult, FullSyncResult, SyncResult};
