//! Odoo Mirror - keeps a local relational copy of Odoo contacts and invoices.
//!
//! The heart of the crate is the reconciliation engine in [`sync`]: each
//! entity kind fetches its full remote set, upserts every record into the
//! local store, and soft-deletes local records that vanished remotely. Item
//! failures are counted instead of aborting the batch, and one kind failing
//! never stops the others.
//!
//! # Features
//!
//! - `odoo` - the JSON-RPC [`odoo::OdooClient`] backed by reqwest.
//! - `migrate` - schema migrations and [`connect_and_migrate`].
//! - `sqlite` / `postgres` - database backends.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use odoo_mirror::{connect_and_migrate, odoo::{OdooClient, OdooConfig}, sync::SyncOrchestrator};
//!
//! let db = Arc::new(connect_and_migrate("sqlite://mirror.db?mode=rwc").await?);
//! let client = Arc::new(OdooClient::new(config)?);
//! let full = SyncOrchestrator::standard(client, db).sync_all().await;
//! println!("{} inserted, {} updated", full.total_inserted(), full.total_updated());
//! ```

pub mod db;
pub mod entity;
pub mod http;
pub mod mapper;
pub mod remote;
pub mod retry;
pub mod scheduler;
pub mod store;
pub mod sync;

#[cfg(feature = "odoo")]
pub mod odoo;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use remote::{RemoteError, RemoteSource};
pub use scheduler::SyncScheduler;
pub use store::{EntityStore, StoreError};
pub use sync::{FullSyncResult, SyncError, SyncOrchestrator};
