//! Remote data source abstraction.
//!
//! [`RemoteSource`] is the seam between the sync engine and the external
//! system: a handful of primitive calls (`authenticate`, `search_read`,
//! `search`) plus entity helpers built on top of them. The Odoo JSON-RPC
//! client implements it; engine tests use in-memory fakes.
//!
//! # Example
//!
//! ```ignore
//! use odoo_mirror::remote::{Domain, RemoteSource};
//!
//! async fn count_companies<R: RemoteSource>(remote: &R) -> odoo_mirror::remote::Result<usize> {
//!     let domain = Domain::new().eq("is_company", true);
//!     Ok(remote.fetch_contacts(Some(&domain)).await?.len())
//! }
//! ```

mod domain;
mod errors;
mod types;

pub use domain::{Domain, Operator, Term};
pub use errors::{RemoteError, Result};
pub use types::{CONTACT_FIELDS, CONTACT_MODEL, INVOICE_FIELDS, INVOICE_MODEL, Page, RemoteRecord, RemoteSource};
