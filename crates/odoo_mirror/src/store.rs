//! Local store: per-entity persistence for the mirror.
//!
//! [`EntityStore`] is the write surface the sync engine depends on. The
//! sea-orm backed [`ContactStore`] and [`InvoiceStore`] implement it and also
//! expose read helpers (`find_by_id`, `list`, `count`) for query consumers.
//!
//! Every operation runs as its own statement and is durable on return.

mod contact;
mod errors;
mod invoice;
#[cfg(test)]
pub(crate) mod memory;
mod query;

use std::collections::HashSet;

use async_trait::async_trait;

pub use contact::ContactStore;
pub use errors::{Result, StoreError};
pub use invoice::InvoiceStore;
pub use query::{PaginatedResult, Pagination};

use crate::entity::MirrorRecord;

/// Write operations the sync engine performs against one entity kind.
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Record: MirrorRecord + Send + Sync;
    type Fields: Send;

    /// Look up a record by Odoo id, including soft-deleted rows.
    async fn get_by_external_id(&self, odoo_id: i64) -> Result<Option<Self::Record>>;

    /// Odoo ids of every live (not soft-deleted) record.
    async fn all_external_ids(&self) -> Result<HashSet<i64>>;

    /// Insert a new record; the store assigns the surrogate id and timestamps.
    async fn create(&self, fields: Self::Fields) -> Result<Self::Record>;

    /// Overwrite the mapped columns of `record`, keeping its identity and
    /// creation time. A soft-deleted record is revived.
    async fn update(&self, record: &Self::Record, fields: Self::Fields) -> Result<Self::Record>;

    /// Flag `record` as deleted without removing the row.
    async fn soft_delete(&self, record: &Self::Record) -> Result<Self::Record>;
}
