use std::sync::Arc;

use async_trait::async_trait;

use super::strategy::SyncStrategy;
use crate::entity::invoice::InvoiceFields;
use crate::mapper::{EntityMapper, InvoiceMapper, MapError};
use crate::remote::{Domain, RemoteError, RemoteRecord, RemoteSource};
use crate::store::EntityStore;

/// Mirrors Odoo customer invoices (`move_type = out_invoice`) into the
/// invoices store. Vendor bills and credit notes are never fetched.
pub struct InvoiceSyncStrategy<R: ?Sized, S> {
    remote: Arc<R>,
    store: S,
    mapper: InvoiceMapper,
    domain: Domain,
}

impl<R: ?Sized, S> InvoiceSyncStrategy<R, S> {
    pub fn new(remote: Arc<R>, store: S) -> Self {
        Self {
            remote,
            store,
            mapper: InvoiceMapper,
            domain: Domain::customer_invoices(),
        }
    }

    /// Narrow the customer-invoice domain further.
    #[must_use]
    pub fn with_filter(mut self, filter: Domain) -> Self {
        self.domain = Domain::customer_invoices().and(&filter);
        self
    }
}

#[async_trait]
impl<R, S> SyncStrategy for InvoiceSyncStrategy<R, S>
where
    R: RemoteSource + ?Sized,
    S: EntityStore<Fields = InvoiceFields>,
{
    type Store = S;

    fn entity_name(&self) -> &str {
        "invoice"
    }

    async fn fetch_remote(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.remote.fetch_invoices(Some(&self.domain)).await
    }

    fn store(&self) -> &S {
        &self.store
    }

    fn map_record(&self, record: &RemoteRecord) -> Result<InvoiceFields, MapError> {
        self.mapper.map(record)
    }
}
