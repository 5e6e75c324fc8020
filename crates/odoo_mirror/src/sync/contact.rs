use std::sync::Arc;

use async_trait::async_trait;

use super::strategy::SyncStrategy;
use crate::entity::contact::ContactFields;
use crate::mapper::{ContactMapper, EntityMapper, MapError};
use crate::remote::{Domain, RemoteError, RemoteRecord, RemoteSource};
use crate::store::EntityStore;

/// Mirrors Odoo partners into the contacts store.
pub struct ContactSyncStrategy<R: ?Sized, S> {
    remote: Arc<R>,
    store: S,
    mapper: ContactMapper,
    filter: Option<Domain>,
}

impl<R: ?Sized, S> ContactSyncStrategy<R, S> {
    pub fn new(remote: Arc<R>, store: S) -> Self {
        Self {
            remote,
            store,
            mapper: ContactMapper,
            filter: None,
        }
    }

    /// Restrict the mirrored partners. Local contacts outside the filter are
    /// soft-deleted on the next run.
    #[must_use]
    pub fn with_filter(mut self, filter: Domain) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[async_trait]
impl<R, S> SyncStrategy for ContactSyncStrategy<R, S>
where
    R: RemoteSource + ?Sized,
    S: EntityStore<Fields = ContactFields>,
{
    type Store = S;

    fn entity_name(&self) -> &str {
        "contact"
    }

    async fn fetch_remote(&self) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.remote.fetch_contacts(self.filter.as_ref()).await
    }

    fn store(&self) -> &S {
        &self.store
    }

    fn map_record(&self, record: &RemoteRecord) -> Result<ContactFields, MapError> {
        self.mapper.map(record)
    }
}
