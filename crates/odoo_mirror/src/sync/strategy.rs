//! The reconciliation loop.
//!
//! A [`SyncStrategy`] supplies four capabilities for one entity kind: fetch
//! the remote set, hand out the local store, map a record, and name the kind.
//! [`run_sync`] drives any strategy through the same steps:
//!
//! 1. fetch the full remote set (fatal on failure)
//! 2. snapshot remote ids and enumerate live local ids (fatal on failure)
//! 3. upsert every remote record, isolating per-item failures
//! 4. soft-delete live local records missing from the snapshot
//!
//! Upserts always finish before deletes, and delete candidates come from the
//! snapshot taken before any upsert ran.

use std::collections::HashSet;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::errors::{Result, SyncError};
use super::types::{EntitySyncResult, SyncResult};
use crate::entity::MirrorRecord;
use crate::mapper::MapError;
use crate::remote::{RemoteError, RemoteRecord};
use crate::store::{EntityStore, StoreError};

/// Capabilities one entity kind provides to the reconciliation loop.
#[async_trait]
pub trait SyncStrategy: Send + Sync {
    type Store: EntityStore;

    /// Singular kind name used in log lines and error details (`contact`).
    fn entity_name(&self) -> &str;

    /// Fetch the complete remote set for this kind.
    async fn fetch_remote(&self) -> std::result::Result<Vec<RemoteRecord>, RemoteError>;

    fn store(&self) -> &Self::Store;

    /// Map one remote record into the store's column set.
    fn map_record(
        &self,
        record: &RemoteRecord,
    ) -> std::result::Result<<Self::Store as EntityStore>::Fields, MapError>;
}

/// Object-safe view of a strategy, as held by the orchestrator.
#[async_trait]
pub trait EntitySync: Send + Sync {
    fn name(&self) -> &str;

    async fn sync(&self) -> Result<EntitySyncResult>;
}

#[async_trait]
impl<S> EntitySync for S
where
    S: SyncStrategy,
{
    fn name(&self) -> &str {
        self.entity_name()
    }

    async fn sync(&self) -> Result<EntitySyncResult> {
        run_sync(self).await
    }
}

#[derive(Debug, Error)]
enum ItemError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

enum Upsert {
    Inserted,
    Updated { revived: bool },
}

/// The record's raw `id` as sent by the remote, for error details.
fn id_label(record: &RemoteRecord) -> String {
    match record.raw("id") {
        None | Some(Value::Null) => "<missing id>".to_string(),
        Some(Value::String(id)) => format!("{id:?}"),
        Some(id) => id.to_string(),
    }
}

async fn upsert_one<S>(strategy: &S, record: &RemoteRecord) -> std::result::Result<Upsert, ItemError>
where
    S: SyncStrategy + ?Sized,
{
    let fields = strategy.map_record(record)?;
    // The mapper has already rejected records without an id.
    let odoo_id = record.id().ok_or_else(|| MapError::missing("id"))?;
    let store = strategy.store();

    match store.get_by_external_id(odoo_id).await? {
        Some(existing) => {
            let revived = existing.is_deleted();
            store.update(&existing, fields).await?;
            Ok(Upsert::Updated { revived })
        }
        None => {
            store.create(fields).await?;
            Ok(Upsert::Inserted)
        }
    }
}

/// Soft-deletes `odoo_id` if it is still live. Returns whether a row changed.
async fn delete_one<S>(strategy: &S, odoo_id: i64) -> std::result::Result<bool, StoreError>
where
    S: SyncStrategy + ?Sized,
{
    let store = strategy.store();
    match store.get_by_external_id(odoo_id).await? {
        Some(existing) if !existing.is_deleted() => {
            store.soft_delete(&existing).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Reconcile one entity kind against the remote system.
///
/// # Errors
/// Returns [`SyncError::Fetch`] when the remote listing fails and
/// [`SyncError::StoreUnavailable`] when local ids cannot be enumerated. Every
/// other failure is counted in the returned result.
pub async fn run_sync<S>(strategy: &S) -> Result<EntitySyncResult>
where
    S: SyncStrategy + ?Sized,
{
    let started = Instant::now();
    let entity = strategy.entity_name().to_string();
    let mut result = SyncResult::default();

    tracing::info!(entity = %entity, "Starting {} sync", entity);

    let records = strategy.fetch_remote().await.map_err(|source| {
        tracing::error!(entity = %entity, "{} sync failed: {}", entity, source);
        SyncError::Fetch {
            entity: entity.clone(),
            source,
        }
    })?;

    let remote_ids: HashSet<i64> = records.iter().filter_map(RemoteRecord::id).collect();

    let local_ids = strategy.store().all_external_ids().await.map_err(|source| {
        tracing::error!(entity = %entity, "{} sync failed: {}", entity, source);
        SyncError::StoreUnavailable {
            entity: entity.clone(),
            source,
        }
    })?;

    let mut to_delete: Vec<i64> = local_ids.difference(&remote_ids).copied().collect();
    to_delete.sort_unstable();

    for record in &records {
        match upsert_one(strategy, record).await {
            Ok(Upsert::Inserted) => {
                result.inserted += 1;
                tracing::debug!(entity = %entity, odoo_id = record.id(), "Inserted {}", entity);
            }
            Ok(Upsert::Updated { revived }) => {
                result.updated += 1;
                if revived {
                    tracing::info!(
                        entity = %entity,
                        odoo_id = record.id(),
                        "Revived soft-deleted {} that reappeared remotely",
                        entity
                    );
                } else {
                    tracing::debug!(entity = %entity, odoo_id = record.id(), "Updated {}", entity);
                }
            }
            Err(e) => {
                let message = format!("Error processing {} {}: {}", entity, id_label(record), e);
                tracing::warn!(entity = %entity, odoo_id = record.id(), "{}", message);
                result.add_error(message);
            }
        }
    }

    for odoo_id in to_delete {
        match delete_one(strategy, odoo_id).await {
            Ok(true) => {
                result.deleted += 1;
                tracing::debug!(entity = %entity, odoo_id, "Soft deleted {}", entity);
            }
            Ok(false) => {}
            Err(e) => {
                let message = format!("Error deleting {} {}: {}", entity, odoo_id, e);
                tracing::warn!(entity = %entity, odoo_id, "{}", message);
                result.add_error(message);
            }
        }
    }

    let duration = started.elapsed();
    tracing::info!(
        entity = %entity,
        inserted = result.inserted,
        updated = result.updated,
        deleted = result.deleted,
        errors = result.errors,
        elapsed_ms = duration.as_millis() as u64,
        "{} sync completed: {}",
        entity,
        result
    );

    Ok(EntitySyncResult {
        entity_name: entity,
        result,
        duration,
    })
}
