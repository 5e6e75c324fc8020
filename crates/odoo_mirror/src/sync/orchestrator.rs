use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;

use super::contact::ContactSyncStrategy;
use super::errors::{Result, SyncError};
use super::invoice::InvoiceSyncStrategy;
use super::strategy::EntitySync;
use super::types::{EntityOutcome, EntitySyncResult, FullSyncResult, SyncResult};
use crate::remote::RemoteSource;
use crate::store::{ContactStore, InvoiceStore};

pub const CONTACTS: &str = "contacts";
pub const INVOICES: &str = "invoices";

/// Runs registered entity kinds, isolating their failures from each other.
///
/// The registry is fixed at construction; adding an entity kind means
/// registering another [`EntitySync`] through [`SyncOrchestrator::builder`].
pub struct SyncOrchestrator {
    strategies: Vec<(String, Box<dyn EntitySync>)>,
}

#[derive(Default)]
pub struct SyncOrchestratorBuilder {
    strategies: Vec<(String, Box<dyn EntitySync>)>,
}

impl SyncOrchestratorBuilder {
    /// Register `strategy` under `name`. Kinds run in registration order.
    ///
    /// # Errors
    /// Returns [`SyncError::DuplicateEntity`] if `name` is already taken.
    pub fn register(
        mut self,
        name: impl Into<String>,
        strategy: impl EntitySync + 'static,
    ) -> Result<Self> {
        let name = name.into();
        if self.strategies.iter().any(|(existing, _)| *existing == name) {
            return Err(SyncError::DuplicateEntity { name });
        }
        self.strategies.push((name, Box::new(strategy)));
        Ok(self)
    }

    pub fn build(self) -> SyncOrchestrator {
        SyncOrchestrator {
            strategies: self.strategies,
        }
    }
}

impl SyncOrchestrator {
    pub fn builder() -> SyncOrchestratorBuilder {
        SyncOrchestratorBuilder::default()
    }

    /// The standard registry: `contacts` then `invoices`, backed by the
    /// sea-orm stores on `db`.
    pub fn standard<R>(remote: Arc<R>, db: Arc<DatabaseConnection>) -> Self
    where
        R: RemoteSource + ?Sized + 'static,
    {
        let contacts = ContactSyncStrategy::new(Arc::clone(&remote), ContactStore::new(Arc::clone(&db)));
        let invoices = InvoiceSyncStrategy::new(remote, InvoiceStore::new(db));

        let strategies = vec![
            (CONTACTS.to_string(), Box::new(contacts) as Box<dyn EntitySync>),
            (INVOICES.to_string(), Box::new(invoices) as Box<dyn EntitySync>),
        ];
        SyncOrchestrator { strategies }
    }

    /// Registered kind names, in run order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Sync one registered kind.
    ///
    /// # Errors
    /// [`SyncError::UnknownEntity`] for an unregistered name; otherwise
    /// whatever fatal error the kind raised.
    pub async fn sync_entity(&self, name: &str) -> Result<EntitySyncResult> {
        let (_, strategy) = self
            .strategies
            .iter()
            .find(|(registered, _)| registered == name)
            .ok_or_else(|| SyncError::unknown_entity(name))?;
        strategy.sync().await
    }

    pub async fn sync_contacts(&self) -> Result<EntitySyncResult> {
        self.sync_entity(CONTACTS).await
    }

    pub async fn sync_invoices(&self) -> Result<EntitySyncResult> {
        self.sync_entity(INVOICES).await
    }

    /// Sync every registered kind in order.
    ///
    /// A kind that fails fatally is recorded with an empty result and its
    /// error message; the remaining kinds still run.
    pub async fn sync_all(&self) -> FullSyncResult {
        let started = Instant::now();
        tracing::info!(kinds = self.strategies.len(), "Starting full sync");

        let mut full = FullSyncResult::default();

        for (name, strategy) in &self.strategies {
            let kind_started = Instant::now();
            let outcome = match strategy.sync().await {
                Ok(entity) => EntityOutcome {
                    name: name.clone(),
                    result: entity.result,
                    duration: entity.duration,
                    failure: None,
                },
                Err(e) => {
                    tracing::error!(entity = %name, "Failed to sync {}: {}", name, e);
                    EntityOutcome {
                        name: name.clone(),
                        result: SyncResult::default(),
                        duration: kind_started.elapsed(),
                        failure: Some(e.to_string()),
                    }
                }
            };

            if outcome.was_successful() {
                full.success_count += 1;
            } else {
                full.error_count += 1;
            }
            full.entities.push(outcome);
        }

        full.total_duration = started.elapsed();
        tracing::info!(
            inserted = full.total_inserted(),
            updated = full.total_updated(),
            deleted = full.total_deleted(),
            errors = full.total_errors(),
            failed_kinds = full.error_count,
            elapsed_ms = full.total_duration.as_millis() as u64,
            "Full sync completed"
        );

        full
    }
}
