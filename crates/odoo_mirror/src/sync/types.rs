//! Sync result types.
//!
//! Results are built fresh for every run and handed back to the caller; they
//! are never persisted.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Counters for one entity kind's reconciliation.
///
/// `inserted + updated + deleted + errors` always equals the number of
/// per-item operations attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub inserted: usize,
    pub updated: usize,
    /// Soft deletes.
    pub deleted: usize,
    pub errors: usize,
    /// One message per error, in the order they happened.
    pub error_details: Vec<String>,
}

impl SyncResult {
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors += 1;
        self.error_details.push(message.into());
    }

    /// Records successfully written.
    pub fn total_processed(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    /// Per-item operations attempted, successful or not.
    pub fn total_attempted(&self) -> usize {
        self.total_processed() + self.errors
    }

    /// Percentage (0-100) of attempted operations that succeeded; 0 when
    /// nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        match self.total_attempted() {
            0 => 0.0,
            total => self.total_processed() as f64 / total as f64 * 100.0,
        }
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inserted={}, updated={}, deleted={}, errors={}",
            self.inserted, self.updated, self.deleted, self.errors
        )
    }
}

/// Outcome of syncing one entity kind.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySyncResult {
    pub entity_name: String,
    pub result: SyncResult,
    #[serde(rename = "duration_seconds", serialize_with = "as_seconds")]
    pub duration: Duration,
}

impl EntitySyncResult {
    /// True when no per-item operation failed.
    pub fn was_successful(&self) -> bool {
        self.result.errors == 0
    }
}

/// One registered kind inside a [`FullSyncResult`].
#[derive(Debug, Clone, Serialize)]
pub struct EntityOutcome {
    /// Registry name (e.g. `contacts`).
    pub name: String,
    pub result: SyncResult,
    #[serde(rename = "duration_seconds", serialize_with = "as_seconds")]
    pub duration: Duration,
    /// Set when the kind failed fatally; `result` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl EntityOutcome {
    pub fn was_successful(&self) -> bool {
        self.failure.is_none() && self.result.errors == 0
    }
}

/// Aggregate of a run over every registered kind, in registration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FullSyncResult {
    pub entities: Vec<EntityOutcome>,
    #[serde(rename = "total_duration_seconds", serialize_with = "as_seconds")]
    pub total_duration: Duration,
    /// Kinds that finished without any error.
    pub success_count: usize,
    /// Kinds that failed fatally or finished with per-item errors.
    pub error_count: usize,
}

impl FullSyncResult {
    pub fn total_inserted(&self) -> usize {
        self.entities.iter().map(|e| e.result.inserted).sum()
    }

    pub fn total_updated(&self) -> usize {
        self.entities.iter().map(|e| e.result.updated).sum()
    }

    pub fn total_deleted(&self) -> usize {
        self.entities.iter().map(|e| e.result.deleted).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.entities.iter().map(|e| e.result.errors).sum()
    }

    pub fn was_successful(&self) -> bool {
        self.error_count == 0
    }

    /// The result recorded for `name`, if that kind ran.
    pub fn entity_result(&self, name: &str) -> Option<&SyncResult> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.result)
    }

    /// Kinds that failed fatally, with their error messages.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entities
            .iter()
            .filter_map(|e| e.failure.as_deref().map(|f| (e.name.as_str(), f)))
    }

    pub fn has_fatal_failures(&self) -> bool {
        self.entities.iter().any(|e| e.failure.is_some())
    }
}
