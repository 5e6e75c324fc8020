use std::sync::Arc;
use std::time::Duration;

use odoo_mirror::connect_and_migrate;
use odoo_mirror::odoo::OdooClient;
use odoo_mirror::sync::{
    CONTACTS, EntityOutcome, EntitySyncResult, FullSyncResult, INVOICES, SyncOrchestrator,
};

use crate::config::Config;

/// Output format for sync summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Which entity kinds a manual sync covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum SyncTarget {
    /// Every registered kind, in order
    #[default]
    All,
    Contacts,
    Invoices,
}

impl SyncTarget {
    /// Registry name, or `None` for all kinds.
    fn entity(self) -> Option<&'static str> {
        match self {
            SyncTarget::All => None,
            SyncTarget::Contacts => Some(CONTACTS),
            SyncTarget::Invoices => Some(INVOICES),
        }
    }
}

/// Connect to the database and Odoo and register the standard kinds.
pub(crate) async fn build_orchestrator(
    config: &Config,
    database_url: &str,
) -> Result<SyncOrchestrator, Box<dyn std::error::Error>> {
    let odoo_config = config.odoo_config()?;
    tracing::info!(url = %odoo_config.url, db = %odoo_config.db, "Using Odoo instance");

    let db = Arc::new(connect_and_migrate(database_url).await?);
    let client = Arc::new(OdooClient::new(odoo_config)?);

    Ok(SyncOrchestrator::standard(client, db))
}

pub(crate) async fn handle_sync(
    target: SyncTarget,
    output: OutputFormat,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = build_orchestrator(config, database_url).await?;

    match target.entity() {
        None => {
            let full = orchestrator.sync_all().await;
            print_full(&full, output)?;
            if full.has_fatal_failures() {
                let failed: Vec<&str> = full.failures().map(|(name, _)| name).collect();
                return Err(format!("Sync failed for: {}", failed.join(", ")).into());
            }
        }
        Some(name) => {
            let entity = orchestrator.sync_entity(name).await?;
            print_entity(name, &entity, output)?;
        }
    }

    Ok(())
}

/// One table row per entity kind.
#[derive(Debug, Clone, tabled::Tabled)]
pub(crate) struct SyncRow {
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Inserted")]
    pub inserted: usize,
    #[tabled(rename = "Updated")]
    pub updated: usize,
    #[tabled(rename = "Deleted")]
    pub deleted: usize,
    #[tabled(rename = "Errors")]
    pub errors: usize,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl SyncRow {
    pub(crate) fn from_outcome(outcome: &EntityOutcome) -> Self {
        let status = match (&outcome.failure, outcome.result.errors) {
            (Some(message), _) => format!("failed: {message}"),
            (None, 0) => "ok".to_string(),
            (None, n) => format!("{n} item errors"),
        };
        Self {
            entity: outcome.name.clone(),
            inserted: outcome.result.inserted,
            updated: outcome.result.updated,
            deleted: outcome.result.deleted,
            errors: outcome.result.errors,
            duration: format_duration(outcome.duration),
            status,
        }
    }

    fn from_entity(name: &str, entity: &EntitySyncResult) -> Self {
        Self::from_outcome(&EntityOutcome {
            name: name.to_string(),
            result: entity.result.clone(),
            duration: entity.duration,
            failure: None,
        })
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

fn print_rows(rows: Vec<SyncRow>) {
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{}", table);
}

fn print_error_details<'a>(details: impl Iterator<Item = &'a String>) {
    for detail in details {
        eprintln!("  {detail}");
    }
}

fn print_full(
    full: &FullSyncResult,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Table => {
            print_rows(full.entities.iter().map(SyncRow::from_outcome).collect());
            println!(
                "{} inserted, {} updated, {} deleted, {} errors in {}",
                full.total_inserted(),
                full.total_updated(),
                full.total_deleted(),
                full.total_errors(),
                format_duration(full.total_duration)
            );
            print_error_details(full.entities.iter().flat_map(|e| &e.result.error_details));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(full)?),
    }
    Ok(())
}

fn print_entity(
    name: &str,
    entity: &EntitySyncResult,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Table => {
            print_rows(vec![SyncRow::from_entity(name, entity)]);
            print_error_details(entity.result.error_details.iter());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entity)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use odoo_mirror::sync::SyncResult;

    use super::*;

    fn outcome(errors: usize, failure: Option<&str>) -> EntityOutcome {
        let mut result = SyncResult {
            inserted: 3,
            updated: 2,
            deleted: 1,
            ..Default::default()
        };
        for i in 0..errors {
            result.add_error(format!("Error processing contact {i}: boom"));
        }
        EntityOutcome {
            name: CONTACTS.to_string(),
            result,
            duration: Duration::from_millis(1500),
            failure: failure.map(str::to_string),
        }
    }

    #[test]
    fn target_maps_to_registry_names() {
        assert_eq!(SyncTarget::All.entity(), None);
        assert_eq!(SyncTarget::Contacts.entity(), Some("contacts"));
        assert_eq!(SyncTarget::Invoices.entity(), Some("invoices"));
        assert_eq!(SyncTarget::default(), SyncTarget::All);
    }

    #[test]
    fn row_reports_clean_run() {
        let row = SyncRow::from_outcome(&outcome(0, None));
        assert_eq!(row.status, "ok");
        assert_eq!(row.duration, "1.50s");
        assert_eq!((row.inserted, row.updated, row.deleted), (3, 2, 1));
    }

    #[test]
    fn row_reports_item_errors_and_fatal_failures() {
        assert_eq!(SyncRow::from_outcome(&outcome(2, None)).status, "2 item errors");
        assert_eq!(
            SyncRow::from_outcome(&outcome(0, Some("network error"))).status,
            "failed: network error"
        );
    }

    #[test]
    fn printing_does_not_panic() {
        let full = FullSyncResult {
            entities: vec![outcome(1, None)],
            total_duration: Duration::from_secs(2),
            success_count: 0,
            error_count: 1,
        };
        print_full(&full, OutputFormat::Table).unwrap();
        print_full(&full, OutputFormat::Json).unwrap();
    }
}
