use odoo_mirror::db;
use odoo_mirror::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            if pending == 0 {
                println!("Mirror schema is up to date.");
                return Ok(());
            }
            tracing::info!(pending, "Applying mirror schema migrations");
            Migrator::up(&db, None).await?;
            println!("Applied {pending} migration(s).");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back the most recent migration");
            Migrator::down(&db, Some(1)).await?;
            println!("Rolled back one migration.");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(&db).await?.len();
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            println!("{applied} applied, {pending} pending:");
            Migrator::status(&db).await?;
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping contacts and invoices; the next sync repopulates them");
            Migrator::fresh(&db).await?;
            println!("Recreated the mirror schema.");
        }
    }

    Ok(())
}
