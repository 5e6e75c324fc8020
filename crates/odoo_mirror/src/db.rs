//! Database connection utilities.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Pragmas applied to file-backed SQLite databases.
const SQLITE_PRAGMAS: [&str; 3] = [
    "PRAGMA journal_mode=WAL",
    "PRAGMA busy_timeout=5000",
    "PRAGMA synchronous=NORMAL",
];

fn is_file_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite://") && !database_url.contains(":memory:")
}

async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    for pragma in SQLITE_PRAGMAS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            pragma.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Establish a connection to the mirror database.
///
/// File-backed SQLite databases get WAL journaling, a 5 second busy timeout
/// and `synchronous=NORMAL`.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if is_file_sqlite(database_url) {
        configure_sqlite(&db).await?;
    }

    Ok(db)
}

/// Establish a connection and bring the schema up to date.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or a migration fails.
///
/// # Example
/// ```ignore
/// let db = odoo_mirror::connect_and_migrate("sqlite://mirror.db?mode=rwc").await?;
/// ```
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}
