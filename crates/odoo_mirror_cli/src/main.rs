//! odoo-mirror CLI - keeps a local database in step with an Odoo instance.

mod commands;
mod config;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::sync::{OutputFormat, SyncTarget};

#[derive(Parser)]
#[command(name = "odoo-mirror")]
#[command(version)]
#[command(about = "Mirror Odoo contacts and invoices into a local database")]
#[command(
    long_about = "odoo-mirror reconciles a local SQLite or PostgreSQL database with an Odoo \
instance. Every sync fetches the complete set of partners and customer invoices, upserts \
them locally, and soft-deletes rows that no longer exist in Odoo."
)]
#[command(after_long_help = r#"EXAMPLES
    Create the schema:
        $ odoo-mirror migrate up

    Sync everything once and print a summary:
        $ odoo-mirror sync

    Sync only invoices as JSON:
        $ odoo-mirror sync invoices --output json

    Run every 30 minutes until Ctrl+C:
        $ odoo-mirror daemon --interval-minutes 30

CONFIGURATION
    odoo-mirror reads configuration from:
      1. ~/.config/odoo-mirror/config.toml (or $XDG_CONFIG_HOME/odoo-mirror/config.toml)
      2. ./odoo-mirror.toml
      3. Environment variables (ODOO_MIRROR_<SECTION>__<KEY>)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    ODOO_MIRROR_DATABASE__URL          Database connection string
    ODOO_MIRROR_ODOO__URL              Odoo base URL
    ODOO_MIRROR_ODOO__DB               Odoo database name
    ODOO_MIRROR_ODOO__USERNAME         Odoo login
    ODOO_MIRROR_ODOO__PASSWORD         Odoo password or API key
    ODOO_MIRROR_SYNC__INTERVAL_MINUTES Daemon interval (default: 15)
    RUST_LOG                           Log filter (default: odoo_mirror=info,odoo_mirror_cli=info)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Run one sync and print a summary
    Sync {
        /// Entity kinds to sync
        #[arg(value_enum, default_value_t = SyncTarget::All)]
        target: SyncTarget,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Sync on a fixed interval until interrupted
    Daemon {
        /// Minutes between runs (default from config or 15)
        #[arg(short = 'i', long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_minutes: Option<u64>,

        /// Wait one interval before the first run
        #[arg(long)]
        no_initial_sync: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("odoo_mirror=info,odoo_mirror_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that need neither config nor database
    match &cli.command {
        Commands::Completions { shell } => return commands::meta::handle_completions(*shell),
        Commands::Man { output } => return commands::meta::handle_man(output.clone()),
        _ => {}
    }

    let config = config::Config::load();
    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set database.url")?;
    ensure_sqlite_dir(&database_url)?;

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Sync { target, output } => {
            commands::sync::handle_sync(target, output, &config, &database_url).await?;
        }
        Commands::Daemon {
            interval_minutes,
            no_initial_sync,
        } => {
            commands::daemon::handle_daemon(
                interval_minutes,
                no_initial_sync,
                &config,
                &database_url,
            )
            .await?;
        }
        Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}
