use std::path::Path;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::error::AppResult;

const PRAGMAS: &[&str] =
    &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA cache_size=-64000"];

/// Opens the store with a single pooled connection; the run owns it until `close`.
pub async fn connect(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;

    for pragma in PRAGMAS {
        execute_raw(&db, pragma).await?;
    }

    Ok(db)
}

/// Drops whatever the store holds and recreates the four pipeline tables.
///
/// A DDL script at `schema_file` takes precedence over the built-in migration
/// when the file exists.
pub async fn reset_schema(db: &DatabaseConnection, schema_file: Option<&Path>) -> AppResult<()> {
    match schema_file.filter(|path| path.is_file()) {
        Some(path) => {
            info!(path = %path.display(), "applying schema script");
            let sql = std::fs::read_to_string(path)
                .with_context(|| format!("reading schema script {}", path.display()))?;
            run_sql(db, &sql).await?;
        },
        None => {
            info!("recreating schema from migrations");
            Migrator::fresh(db).await?;
        },
    }
    info!("database schema created");
    Ok(())
}

/// Runs a DDL script statement by statement; blank fragments between `;` are skipped.
async fn run_sql(db: &DatabaseConnection, sql: &str) -> AppResult<()> {
    for stmt in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        execute_raw(db, stmt).await?;
    }
    Ok(())
}

async fn execute_raw(db: &DatabaseConnection, sql: &str) -> AppResult<()> {
    db.execute(Statement::from_string(db.get_database_backend(), sql)).await?;
    Ok(())
}
