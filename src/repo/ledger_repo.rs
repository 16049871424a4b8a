use std::{collections::HashSet, path::PathBuf, sync::Arc};

use tracing::debug;

use crate::{
    errors::{DatabaseError, MigrationSourceError},
    postgres::{PgClient, quote_identifier},
};

/// Where the names of already-run migrations come from.
pub trait AppliedMigrations: Send + Sync {
    fn applied_migrations(&self) -> Result<HashSet<String>, MigrationSourceError>;
}

/// Plain-text ledger, one migration per line. Blank lines and `#` comments are skipped.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AppliedMigrations for FileLedger {
    fn applied_migrations(&self) -> Result<HashSet<String>, MigrationSourceError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Migration ledger not found");
            return Ok(HashSet::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| MigrationSourceError::Ledger {
                path: self.path.clone(),
                source,
            })?;

        Ok(parse_ledger(&content))
    }
}

fn parse_ledger(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// The framework's migrations table, read through a PostgreSQL connection.
///
/// A missing table means no migration has run yet.
pub struct DatabaseLedger {
    client: Arc<PgClient>,
    table: String,
}

impl DatabaseLedger {
    pub fn new(client: Arc<PgClient>, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn select_query(&self) -> Result<String, DatabaseError> {
        Ok(format!(
            "SELECT migration::text FROM {} ORDER BY batch, migration",
            quote_identifier(&self.table)?
        ))
    }

    async fn fetch(&self) -> Result<HashSet<String>, DatabaseError> {
        let query = self.select_query()?;
        let pool = self.client.pool();

        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(&self.table)
            .fetch_one(pool)
            .await?;
        if !exists {
            debug!(table = %self.table, "Migrations table not found");
            return Ok(HashSet::new());
        }

        let names: Vec<String> = sqlx::query_scalar(&query).fetch_all(pool).await?;
        debug!(table = %self.table, applied = names.len(), "Read migrations table");
        Ok(names.into_iter().collect())
    }
}

impl AppliedMigrations for DatabaseLedger {
    fn applied_migrations(&self) -> Result<HashSet<String>, MigrationSourceError> {
        self.client
            .block_on(self.fetch())
            .map_err(|source| MigrationSourceError::Database {
                table: self.table.clone(),
                source,
            })
    }
}
