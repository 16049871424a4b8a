use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    config::MigrationsConfig,
    errors::MigrationSourceError,
    repo::{AppliedMigrations, FileLedger},
};

/// Locates migration scripts on disk and tells applied ones from pending ones.
pub struct MigrationRepository {
    paths: Vec<PathBuf>,
    extension: String,
    applied: Option<Box<dyn AppliedMigrations>>,
}

impl MigrationRepository {
    /// Repository whose applied migrations come from the optional `ledger` file.
    pub fn new(paths: Vec<PathBuf>, extension: impl Into<String>, ledger: Option<PathBuf>) -> Self {
        Self {
            paths,
            extension: extension.into(),
            applied: ledger.map(|path| Box::new(FileLedger::new(path)) as Box<dyn AppliedMigrations>),
        }
    }

    /// Replace where applied migrations are read from.
    pub fn with_applied_source(mut self, source: impl AppliedMigrations + 'static) -> Self {
        self.applied = Some(Box::new(source));
        self
    }

    pub fn from_config(config: &MigrationsConfig) -> Self {
        Self::new(
            config
                .paths
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(PathBuf::from)
                .collect(),
            config.extension.clone(),
            config.ledger.as_ref().map(PathBuf::from),
        )
    }

    /// Identifier of a migration, its file name without extension.
    pub fn migration_name(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Every migration script in the configured directories, sorted by path.
    pub fn all_migrations(&self) -> Result<Vec<PathBuf>, MigrationSourceError> {
        let mut migrations = Vec::new();

        for dir in &self.paths {
            if !dir.is_dir() {
                debug!(path = %dir.display(), "Skipping missing migrations directory");
                continue;
            }

            let entries = std::fs::read_dir(dir).map_err(|source| MigrationSourceError::Directory {
                path: dir.clone(),
                source,
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|source| MigrationSourceError::Directory {
                        path: dir.clone(),
                        source,
                    })?
                    .path();

                if path.is_file() && path.extension().is_some_and(|ext| ext == self.extension.as_str()) {
                    migrations.push(path);
                }
            }
        }

        migrations.sort();
        Ok(migrations)
    }

    /// Names of migrations already run. Without a source nothing has been applied.
    pub fn applied_migrations(&self) -> Result<HashSet<String>, MigrationSourceError> {
        match &self.applied {
            Some(source) => source.applied_migrations(),
            None => Ok(HashSet::new()),
        }
    }

    pub fn pending_migrations(&self) -> Result<Vec<PathBuf>, MigrationSourceError> {
        let applied = self.applied_migrations()?;

        Ok(self
            .all_migrations()?
            .into_iter()
            .filter(|path| {
                let name = Self::migration_name(path);
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                !applied.contains(&name) && !applied.contains(&file_name)
            })
            .collect())
    }

    /// First migration whose path contains `name`.
    pub fn migration_path(&self, name: &str) -> Result<Option<PathBuf>, MigrationSourceError> {
        Ok(self
            .all_migrations()?
            .into_iter()
            .find(|path| path.to_string_lossy().contains(name)))
    }
}
