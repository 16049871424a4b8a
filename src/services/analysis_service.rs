use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::{
    analyzer,
    entities::MigrationOperation,
    repo::MigrationRepository,
    types::DangerLevel,
    utils::ProgressReporter,
};

/// Service layer for migration risk analysis
pub struct AnalysisService {
    repo: Arc<MigrationRepository>,
}

impl AnalysisService {
    pub fn new(repo: Arc<MigrationRepository>) -> Self {
        Self { repo }
    }

    pub fn get_repo(&self) -> Arc<MigrationRepository> {
        self.repo.clone()
    }

    /// Operations found in a migration file, empty when the file cannot be read.
    pub fn analyze(&self, path: &Path) -> Vec<MigrationOperation> {
        analyzer::analyze_file(path)
    }

    pub fn has_dangerous_operations(&self, path: &Path) -> bool {
        analyzer::has_dangerous_operations(&self.analyze(path))
    }

    pub fn danger_level(&self, path: &Path) -> DangerLevel {
        analyzer::danger_level(&self.analyze(path))
    }

    pub fn pending_migrations(&self) -> Result<Vec<PathBuf>> {
        self.repo
            .pending_migrations()
            .context("Failed to list pending migrations")
    }

    /// Resolve a migration given either a file path or part of its name.
    pub fn resolve_migration(&self, migration: &str) -> Result<Option<PathBuf>> {
        let path = PathBuf::from(migration);
        if path.is_file() {
            return Ok(Some(path));
        }

        self.repo
            .migration_path(migration)
            .with_context(|| format!("Failed to look up migration '{}'", migration))
    }

    /// Analyze every pending migration, keeping only those with operations.
    ///
    /// Files are scanned on blocking workers; results are keyed by path.
    pub async fn analyze_pending_migrations(
        &self,
        progress: &ProgressReporter,
    ) -> Result<BTreeMap<PathBuf, Vec<MigrationOperation>>> {
        let pending = self.pending_migrations()?;
        info!(count = pending.len(), "Analyzing pending migrations");

        let mut tasks = JoinSet::new();
        for path in pending {
            tasks.spawn_blocking(move || {
                let operations = analyzer::analyze_file(&path);
                (path, operations)
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (path, operations) = joined.context("Migration analysis task failed")?;
            progress.report(format!(
                "Analyzed {}",
                MigrationRepository::migration_name(&path)
            ));

            if operations.is_empty() {
                debug!(path = %path.display(), "No operations found");
                continue;
            }
            results.insert(path, operations);
        }

        Ok(results)
    }
}
