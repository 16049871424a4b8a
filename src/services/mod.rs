pub mod analysis_service;
pub mod drift_service;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

pub use analysis_service::AnalysisService;
pub use drift_service::{DriftCheck, DriftService};

use crate::{
    config::Settings,
    inspector::{JsonSchemaInspector, PostgresInspector, SchemaInspector},
    postgres::PgClient,
    repo::{DatabaseLedger, FileSnapshotStore, MigrationRepository},
};

pub struct AppServices {
    pub analysis_service: AnalysisService,
    pub drift_service: DriftService,
}

impl AppServices {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut migration_repo = MigrationRepository::from_config(&settings.migrations);

        let inspector: Arc<dyn SchemaInspector> = match &settings.database.url {
            Some(url) => {
                let client = Arc::new(
                    PgClient::connect_lazy(url).context("Failed to configure database connection")?,
                );
                info!(url = ?settings.database.redacted_url(), "Inspecting live PostgreSQL schema");

                if settings.migrations.ledger.is_none() {
                    migration_repo = migration_repo.with_applied_source(DatabaseLedger::new(
                        client.clone(),
                        settings.migrations.table.clone(),
                    ));
                }
                Arc::new(PostgresInspector::new(client))
            }
            None => Arc::new(JsonSchemaInspector::new(&settings.database.schema_file)),
        };
        let migration_repo = Arc::new(migration_repo);
        let store = Arc::new(FileSnapshotStore::new(&settings.drift.snapshot_path));

        Ok(Self {
            analysis_service: AnalysisService::new(migration_repo),
            drift_service: DriftService::new(
                inspector,
                store,
                settings.database.connection.clone(),
                settings.database.schema.clone(),
                settings.drift.clone(),
            ),
        })
    }
}
