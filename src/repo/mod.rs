pub mod ledger_repo;
pub mod migration_repo;
pub mod snapshot_repo;

pub use ledger_repo::{AppliedMigrations, DatabaseLedger, FileLedger};
pub use migration_repo::MigrationRepository;
pub use snapshot_repo::FileSnapshotStore;

use crate::{entities::SchemaSnapshot, errors::SnapshotError};

/// A persisted snapshot and the identifier it is stored under.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredSnapshot {
    pub id: String,
    pub snapshot: SchemaSnapshot,
}

/// Persistence for baseline schema snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot and return its identifier.
    fn save_snapshot(&self, snapshot: &SchemaSnapshot) -> Result<String, SnapshotError>;

    fn latest_snapshot(&self) -> Result<Option<SchemaSnapshot>, SnapshotError> {
        Ok(self
            .all_snapshots()?
            .into_iter()
            .next()
            .map(|stored| stored.snapshot))
    }

    /// Every stored snapshot, newest first.
    fn all_snapshots(&self) -> Result<Vec<StoredSnapshot>, SnapshotError>;

    fn snapshot(&self, id: &str) -> Result<Option<SchemaSnapshot>, SnapshotError>;

    /// Delete all but the `keep` newest snapshots, returning how many were removed.
    fn prune_snapshots(&self, keep: usize) -> Result<usize, SnapshotError>;
}
