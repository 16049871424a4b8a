pub mod column;
pub mod foreign_key;
pub mod index;
pub mod migration_operation;
pub mod snapshot;
pub mod table;

use serde::Serialize;
use sha2::{Digest, Sha256};

pub use column::ColumnDefinition;
pub use foreign_key::ForeignKeyDefinition;
pub use index::IndexDefinition;
pub use migration_operation::{MigrationOperation, OperationDetail};
pub use snapshot::SchemaSnapshot;
pub use table::TableDefinition;

/// SHA-256 hex digest of the canonical JSON form of a value.
///
/// Fields serialize in declaration order, so two structurally equal definitions
/// always produce the same digest.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> String {
    let canonical = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    format!("{:x}", hasher.finalize())
}
