use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Invalid database url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("A database connection needs a multi-threaded tokio runtime")]
    NoRuntime,

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Failed to read schema dump {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed schema dump {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema '{requested}' not found, the dump describes '{available}'")]
    UnknownSchema {
        requested: String,
        available: String,
    },

    #[error("Failed to inspect database schema: {0}")]
    Database(#[from] DatabaseError),
}

#[derive(Error, Debug)]
pub enum DriftError {
    #[error(transparent)]
    Inspector(#[from] InspectorError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Error, Debug)]
pub enum MigrationSourceError {
    #[error("Failed to read migrations directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read migration ledger {path}: {source}")]
    Ledger {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read migrations table '{table}': {source}")]
    Database {
        table: String,
        #[source]
        source: DatabaseError,
    },
}
