use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    entities::SchemaSnapshot,
    errors::SnapshotError,
    repo::{SnapshotStore, StoredSnapshot},
};

const FILE_PREFIX: &str = "schema_snapshot_";
const FILE_EXTENSION: &str = "json";

/// Snapshot store keeping one pretty-printed JSON file per snapshot.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(snapshot: &SchemaSnapshot) -> String {
        Self::numbered_file_name(snapshot, 1)
    }

    /// File name for the `attempt`-th snapshot saved within the same second.
    fn numbered_file_name(snapshot: &SchemaSnapshot, attempt: usize) -> String {
        let stamp = snapshot.created_at.format("%Y-%m-%d_%H%M%S");
        if attempt <= 1 {
            format!("{}{}_{}.{}", FILE_PREFIX, snapshot.connection, stamp, FILE_EXTENSION)
        } else {
            format!(
                "{}{}_{}_{}.{}",
                FILE_PREFIX, snapshot.connection, stamp, attempt, FILE_EXTENSION
            )
        }
    }

    fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
        move |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read(path: &Path) -> Result<SchemaSnapshot, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(Self::io_err(path))?;
        SchemaSnapshot::from_json(&content).map_err(|source| SnapshotError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(Self::io_err(&self.dir))? {
            let path = entry.map_err(Self::io_err(&self.dir))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save_snapshot(&self, snapshot: &SchemaSnapshot) -> Result<String, SnapshotError> {
        std::fs::create_dir_all(&self.dir).map_err(Self::io_err(&self.dir))?;

        let json = snapshot
            .to_json()
            .map_err(|source| SnapshotError::Malformed {
                path: self.dir.join(Self::file_name(snapshot)),
                source,
            })?;

        // Never overwrite: snapshots taken in the same second get a numeric suffix.
        let mut attempt = 1;
        let (file_name, path, mut file) = loop {
            let file_name = Self::numbered_file_name(snapshot, attempt);
            let path = self.dir.join(&file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (file_name, path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(Self::io_err(&path)(e)),
            }
        };

        file.write_all(json.as_bytes()).map_err(Self::io_err(&path))?;
        info!(path = %path.display(), tables = snapshot.tables.len(), "Saved schema snapshot");

        Ok(file_name)
    }

    fn all_snapshots(&self) -> Result<Vec<StoredSnapshot>, SnapshotError> {
        let mut snapshots = self
            .snapshot_files()?
            .into_iter()
            .map(|path| -> Result<StoredSnapshot, SnapshotError> {
                let snapshot = Self::read(&path)?;
                let id = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                Ok(StoredSnapshot { id, snapshot })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        snapshots.sort_by(|a, b| {
            b.snapshot
                .created_at
                .cmp(&a.snapshot.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        debug!(dir = %self.dir.display(), count = snapshots.len(), "Listed snapshots");
        Ok(snapshots)
    }

    fn snapshot(&self, id: &str) -> Result<Option<SchemaSnapshot>, SnapshotError> {
        // Identifiers are bare file names inside the snapshot directory.
        if Path::new(id).file_name().is_none_or(|name| name != id) {
            return Ok(None);
        }

        let path = self.dir.join(id);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn prune_snapshots(&self, keep: usize) -> Result<usize, SnapshotError> {
        let snapshots = self.all_snapshots()?;
        let mut deleted = 0;

        for stored in snapshots.iter().skip(keep) {
            let path = self.dir.join(&stored.id);
            std::fs::remove_file(&path).map_err(Self::io_err(&path))?;
            deleted += 1;
        }

        if deleted > 0 {
            info!(deleted, keep, "Pruned schema snapshots");
        }
        Ok(deleted)
    }
}
