use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("could not write checkpoint {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },
    #[error("could not encode checkpoint {name}: {source}")]
    Encode {
        name: String,
        source: serde_json::Error,
    },
}

/// Persists pipeline snapshots as pretty-printed JSON arrays so a later run
/// can reuse them instead of re-fetching. Snapshots are whole-file writes;
/// a rerun overwrites, never merges.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn save<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), CheckpointError> {
        let payload =
            serde_json::to_string_pretty(items).map_err(|source| CheckpointError::Encode {
                name: name.to_string(),
                source,
            })?;
        fs::create_dir_all(&self.dir).map_err(|source| write_error(name, source))?;
        fs::write(self.path(name), payload).map_err(|source| write_error(name, source))
    }

    /// Loads a snapshot, treating a missing or corrupt file as empty. Both
    /// cases are logged and the pipeline carries on; an unexpectedly empty
    /// run is for the operator to notice.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "checkpoint not readable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(path = %path.display(), %err, "checkpoint is not valid JSON, starting empty");
                Vec::new()
            }
        }
    }
}

fn write_error(name: &str, source: std::io::Error) -> CheckpointError {
    CheckpointError::Write {
        name: name.to_string(),
        source,
    }
}
