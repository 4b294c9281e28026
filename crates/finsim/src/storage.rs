//! Snapshot storage in the data directory
//!
//! Directory structure:
//! ~/.finsim/
//!   finsim.log
//!   snapshots/
//!     baseline.json
//!     after-raise.json

use std::fs;
use std::path::{Path, PathBuf};

use finsim_core::{SimError, SimulationHelper};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no snapshot named '{0}'")]
    NotFound(String),
    #[error("snapshot '{name}' is unreadable: {source}")]
    Snapshot { name: String, source: SimError },
}

/// Manages the data directory holding saved simulations
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Default data directory path (~/.finsim/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".finsim")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir()
            .join(format!("{}.json", sanitize_filename(name)))
    }

    pub fn exists(&self) -> bool {
        self.snapshots_dir().exists()
    }

    pub fn init(&self) -> Result<(), StorageError> {
        let dir = self.snapshots_dir();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io { path: dir, source })
    }

    pub fn has_snapshot(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }

    /// Write `sim` under `name`, replacing any previous snapshot of that name.
    pub fn save_snapshot(
        &self,
        name: &str,
        sim: &SimulationHelper,
    ) -> Result<PathBuf, StorageError> {
        if !self.exists() {
            self.init()?;
        }
        let json = sim.to_portable().map_err(|source| StorageError::Snapshot {
            name: name.to_string(),
            source,
        })?;

        let path = self.snapshot_path(name);
        fs::write(&path, json).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(name, path = %path.display(), tick = sim.tick_count(), "saved snapshot");
        Ok(path)
    }

    pub fn load_snapshot(&self, name: &str) -> Result<SimulationHelper, StorageError> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        let sim = SimulationHelper::from_portable(&json).map_err(|source| {
            StorageError::Snapshot {
                name: name.to_string(),
                source,
            }
        })?;
        tracing::info!(
            name,
            tick = sim.tick_count(),
            date = %sim.current_date(),
            "loaded snapshot"
        );
        Ok(sim)
    }

    /// Names of all saved snapshots, sorted
    pub fn list_snapshots(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.snapshots_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Sanitize a snapshot name for use as a filename
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
