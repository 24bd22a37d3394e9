use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use super::SnapshotStore;
use crate::domains::auth::PersistedSnapshot;

/// Version tag written alongside the snapshot.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// On-disk shape: `{"state": {...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    state: PersistedSnapshot,
    #[serde(default)]
    version: u32,
}

fn encode(snapshot: &PersistedSnapshot) -> Result<String, StoreError> {
    let stored = StoredState {
        state: snapshot.clone(),
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string(&stored)?)
}

fn decode(raw: &str) -> Result<PersistedSnapshot, StoreError> {
    let stored: StoredState = serde_json::from_str(raw)?;
    Ok(stored.state)
}

// =============================================================================
// File store
// =============================================================================

/// One JSON file per key under a state directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<PersistedSnapshot>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves half a snapshot behind.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, encode(snapshot)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), authenticated = snapshot.is_authenticated, "snapshot saved");
        Ok(())
    }
}

// =============================================================================
// Memory store
// =============================================================================

/// Keeps the serialized snapshot in memory.
///
/// Stores the encoded JSON rather than the struct so restores go through the
/// same decoding path as the file store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    raw: RwLock<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw JSON, as if written by an earlier run.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(raw.into())),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.raw.read().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<PersistedSnapshot>, StoreError> {
        match self.raw.read().await.as_deref() {
            Some(raw) => decode(raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), StoreError> {
        let encoded = encode(snapshot)?;
        *self.raw.write().await = Some(encoded);
        Ok(())
    }
}
