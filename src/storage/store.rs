//! Disk-backed set store.
//!
//! The whole catalog lives in one JSON array: loaded into memory at process
//! start, mutated by the hydration pipeline, persisted back with an atomic
//! temp-file-then-rename overwrite. Single writer (hydration), many readers
//! (HTTP handlers working on snapshots).

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::ItemSet;

/// In-memory catalog mirrored to a JSON file.
pub struct SetStore {
    path: PathBuf,
    sets: RwLock<Vec<ItemSet>>,
}

impl SetStore {
    /// Load the store from disk. A missing or corrupt file is a cold start
    /// with an empty catalog, never a process failure.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sets = match Self::read_file(&path).await {
            Ok(Some(sets)) => {
                log::info!("Loaded {} sets from {:?}", sets.len(), path);
                sets
            }
            Ok(None) => {
                log::info!("No cache file at {:?}, starting empty", path);
                Vec::new()
            }
            Err(e) => {
                log::warn!("Cache file {:?} unreadable ({}), starting empty", path, e);
                Vec::new()
            }
        };

        Self {
            path,
            sets: RwLock::new(sets),
        }
    }

    async fn read_file(path: &PathBuf) -> Result<Option<Vec<ItemSet>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Persist the full catalog, pretty-printed, via temp file and rename.
    pub async fn save(&self) -> Result<()> {
        let bytes = {
            let sets = self.sets.read().await;
            serde_json::to_vec_pretty(&*sets)?
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Cloned snapshot of the catalog for query evaluation.
    pub async fn snapshot(&self) -> Vec<ItemSet> {
        self.sets.read().await.clone()
    }

    /// Look up one set by id.
    pub async fn get(&self, id: u32) -> Option<ItemSet> {
        self.sets.read().await.iter().find(|s| s.id == id).cloned()
    }

    /// Look up several sets, preserving the requested id order.
    pub async fn get_many(&self, ids: &[u32]) -> Vec<ItemSet> {
        let sets = self.sets.read().await;
        ids.iter()
            .filter_map(|id| sets.iter().find(|s| s.id == *id).cloned())
            .collect()
    }

    /// Replace the entry with the same id, or append a new one.
    pub async fn upsert(&self, set: ItemSet) {
        let mut sets = self.sets.write().await;
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set,
            None => sets.push(set),
        }
    }

    /// Map of id to refresh-needed flag, for hydration work-set computation.
    pub async fn refresh_state(&self) -> HashMap<u32, bool> {
        self.sets
            .read()
            .await
            .iter()
            .map(|s| (s.id, s.needs_refresh()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sets.read().await.len()
    }
}
