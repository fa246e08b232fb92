//! Per-process icon cache.
//!
//! Icons are never persisted with the catalog; they are resolved on read
//! through the media endpoint and memoized here until an explicit clear.
//! Lookup failures degrade to `None` and are not memoized, so a transient
//! upstream problem heals on the next request.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::services::BlizzardClient;

/// Memoized item-id to icon-URL mapping.
#[derive(Default)]
pub struct IconCache {
    entries: RwLock<HashMap<u32, Option<String>>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an item's icon URL, hitting upstream only on a cache miss.
    pub async fn resolve(&self, client: &BlizzardClient, item_id: u32) -> Option<String> {
        if let Some(hit) = self.entries.read().await.get(&item_id) {
            return hit.clone();
        }

        match client.get_item_media(item_id).await {
            Ok(icon) => {
                self.entries
                    .write()
                    .await
                    .insert(item_id, icon.clone());
                icon
            }
            Err(e) => {
                log::debug!("Icon lookup failed for item {}: {}", item_id, e);
                None
            }
        }
    }

    /// Drop all memoized entries, returning how many were held.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }
}
