//! Item set data structures, the central cached entity.

use serde::{Deserialize, Serialize};

use crate::models::{ALL_CLASSES, Expansion, Quality};

/// One equippable piece belonging to a set.
///
/// The icon URL is deliberately not part of this struct: icons are resolved
/// per-request in the API layer so the cache never holds ephemeral CDN URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetItem {
    /// Item id in the upstream item catalog
    pub id: u32,

    /// Item display name
    pub name: String,
}

/// A named collection of armor pieces sharing a visual theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSet {
    /// Stable identifier from the upstream catalog
    pub id: u32,

    /// Human-readable display name
    pub name: String,

    /// Class slugs that can wear the set, or `["All"]` when unrestricted
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,

    /// Chronological expansion label
    #[serde(default)]
    pub expansion: Expansion,

    /// Rarity label
    #[serde(default)]
    pub quality: Quality,

    /// Member items in upstream order; may be empty pending enrichment
    #[serde(default)]
    pub items: Vec<SetItem>,
}

fn default_classes() -> Vec<String> {
    vec![ALL_CLASSES.to_string()]
}

impl ItemSet {
    /// Create a bare entry from an index listing, pending enrichment.
    pub fn bare(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            classes: default_classes(),
            expansion: Expansion::Unknown,
            quality: Quality::Unknown,
            items: Vec::new(),
        }
    }

    /// Whether a later hydration pass should re-fetch this set.
    ///
    /// Re-fetch-to-improve policy: entries that are still unclassified keep
    /// being retried on every full run.
    pub fn needs_refresh(&self) -> bool {
        self.expansion == Expansion::Unknown || self.classes == [ALL_CLASSES]
    }

    /// True when the set is wearable by any class.
    pub fn unrestricted(&self) -> bool {
        self.classes.iter().any(|c| c == ALL_CLASSES)
    }

    /// Wowhead page for this set.
    pub fn wowhead_link(&self) -> String {
        format!("https://www.wowhead.com/item-set={}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_set_needs_refresh() {
        let set = ItemSet::bare(1060, "Lawbringer Armor");
        assert!(set.needs_refresh());
        assert!(set.unrestricted());
        assert!(set.items.is_empty());
    }

    #[test]
    fn classified_set_does_not_need_refresh() {
        let mut set = ItemSet::bare(1060, "Lawbringer Armor");
        set.classes = vec!["paladin".to_string()];
        set.expansion = Expansion::Classic;
        assert!(!set.needs_refresh());
        assert!(!set.unrestricted());
    }

    #[test]
    fn partial_classification_still_refreshes() {
        // Classes resolved but expansion unknown: keep improving.
        let mut set = ItemSet::bare(1, "Test");
        set.classes = vec!["mage".to_string()];
        assert!(set.needs_refresh());
    }

    #[test]
    fn serializes_camel_case_with_defaults() {
        let set = ItemSet::bare(5, "Test Set");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["classes"][0], "All");
        assert_eq!(json["expansion"], "Unknown");

        // Sparse JSON from an older cache file still deserializes.
        let sparse: ItemSet = serde_json::from_str(r#"{"id":7,"name":"Old"}"#).unwrap();
        assert_eq!(sparse.classes, vec!["All"]);
        assert_eq!(sparse.expansion, Expansion::Unknown);
    }

    #[test]
    fn wowhead_link_uses_set_id() {
        let set = ItemSet::bare(1060, "Lawbringer Armor");
        assert_eq!(set.wowhead_link(), "https://www.wowhead.com/item-set=1060");
    }
}
