//! Query, filter, and paginate the in-memory catalog.
//!
//! Pure functions over a snapshot: the HTTP layer hands in whatever is in
//! memory right now, filters compose as a logical AND, pagination applies
//! after all filters.

use serde::Deserialize;

use crate::models::ItemSet;

/// Request descriptor for a catalog query. Omitted or `"all"` filters are
/// no-ops.
#[derive(Debug, Clone, Deserialize)]
pub struct SetQuery {
    /// Case-insensitive substring match against the set name
    pub search: Option<String>,

    /// Class slug; sets whose classes contain "All" always match
    pub class: Option<String>,

    /// Exact expansion label
    pub expansion: Option<String>,

    /// Exact quality label
    pub quality: Option<String>,

    /// 0-based page index
    #[serde(default)]
    pub page: usize,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

// Manual impl so a programmatically built query gets the same page size as
// a deserialized one with the field omitted.
impl Default for SetQuery {
    fn default() -> Self {
        Self {
            search: None,
            class: None,
            expansion: None,
            quality: None,
            page: 0,
            limit: default_limit(),
        }
    }
}

/// One page of query results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPage {
    pub items: Vec<ItemSet>,
    pub current_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

fn filter_active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn matches(set: &ItemSet, query: &SetQuery) -> bool {
    if let Some(search) = filter_active(&query.search) {
        let needle = search.to_lowercase();
        if !set.name.to_lowercase().contains(&needle) {
            return false;
        }
    }

    if let Some(class) = filter_active(&query.class) {
        let wanted = class.to_lowercase();
        let matched = set.unrestricted()
            || set
                .classes
                .iter()
                .any(|c| c.to_lowercase().contains(&wanted));
        if !matched {
            return false;
        }
    }

    if let Some(expansion) = filter_active(&query.expansion)
        && set.expansion.label() != expansion
    {
        return false;
    }

    if let Some(quality) = filter_active(&query.quality)
        && set.quality.label() != quality
    {
        return false;
    }

    true
}

/// Apply all filters, then slice out the requested page.
pub fn run_query(sets: &[ItemSet], query: &SetQuery) -> SetPage {
    let filtered: Vec<&ItemSet> = sets.iter().filter(|s| matches(s, query)).collect();

    let limit = query.limit.max(1);
    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(limit);

    // Both params are caller-controlled; the offset must not overflow.
    let items = filtered
        .into_iter()
        .skip(query.page.saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();

    SetPage {
        items,
        current_page: query.page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expansion, ItemSet, Quality};
    use std::collections::HashSet;

    fn set(id: u32, name: &str, classes: &[&str], expansion: Expansion, quality: Quality) -> ItemSet {
        ItemSet {
            id,
            name: name.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            expansion,
            quality,
            items: Vec::new(),
        }
    }

    fn catalog() -> Vec<ItemSet> {
        vec![
            set(
                1,
                "Dreadnaught's Battlegear",
                &["warrior"],
                Expansion::Classic,
                Quality::Epic,
            ),
            set(
                2,
                "Lawbringer Armor",
                &["paladin"],
                Expansion::Classic,
                Quality::Epic,
            ),
            set(
                3,
                "Netherwind Regalia",
                &["mage"],
                Expansion::Classic,
                Quality::Epic,
            ),
            set(
                4,
                "Crystalforge Armor",
                &["paladin"],
                Expansion::BurningCrusade,
                Quality::Epic,
            ),
            set(
                5,
                "Ambiguous Regalia",
                &["All"],
                Expansion::Unknown,
                Quality::Unknown,
            ),
        ]
    }

    #[test]
    fn no_filters_returns_everything() {
        let page = run_query(&catalog(), &SetQuery::default());
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let query = SetQuery {
            search: Some("dread".to_string()),
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "Dreadnaught's Battlegear");
    }

    #[test]
    fn class_filter_always_includes_all_sets() {
        for class in ["warrior", "mage", "evoker"] {
            let query = SetQuery {
                class: Some(class.to_string()),
                ..SetQuery::default()
            };
            let page = run_query(&catalog(), &query);
            assert!(
                page.items.iter().any(|s| s.id == 5),
                "unrestricted set missing for class={}",
                class
            );
        }
    }

    #[test]
    fn class_filter_matches_slug_substring() {
        let query = SetQuery {
            class: Some("Paladin".to_string()),
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        let ids: HashSet<u32> = page.items.iter().map(|s| s.id).collect();
        assert_eq!(ids, HashSet::from([2, 4, 5]));
    }

    #[test]
    fn expansion_and_quality_are_exact() {
        let query = SetQuery {
            expansion: Some("Classic".to_string()),
            quality: Some("Epic".to_string()),
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn all_sentinel_filter_is_noop() {
        let query = SetQuery {
            class: Some("all".to_string()),
            expansion: Some("All".to_string()),
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        assert_eq!(page.total_items, 5);
    }

    #[test]
    fn filters_compose_with_and() {
        let query = SetQuery {
            class: Some("paladin".to_string()),
            expansion: Some("The Burning Crusade".to_string()),
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        let ids: HashSet<u32> = page.items.iter().map(|s| s.id).collect();
        // Set 5 is unrestricted but its expansion is Unknown, so it fails
        // the AND with the expansion filter.
        assert_eq!(ids, HashSet::from([4]));
    }

    #[test]
    fn pages_partition_the_filtered_set() {
        let sets = catalog();
        for limit in [1, 2, 3, 5, 10] {
            let mut seen: Vec<u32> = Vec::new();
            let mut page_no = 0;
            loop {
                let query = SetQuery {
                    page: page_no,
                    limit,
                    ..SetQuery::default()
                };
                let page = run_query(&sets, &query);
                assert_eq!(page.total_items, sets.len());
                assert_eq!(page.total_pages, sets.len().div_ceil(limit));
                if page.items.is_empty() {
                    break;
                }
                seen.extend(page.items.iter().map(|s| s.id));
                page_no += 1;
            }

            let unique: HashSet<u32> = seen.iter().copied().collect();
            assert_eq!(unique.len(), seen.len(), "duplicates at limit={}", limit);
            assert_eq!(seen.len(), sets.len(), "omissions at limit={}", limit);
        }
    }

    #[test]
    fn default_matches_deserialized_defaults() {
        let from_empty: SetQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(SetQuery::default().limit, from_empty.limit);
        assert_eq!(SetQuery::default().page, from_empty.page);
        assert_eq!(SetQuery::default().limit, 20);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let query = SetQuery {
            page: usize::MAX / 2,
            limit: 20,
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 5);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let query = SetQuery {
            page: 7,
            limit: 10,
            ..SetQuery::default()
        };
        let page = run_query(&catalog(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 7);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn empty_catalog_shape() {
        let page = run_query(&[], &SetQuery::default());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 0);
        assert!(page.items.is_empty());
    }
}
