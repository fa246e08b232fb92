//! Classification heuristics.
//!
//! Pure functions mapping item metadata to a class list and an expansion
//! label. No I/O: the hydration pipeline feeds these with whatever the
//! upstream API returned and they degrade gracefully on missing data.

pub mod keywords;

use crate::models::{ALL_CLASSES, Expansion, class_slug};
use keywords::{ARMOR_TYPE_CLASSES, CLASS_KEYWORDS, EXPANSION_ID_BREAKPOINTS};

/// Map API class display names to canonical slugs, dropping unknown names.
pub fn classes_from_allowed_list<S: AsRef<str>>(api_names: &[S]) -> Vec<String> {
    let mut classes = Vec::new();
    for name in api_names {
        if let Some(slug) = class_slug(name.as_ref())
            && !classes.iter().any(|c| c == slug)
        {
            classes.push(slug.to_string());
        }
    }
    classes
}

/// Map an armor subclass name to its wearer classes; unknown subclass yields
/// an empty list.
pub fn classes_from_armor_type(armor_subclass: &str) -> Vec<String> {
    ARMOR_TYPE_CLASSES
        .iter()
        .find(|(subclass, _)| *subclass == armor_subclass)
        .map(|(_, classes)| classes.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

/// Infer classes from keywords in the set's display name.
///
/// Gladiator (PvP) sets get a disambiguation pass keyed on armor-type hints
/// in the name before the generic keyword scan; their names reuse words that
/// would otherwise match the wrong class tables.
pub fn classes_from_name(set_name: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    let name = set_name.to_lowercase();
    let mut classes: Vec<String> = Vec::new();

    if name.contains("gladiator") {
        let hinted: &[&str] = if name.contains("wildhide") || name.contains("hide") {
            &["druid"]
        } else if name.contains("raiment") || name.contains("vestments") {
            &["mage", "priest", "warlock"]
        } else if name.contains("battlegear") || name.contains("armor") {
            &["warrior", "paladin", "deathknight"]
        } else if name.contains("mail") {
            &["hunter", "shaman", "evoker"]
        } else if name.contains("leather") {
            &["rogue", "druid", "monk", "demonhunter"]
        } else {
            &[]
        };
        classes.extend(hinted.iter().map(|c| c.to_string()));
    }

    for (slug, keywords) in table {
        if keywords.iter().any(|kw| name.contains(kw))
            && !classes.iter().any(|c| c == slug)
        {
            classes.push(slug.to_string());
        }
    }

    classes
}

/// Same as [`classes_from_name`] with the built-in keyword table.
pub fn classes_from_name_default(set_name: &str) -> Vec<String> {
    classes_from_name(set_name, &CLASS_KEYWORDS)
}

/// Classify an item id into an expansion by its position in the monotonic
/// breakpoint table.
pub fn expansion_from_item_id(item_id: u32) -> Expansion {
    for (limit, expansion) in EXPANSION_ID_BREAKPOINTS {
        if item_id < limit {
            return expansion;
        }
    }
    Expansion::TheWarWithin
}

/// Resolve a set's class list from the available signals.
///
/// Resolution order: explicit allowed-class list, then armor-type inference
/// (`armor_subclass` should only be passed for items whose item class is
/// Armor), then name keywords. First non-empty result wins; `["All"]` when
/// every signal comes up empty.
pub fn resolve_classes<S: AsRef<str>>(
    allowed_names: &[S],
    armor_subclass: Option<&str>,
    set_name: &str,
) -> Vec<String> {
    let classes = classes_from_allowed_list(allowed_names);
    if !classes.is_empty() {
        return classes;
    }

    if let Some(subclass) = armor_subclass {
        let classes = classes_from_armor_type(subclass);
        if !classes.is_empty() {
            return classes;
        }
    }

    let classes = classes_from_name_default(set_name);
    if !classes.is_empty() {
        return classes;
    }

    vec![ALL_CLASSES.to_string()]
}
