//! Fixed label enumerations: expansions, item qualities, class slugs.

use serde::{Deserialize, Serialize};

/// Sentinel class value meaning "no class restriction".
pub const ALL_CLASSES: &str = "All";

/// Canonical class slugs, lowercase without spaces.
///
/// Order matters: it is the tie order for keyword-based classification.
pub const CLASS_SLUGS: [&str; 13] = [
    "warrior",
    "paladin",
    "hunter",
    "rogue",
    "priest",
    "deathknight",
    "shaman",
    "mage",
    "warlock",
    "monk",
    "druid",
    "demonhunter",
    "evoker",
];

/// Map an API class display name (e.g. "Death Knight") to its canonical slug.
///
/// Returns `None` for names outside the canonical enumeration.
pub fn class_slug(display_name: &str) -> Option<&'static str> {
    let normalized: String = display_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    CLASS_SLUGS.iter().find(|s| **s == normalized).copied()
}

/// Major game-content release, used as a chronological classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Expansion {
    Classic,
    #[serde(rename = "The Burning Crusade")]
    BurningCrusade,
    #[serde(rename = "Wrath of the Lich King")]
    WrathOfTheLichKing,
    Cataclysm,
    #[serde(rename = "Mists of Pandaria")]
    MistsOfPandaria,
    #[serde(rename = "Warlords of Draenor")]
    WarlordsOfDraenor,
    Legion,
    #[serde(rename = "Battle for Azeroth")]
    BattleForAzeroth,
    Shadowlands,
    Dragonflight,
    #[serde(rename = "The War Within")]
    TheWarWithin,
    #[default]
    Unknown,
}

impl Expansion {
    /// All expansions in release order, `Unknown` last.
    pub const ALL: [Expansion; 12] = [
        Expansion::Classic,
        Expansion::BurningCrusade,
        Expansion::WrathOfTheLichKing,
        Expansion::Cataclysm,
        Expansion::MistsOfPandaria,
        Expansion::WarlordsOfDraenor,
        Expansion::Legion,
        Expansion::BattleForAzeroth,
        Expansion::Shadowlands,
        Expansion::Dragonflight,
        Expansion::TheWarWithin,
        Expansion::Unknown,
    ];

    /// Display label, identical to the persisted JSON value.
    pub fn label(&self) -> &'static str {
        match self {
            Expansion::Classic => "Classic",
            Expansion::BurningCrusade => "The Burning Crusade",
            Expansion::WrathOfTheLichKing => "Wrath of the Lich King",
            Expansion::Cataclysm => "Cataclysm",
            Expansion::MistsOfPandaria => "Mists of Pandaria",
            Expansion::WarlordsOfDraenor => "Warlords of Draenor",
            Expansion::Legion => "Legion",
            Expansion::BattleForAzeroth => "Battle for Azeroth",
            Expansion::Shadowlands => "Shadowlands",
            Expansion::Dragonflight => "Dragonflight",
            Expansion::TheWarWithin => "The War Within",
            Expansion::Unknown => "Unknown",
        }
    }

    /// Position in release order; `Unknown` sorts after everything real.
    pub fn chronology(&self) -> usize {
        Self::ALL.iter().position(|e| e == self).unwrap_or(usize::MAX)
    }

    /// Parse a display label back into an expansion.
    pub fn from_label(label: &str) -> Option<Expansion> {
        Self::ALL.iter().find(|e| e.label() == label).copied()
    }
}

/// Item rarity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Quality {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Artifact,
    #[default]
    Unknown,
}

impl Quality {
    /// All qualities in ascending rarity, `Unknown` last.
    pub const ALL: [Quality; 8] = [
        Quality::Poor,
        Quality::Common,
        Quality::Uncommon,
        Quality::Rare,
        Quality::Epic,
        Quality::Legendary,
        Quality::Artifact,
        Quality::Unknown,
    ];

    /// Display label, identical to the persisted JSON value.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Poor => "Poor",
            Quality::Common => "Common",
            Quality::Uncommon => "Uncommon",
            Quality::Rare => "Rare",
            Quality::Epic => "Epic",
            Quality::Legendary => "Legendary",
            Quality::Artifact => "Artifact",
            Quality::Unknown => "Unknown",
        }
    }

    /// Position in rarity order.
    pub fn rank(&self) -> usize {
        Self::ALL.iter().position(|q| q == self).unwrap_or(usize::MAX)
    }

    /// Parse an upstream quality name ("EPIC", "Epic") into a label.
    pub fn from_name(name: &str) -> Quality {
        match name.to_lowercase().as_str() {
            "poor" => Quality::Poor,
            "common" => Quality::Common,
            "uncommon" => Quality::Uncommon,
            "rare" => Quality::Rare,
            "epic" => Quality::Epic,
            "legendary" => Quality::Legendary,
            "artifact" => Quality::Artifact,
            _ => Quality::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_slug_maps_display_names() {
        assert_eq!(class_slug("Warrior"), Some("warrior"));
        assert_eq!(class_slug("Death Knight"), Some("deathknight"));
        assert_eq!(class_slug("Demon Hunter"), Some("demonhunter"));
        assert_eq!(class_slug("Necromancer"), None);
    }

    #[test]
    fn expansion_chronology_is_release_order() {
        assert!(Expansion::Classic.chronology() < Expansion::BurningCrusade.chronology());
        assert!(Expansion::Dragonflight.chronology() < Expansion::TheWarWithin.chronology());
        assert!(Expansion::TheWarWithin.chronology() < Expansion::Unknown.chronology());
    }

    #[test]
    fn expansion_label_round_trip() {
        for exp in Expansion::ALL {
            assert_eq!(Expansion::from_label(exp.label()), Some(exp));
        }
    }

    #[test]
    fn expansion_serializes_as_label() {
        let json = serde_json::to_string(&Expansion::BurningCrusade).unwrap();
        assert_eq!(json, "\"The Burning Crusade\"");
        let back: Expansion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Expansion::BurningCrusade);
    }

    #[test]
    fn quality_from_name_is_case_insensitive() {
        assert_eq!(Quality::from_name("EPIC"), Quality::Epic);
        assert_eq!(Quality::from_name("Rare"), Quality::Rare);
        assert_eq!(Quality::from_name("mythic"), Quality::Unknown);
    }
}
