//! Static classification tables.
//!
//! Keyword lists are ordered: the table order decides tie order when a name
//! matches several classes.

/// Per-class keyword table for name-based classification. Keywords are tier
/// set name fragments known to belong to exactly one class.
pub const CLASS_KEYWORDS: [(&str, &[&str]); 13] = [
    (
        "warrior",
        &[
            "battlegear of might",
            "wrath",
            "dreadnaught",
            "onslaught",
            "destroyer",
            "warbringer",
            "conqueror",
            "ymirjar lord",
            "siegebreaker",
        ],
    ),
    (
        "paladin",
        &[
            "lawbringer",
            "judgement",
            "avenger",
            "justicar",
            "crystalforge",
            "lightbringer",
            "redemption",
            "radiant",
        ],
    ),
    (
        "hunter",
        &[
            "giantstalker",
            "dragonstalker",
            "cryptstalker",
            "beast lord",
            "demon stalker",
            "gronnstalker",
            "scourgestalker",
            "windrunner",
        ],
    ),
    (
        "rogue",
        &[
            "nightslayer",
            "bloodfang",
            "bonescythe",
            "netherblade",
            "slayer",
            "deathmantle",
            "terrorblade",
            "shadowblade",
        ],
    ),
    (
        "priest",
        &[
            "prophecy",
            "transcendence",
            "vestments of faith",
            "incarnate",
            "avatar",
            "absolution",
            "sanctification",
            "zabra",
        ],
    ),
    (
        "deathknight",
        &[
            "scourgelord",
            "darkruned",
            "sanctified scourgelord",
            "magma plated",
        ],
    ),
    (
        "shaman",
        &[
            "earthfury",
            "ten storms",
            "tidefury",
            "cyclone",
            "skyshatter",
            "worldbreaker",
            "frost witch",
        ],
    ),
    (
        "mage",
        &[
            "arcanist",
            "netherwind",
            "frostfire",
            "tirisfal",
            "tempest",
            "kirin tor",
            "firehawk",
        ],
    ),
    (
        "warlock",
        &[
            "felheart",
            "nemesis",
            "plagueheart",
            "voidheart",
            "corruptor",
            "malefic",
            "deathbringer",
            "shadowflame",
        ],
    ),
    (
        "monk",
        &[
            "vestments of the eternal dynasty",
            "fire-charm",
            "battlegear of the thousandfold blades",
            "white tiger",
        ],
    ),
    (
        "druid",
        &[
            "cenarion",
            "stormrage",
            "dreamwalker",
            "malorne",
            "nordrassil",
            "thunderheart",
            "nightsong",
            "lasherweave",
            "obsidian arborweave",
        ],
    ),
    (
        "demonhunter",
        &[
            "diabolic",
            "demonbane",
            "vestments of blind absolution",
            "regalia of the dashing scoundrel",
        ],
    ),
    (
        "evoker",
        &[
            "scales of the awakened",
            "draconic hierophant",
            "elements of infusion",
        ],
    ),
];

/// Armor subclass to wearer classes.
pub const ARMOR_TYPE_CLASSES: [(&str, &[&str]); 4] = [
    ("Cloth", &["mage", "priest", "warlock"]),
    ("Leather", &["rogue", "druid", "monk", "demonhunter"]),
    ("Mail", &["hunter", "shaman", "evoker"]),
    ("Plate", &["warrior", "paladin", "deathknight"]),
];

/// Monotonic item-id breakpoints for expansion detection.
///
/// Item ids are assigned chronologically upstream, which makes them a more
/// reliable expansion signal than required level (distorted by stat squishes).
/// An id below the breakpoint belongs to the paired expansion; ids past the
/// last breakpoint fall into the newest expansion.
pub const EXPANSION_ID_BREAKPOINTS: [(u32, crate::models::Expansion); 10] = {
    use crate::models::Expansion::*;
    [
        (25_000, Classic),
        (35_000, BurningCrusade),
        (52_000, WrathOfTheLichKing),
        (78_000, Cataclysm),
        (100_000, MistsOfPandaria),
        (128_000, WarlordsOfDraenor),
        (152_000, Legion),
        (175_000, BattleForAzeroth),
        (190_000, Shadowlands),
        (210_000, Dragonflight),
    ]
};
