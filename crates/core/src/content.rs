//! Static content consulted by generation and exploration.
//!
//! Everything lives on one [`ContentPack`] built once and passed by reference, so there is
//! no hidden global catalog state.

use std::collections::BTreeMap;

use crate::mapgen::{AffixKind, DungeonAffix};
use crate::rng::{AFFIX_STREAM, SeededRandomSource};
use crate::types::{Difficulty, RoomType};

pub mod keys {
    pub const GOAL_KEY_BOSS: &str = "key_boss";
    pub const GOAL_RELIC_HUNT: &str = "relic_hunt";
    pub const GOAL_ELITE_HUNT: &str = "elite_hunt";
    pub const GOAL_BOSS_ONLY: &str = "boss_only";

    pub const ITEM_KEY: &str = "dungeon_key";
    pub const ITEM_RELIC: &str = "ancient_relic";
    pub const ITEM_SIGIL: &str = "blood_sigil";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalRequirement {
    pub allowed: Vec<RoomType>,
    pub count: u32,
    pub item_tag: &'static str,
    pub description: &'static str,
}

impl GoalRequirement {
    pub fn allows(&self, kind: RoomType) -> bool {
        self.allowed.contains(&kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalCatalog {
    goals: BTreeMap<&'static str, GoalRequirement>,
}

impl GoalCatalog {
    pub fn get(&self, goal_type: &str) -> Option<&GoalRequirement> {
        self.goals.get(goal_type)
    }

    pub fn goal_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.goals.keys().copied()
    }
}

impl Default for GoalCatalog {
    fn default() -> Self {
        let goals = BTreeMap::from([
            (
                keys::GOAL_KEY_BOSS,
                GoalRequirement {
                    allowed: vec![RoomType::Combat, RoomType::Event, RoomType::Chest],
                    count: 3,
                    item_tag: keys::ITEM_KEY,
                    description: "Recover the three dungeon keys to unseal the guardian's gate.",
                },
            ),
            (
                keys::GOAL_RELIC_HUNT,
                GoalRequirement {
                    allowed: vec![RoomType::Altar, RoomType::Chest, RoomType::Event],
                    count: 2,
                    item_tag: keys::ITEM_RELIC,
                    description: "Recover two ancient relics before facing the guardian.",
                },
            ),
            (
                keys::GOAL_ELITE_HUNT,
                GoalRequirement {
                    allowed: vec![RoomType::Combat, RoomType::Elite],
                    count: 2,
                    item_tag: keys::ITEM_SIGIL,
                    description: "Take two blood sigils from the dungeon's champions.",
                },
            ),
            (
                keys::GOAL_BOSS_ONLY,
                GoalRequirement {
                    allowed: Vec::new(),
                    count: 0,
                    item_tag: "",
                    description: "Descend and slay the guardian.",
                },
            ),
        ]);
        Self { goals }
    }
}

pub struct AffixTemplate {
    pub kind: AffixKind,
    pub description: &'static str,
}

pub struct AffixCatalog {
    templates: Vec<AffixTemplate>,
}

impl AffixCatalog {
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Rolls `count` distinct affixes from a sub-stream of `seed`.
    ///
    /// The roll never touches the shared generation stream, so the affix count does not
    /// shift any later phase for the same seed.
    pub fn roll(&self, seed: u32, count: usize) -> Vec<DungeonAffix> {
        let mut source = SeededRandomSource::derived(seed, AFFIX_STREAM);
        let mut order: Vec<usize> = (0..self.templates.len()).collect();
        source.shuffle(&mut order);
        order
            .into_iter()
            .take(count)
            .map(|slot| {
                let template = &self.templates[slot];
                DungeonAffix::new(template.kind, template.description)
            })
            .collect()
    }
}

impl Default for AffixCatalog {
    fn default() -> Self {
        Self {
            templates: vec![
                AffixTemplate {
                    kind: AffixKind::Fortified { enemy_health_pct: 25 },
                    description: "Enemies have 25% more health.",
                },
                AffixTemplate {
                    kind: AffixKind::Frenzied { enemy_damage_pct: 20 },
                    description: "Enemies deal 20% more damage.",
                },
                AffixTemplate {
                    kind: AffixKind::Bountiful { gold_pct: 30 },
                    description: "Chests hold 30% more gold.",
                },
                AffixTemplate {
                    kind: AffixKind::Blessed { healing_pct: 50 },
                    description: "Altars restore 50% more health.",
                },
                AffixTemplate {
                    kind: AffixKind::Darkness { torch_penalty: 2 },
                    description: "The dark swallows light: two fewer torches.",
                },
                AffixTemplate {
                    kind: AffixKind::TreasureTrove { rooms: 1 },
                    description: "A guarded hall has been left unattended, its treasure exposed.",
                },
                AffixTemplate {
                    kind: AffixKind::Minefield { rooms: 2 },
                    description: "Strange chambers have been rigged with traps.",
                },
            ],
        }
    }
}

pub struct NameTemplate {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LootEntry {
    pub name: &'static str,
    pub value: u32,
}

pub struct ContentPack {
    pub goals: GoalCatalog,
    pub affixes: AffixCatalog,
    pub hints: BTreeMap<RoomType, Vec<&'static str>>,
    pub names: BTreeMap<Difficulty, Vec<NameTemplate>>,
    pub loot: Vec<LootEntry>,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self {
            goals: GoalCatalog::default(),
            affixes: AffixCatalog::default(),
            hints: default_hints(),
            names: default_names(),
            loot: vec![
                LootEntry { name: "Minor Health Potion", value: 15 },
                LootEntry { name: "Bundle of Torches", value: 20 },
                LootEntry { name: "Tarnished Ring", value: 35 },
                LootEntry { name: "Runed Dagger", value: 50 },
                LootEntry { name: "Moonsilver Amulet", value: 90 },
            ],
        }
    }

    pub fn hints_for(&self, kind: RoomType) -> &[&'static str] {
        self.hints.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn names_for(&self, difficulty: Difficulty) -> &[NameTemplate] {
        self.names.get(&difficulty).map_or(&[], Vec::as_slice)
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

fn default_hints() -> BTreeMap<RoomType, Vec<&'static str>> {
    BTreeMap::from([
        (RoomType::Combat, vec!["Claws scrape against stone.", "You hear guttural voices."]),
        (RoomType::Elite, vec!["Heavy armored footsteps echo.", "The air reeks of old blood."]),
        (RoomType::Event, vec!["Something shifts in the shadows.", "A faint melody drifts by."]),
        (RoomType::Altar, vec!["A warm glow seeps under the door."]),
        (RoomType::Trap, vec!["The floor here looks uneven.", "A thin wire glints ahead."]),
        (RoomType::Merchant, vec!["Coins clink somewhere nearby."]),
        (RoomType::Chest, vec!["Something glitters in the dark."]),
        (RoomType::Boss, vec!["An overwhelming presence waits beyond."]),
        (RoomType::Rest, vec!["A cold draft carries the smell of ash."]),
    ])
}

fn default_names() -> BTreeMap<Difficulty, Vec<NameTemplate>> {
    BTreeMap::from([
        (
            Difficulty::Normal,
            vec![
                NameTemplate {
                    name: "Damp Cellars",
                    description: "Flooded storerooms beneath an abandoned keep.",
                },
                NameTemplate {
                    name: "Forgotten Crypt",
                    description: "Dust-choked tombs of a minor noble house.",
                },
            ],
        ),
        (
            Difficulty::Heroic,
            vec![
                NameTemplate {
                    name: "Sunken Bastion",
                    description: "A fortress the swamp took back, still garrisoned.",
                },
                NameTemplate {
                    name: "Ashen Warrens",
                    description: "Burrows scorched by something that still breathes fire.",
                },
            ],
        ),
        (
            Difficulty::Mythic,
            vec![
                NameTemplate {
                    name: "Abyssal Spire",
                    description: "A tower grown downward into the dark.",
                },
                NameTemplate {
                    name: "Throne of Hollow Kings",
                    description: "Where dead monarchs still hold court.",
                },
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn goal_catalog_has_expected_entries() {
        let catalog = GoalCatalog::default();
        let key_boss = catalog.get(keys::GOAL_KEY_BOSS).expect("key_boss present");
        assert_eq!(key_boss.count, 3);
        assert!(key_boss.allows(RoomType::Chest));
        assert!(!key_boss.allows(RoomType::Boss));
        assert!(catalog.get("no_such_goal").is_none());
    }

    #[test]
    fn goal_requirements_never_allow_start_or_boss() {
        let catalog = GoalCatalog::default();
        for goal_type in catalog.goal_types() {
            let requirement = catalog.get(goal_type).expect("listed goal");
            assert!(!requirement.allows(RoomType::Start), "{goal_type}");
            assert!(!requirement.allows(RoomType::Boss), "{goal_type}");
        }
    }

    #[test]
    fn affix_roll_is_deterministic_and_distinct() {
        let catalog = AffixCatalog::default();
        let first = catalog.roll(42, 3);
        let second = catalog.roll(42, 3);
        assert_eq!(first, second);

        let ids: BTreeSet<&str> = first.iter().map(DungeonAffix::id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn affix_roll_caps_at_catalog_size() {
        let catalog = AffixCatalog::default();
        assert_eq!(catalog.roll(1, 50).len(), catalog.len());
        assert!(catalog.roll(1, 0).is_empty());
    }

    #[test]
    fn every_difficulty_has_name_templates() {
        let content = ContentPack::default();
        for difficulty in [Difficulty::Normal, Difficulty::Heroic, Difficulty::Mythic] {
            assert!(!content.names_for(difficulty).is_empty(), "{difficulty}");
        }
        assert!(content.hints_for(RoomType::Start).is_empty());
    }
}
