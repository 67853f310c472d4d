//! Public data models for generated dungeons: rooms, goal, affixes and the assembled map.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Difficulty, Pos, RoomId, RoomType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    /// Always in `1..=3`.
    pub level: u8,
    pub hint: Option<String>,
    /// Display-only percentage; no rule reads it.
    pub hint_chance: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomType,
    pub neighbors: BTreeSet<RoomId>,
    pub pos: Pos,
    pub distance_from_start: u32,
    pub threat: Threat,
    pub goal_item: Option<String>,
    pub locked: bool,
}

impl Room {
    pub(super) fn placeholder(id: RoomId, pos: Pos) -> Self {
        Self {
            id,
            kind: RoomType::Combat,
            neighbors: BTreeSet::new(),
            pos,
            distance_from_start: 0,
            threat: Threat { level: 1, hint: None, hint_chance: 0 },
            goal_item: None,
            locked: false,
        }
    }

    pub fn is_adjacent(&self, other: RoomId) -> bool {
        self.neighbors.contains(&other)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonGoal {
    pub kind: String,
    pub description: String,
    pub current: u32,
    pub required: u32,
    pub completed: bool,
}

impl DungeonGoal {
    pub fn new(kind: &str, description: &str, required: u32) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.to_string(),
            current: 0,
            required,
            completed: required == 0,
        }
    }

    /// Records one collected goal item; returns true when this call completed the goal.
    pub fn advance(&mut self) -> bool {
        let was_completed = self.completed;
        self.current = self.current.saturating_add(1);
        self.completed = self.current >= self.required;
        self.completed && !was_completed
    }
}

/// Run-scoped modifier kinds, each with its own typed magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AffixKind {
    Fortified { enemy_health_pct: u32 },
    Frenzied { enemy_damage_pct: u32 },
    Bountiful { gold_pct: u32 },
    Blessed { healing_pct: u32 },
    Darkness { torch_penalty: u32 },
    TreasureTrove { rooms: u32 },
    Minefield { rooms: u32 },
}

impl AffixKind {
    pub fn id(self) -> &'static str {
        match self {
            AffixKind::Fortified { .. } => "fortified",
            AffixKind::Frenzied { .. } => "frenzied",
            AffixKind::Bountiful { .. } => "bountiful",
            AffixKind::Blessed { .. } => "blessed",
            AffixKind::Darkness { .. } => "darkness",
            AffixKind::TreasureTrove { .. } => "treasure_trove",
            AffixKind::Minefield { .. } => "minefield",
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(
            self,
            AffixKind::Bountiful { .. }
                | AffixKind::Blessed { .. }
                | AffixKind::TreasureTrove { .. }
        )
    }

    fn code(self) -> (u8, u32) {
        match self {
            AffixKind::Fortified { enemy_health_pct } => (0, enemy_health_pct),
            AffixKind::Frenzied { enemy_damage_pct } => (1, enemy_damage_pct),
            AffixKind::Bountiful { gold_pct } => (2, gold_pct),
            AffixKind::Blessed { healing_pct } => (3, healing_pct),
            AffixKind::Darkness { torch_penalty } => (4, torch_penalty),
            AffixKind::TreasureTrove { rooms } => (5, rooms),
            AffixKind::Minefield { rooms } => (6, rooms),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonAffix {
    pub kind: AffixKind,
    pub positive: bool,
    pub description: String,
}

impl DungeonAffix {
    pub fn new(kind: AffixKind, description: &str) -> Self {
        Self { kind, positive: kind.is_positive(), description: description.to_string() }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }
}

/// Soft conditions reported alongside an otherwise valid map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationWarning {
    GoalShortfall { requested: u32, placed: u32 },
    IgnoredDistributionEntry { kind: RoomType, count: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonMap {
    pub seed: u32,
    pub rooms: BTreeMap<RoomId, Room>,
    pub start_id: RoomId,
    pub boss_id: RoomId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub level: u32,
    pub goal: DungeonGoal,
    pub affixes: Vec<DungeonAffix>,
    pub gate_room_id: Option<RoomId>,
    pub key_rooms: Vec<RoomId>,
    pub warnings: Vec<GenerationWarning>,
}

impl DungeonMap {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.room(self.start_id)
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.room(self.boss_id)
    }

    pub fn max_depth(&self) -> u32 {
        self.rooms.values().map(|room| room.distance_from_start).max().unwrap_or(0)
    }

    /// Number of undirected edges in the room graph.
    pub fn edge_count(&self) -> usize {
        self.rooms.values().map(|room| room.neighbors.len()).sum::<usize>() / 2
    }

    pub fn affix_kinds(&self) -> impl Iterator<Item = AffixKind> + '_ {
        self.affixes.iter().map(|affix| affix.kind)
    }

    pub fn goal_shortfall(&self) -> Option<(u32, u32)> {
        self.warnings.iter().find_map(|warning| match warning {
            GenerationWarning::GoalShortfall { requested, placed } => Some((*requested, *placed)),
            GenerationWarning::IgnoredDistributionEntry { .. } => None,
        })
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in self.rooms.values() {
            bytes.extend(room.id.0.to_le_bytes());
            bytes.push(room.kind.code());
            bytes.extend(room.pos.y.to_le_bytes());
            bytes.extend(room.pos.x.to_le_bytes());
            bytes.extend(room.distance_from_start.to_le_bytes());
            bytes.push(room.threat.level);
            bytes.push(room.threat.hint_chance);
            push_optional_str(&mut bytes, room.threat.hint.as_deref());
            push_optional_str(&mut bytes, room.goal_item.as_deref());
            bytes.push(u8::from(room.locked));
            bytes.extend((room.neighbors.len() as u32).to_le_bytes());
            for neighbor in &room.neighbors {
                bytes.extend(neighbor.0.to_le_bytes());
            }
        }

        bytes.extend(self.start_id.0.to_le_bytes());
        bytes.extend(self.boss_id.0.to_le_bytes());
        push_str(&mut bytes, &self.name);
        push_str(&mut bytes, &self.description);
        bytes.push(self.difficulty.code());
        bytes.extend(self.level.to_le_bytes());
        push_str(&mut bytes, &self.goal.kind);
        bytes.extend(self.goal.required.to_le_bytes());

        bytes.extend((self.affixes.len() as u32).to_le_bytes());
        for affix in &self.affixes {
            let (code, magnitude) = affix.kind.code();
            bytes.push(code);
            bytes.extend(magnitude.to_le_bytes());
        }

        match self.gate_room_id {
            Some(gate) => {
                bytes.push(1);
                bytes.extend(gate.0.to_le_bytes());
            }
            None => bytes.push(0),
        }
        bytes.extend((self.key_rooms.len() as u32).to_le_bytes());
        for key_room in &self.key_rooms {
            bytes.extend(key_room.0.to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}

fn push_optional_str(bytes: &mut Vec<u8>, value: Option<&str>) {
    match value {
        Some(value) => {
            bytes.push(1);
            push_str(bytes, value);
        }
        None => bytes.push(0),
    }
}
