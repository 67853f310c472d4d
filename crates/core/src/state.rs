//! Mutable per-run records owned by the exploration state machine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::explore::EnemyStatBlock;
use crate::mapgen::{DungeonAffix, DungeonGoal, DungeonMap};
use crate::types::{ItemId, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Exited,
    Dead,
    Cleared,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::InProgress)
    }
}

/// Torches: a depletable budget of safe moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionResource {
    pub current: u32,
    pub max: u32,
    /// Set once the exhaustion penalty fired for the current depletion.
    pub exhaustion_applied: bool,
}

impl ExpeditionResource {
    pub fn new(max: u32) -> Self {
        Self { current: max, max, exhaustion_applied: false }
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn consume(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Adds torches up to `max` and re-arms the exhaustion penalty when any light returns.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        if self.current > 0 {
            self.exhaustion_applied = false;
        }
        self.current - before
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    Rooms,
    Combat,
    Treasure,
    Goal,
    Hazards,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationPoints {
    pub total: u32,
    pub breakdown: BTreeMap<PointCategory, u32>,
}

impl ExplorationPoints {
    pub fn add(&mut self, category: PointCategory, points: u32) {
        self.total = self.total.saturating_add(points);
        let entry = self.breakdown.entry(category).or_default();
        *entry = entry.saturating_add(points);
    }

    pub fn get(&self, category: PointCategory) -> u32 {
        self.breakdown.get(&category).copied().unwrap_or(0)
    }
}

/// The player's combat-relevant numbers for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVitals {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub dexterity: u32,
    pub level: u32,
}

impl PlayerVitals {
    /// Baseline vitals; stats saturate at `i32::MAX` for absurd levels.
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let grown = |base: i32, per_level: i32| {
            let bonus = i64::from(per_level) * i64::from(level);
            i32::try_from(i64::from(base).saturating_add(bonus)).unwrap_or(i32::MAX)
        };
        let max_hp = grown(80, 10);
        Self {
            hp: max_hp,
            max_hp,
            attack: grown(8, 2),
            defense: grown(3, 1),
            dexterity: 10,
            level,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount.max(0));
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    pub value: u32,
    pub found_in: RoomId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRewards {
    pub gold: u32,
    pub experience: u32,
    pub items: Vec<LootItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveRun {
    pub current_room: RoomId,
    pub history: Vec<RoomId>,
    /// Rooms whose entry effect has already resolved.
    pub used_rooms: BTreeSet<RoomId>,
    pub player: PlayerVitals,
    pub torches: ExpeditionResource,
    pub points: ExplorationPoints,
    pub goal: DungeonGoal,
    pub affixes: Vec<DungeonAffix>,
    pub gold: u32,
    pub inventory: SlotMap<ItemId, LootItem>,
    /// Enemy damage buff owed to the next encounter after exhaustion.
    pub exhaustion_buff: bool,
    /// Enemy of an unresolved battle in the current room; a resumed run re-enters that fight.
    #[serde(default)]
    pub pending_enemy: Option<EnemyStatBlock>,
    pub status: RunStatus,
    pub rewards: Option<RunRewards>,
}

impl ActiveRun {
    pub fn new(map: &DungeonMap, player: PlayerVitals, max_torches: u32) -> Self {
        Self {
            current_room: map.start_id,
            history: vec![map.start_id],
            used_rooms: BTreeSet::from([map.start_id]),
            player,
            torches: ExpeditionResource::new(max_torches),
            points: ExplorationPoints::default(),
            goal: map.goal.clone(),
            affixes: map.affixes.clone(),
            gold: 0,
            inventory: SlotMap::with_key(),
            exhaustion_buff: false,
            pending_enemy: None,
            status: RunStatus::InProgress,
            rewards: None,
        }
    }

    pub fn has_visited(&self, room: RoomId) -> bool {
        self.history.contains(&room)
    }
}
