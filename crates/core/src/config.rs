//! Generation input record and its TOML loader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::keys;
use crate::error::ConfigError;
use crate::types::{Difficulty, RoomType};

pub const MIN_ROOM_COUNT: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub room_count: usize,
    /// How many rooms of each type to place before falling back to combat rooms.
    pub room_distribution: BTreeMap<RoomType, u32>,
    pub goal_type: String,
    pub affix_count: usize,
    pub difficulty: Difficulty,
    pub player_level: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            room_count: 12,
            room_distribution: BTreeMap::from([
                (RoomType::Combat, 3),
                (RoomType::Event, 2),
                (RoomType::Altar, 1),
                (RoomType::Trap, 1),
                (RoomType::Merchant, 1),
                (RoomType::Chest, 1),
                (RoomType::Elite, 1),
            ]),
            goal_type: keys::GOAL_KEY_BOSS.to_string(),
            affix_count: 2,
            difficulty: Difficulty::Normal,
            player_level: 1,
        }
    }
}

impl DungeonConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_room_count(mut self, room_count: usize) -> Self {
        self.room_count = room_count;
        self
    }

    pub fn with_goal(mut self, goal_type: &str) -> Self {
        self.goal_type = goal_type.to_string();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_affix_count(mut self, affix_count: usize) -> Self {
        self.affix_count = affix_count;
        self
    }
}
