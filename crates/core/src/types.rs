use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct ItemId;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl RoomId {
    pub const START: RoomId = RoomId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cosmetic display coordinates; nothing in generation or exploration reads them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Start,
    Combat,
    Event,
    Altar,
    Trap,
    Merchant,
    Chest,
    Boss,
    Elite,
    Rest,
}

impl RoomType {
    pub const ALL: [RoomType; 10] = [
        RoomType::Start,
        RoomType::Combat,
        RoomType::Event,
        RoomType::Altar,
        RoomType::Trap,
        RoomType::Merchant,
        RoomType::Chest,
        RoomType::Boss,
        RoomType::Elite,
        RoomType::Rest,
    ];

    pub fn code(self) -> u8 {
        match self {
            RoomType::Start => 0,
            RoomType::Combat => 1,
            RoomType::Event => 2,
            RoomType::Altar => 3,
            RoomType::Trap => 4,
            RoomType::Merchant => 5,
            RoomType::Chest => 6,
            RoomType::Boss => 7,
            RoomType::Elite => 8,
            RoomType::Rest => 9,
        }
    }

    pub fn is_fight(self) -> bool {
        matches!(self, RoomType::Combat | RoomType::Elite | RoomType::Boss)
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Normal,
    Heroic,
    Mythic,
}

impl Difficulty {
    pub fn threat_bonus(self) -> u8 {
        match self {
            Difficulty::Normal => 0,
            Difficulty::Heroic => 1,
            Difficulty::Mythic => 2,
        }
    }

    /// Percent multiplier applied to enemy stats, trap damage and rewards.
    pub fn scaling_pct(self) -> u32 {
        match self {
            Difficulty::Normal => 100,
            Difficulty::Heroic => 130,
            Difficulty::Mythic => 170,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Difficulty::Normal => 0,
            Difficulty::Heroic => 1,
            Difficulty::Mythic => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Normal => "normal",
            Difficulty::Heroic => "heroic",
            Difficulty::Mythic => "mythic",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn room_type_codes_are_unique() {
        let codes: BTreeSet<u8> = RoomType::ALL.iter().map(|kind| kind.code()).collect();
        assert_eq!(codes.len(), RoomType::ALL.len());
    }

    #[test]
    fn room_types_serialize_as_snake_case_tags() {
        let encoded = serde_json::to_string(&RoomType::Merchant).expect("serialize");
        assert_eq!(encoded, "\"merchant\"");
        let decoded: Difficulty = serde_json::from_str("\"mythic\"").expect("deserialize");
        assert_eq!(decoded, Difficulty::Mythic);
    }
}
