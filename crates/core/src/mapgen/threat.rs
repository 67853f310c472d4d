//! Per-room threat levels and optional flavour hints.

use crate::content::ContentPack;
use crate::rng::SeededRandomSource;
use crate::types::{Difficulty, RoomType};

use super::model::{Room, Threat};

pub const MAX_THREAT_LEVEL: u8 = 3;
const HINT_PROBABILITY: f64 = 0.3;

pub fn base_threat(kind: RoomType) -> u8 {
    match kind {
        RoomType::Start | RoomType::Altar | RoomType::Merchant | RoomType::Chest => 1,
        RoomType::Rest => 1,
        RoomType::Event | RoomType::Trap | RoomType::Combat => 2,
        RoomType::Boss | RoomType::Elite => 3,
    }
}

pub fn threat_level(kind: RoomType, distance_from_start: u32, difficulty: Difficulty) -> u8 {
    let depth_bonus = (distance_from_start / 3).min(u32::from(MAX_THREAT_LEVEL)) as u8;
    (base_threat(kind) + depth_bonus + difficulty.threat_bonus()).min(MAX_THREAT_LEVEL)
}

fn hint_chance(level: u8) -> u8 {
    20 + level * 10
}

pub(super) fn annotate_threats(
    rooms: &mut [Room],
    difficulty: Difficulty,
    content: &ContentPack,
    source: &mut SeededRandomSource,
) {
    for room in rooms.iter_mut() {
        let level = threat_level(room.kind, room.distance_from_start, difficulty);
        let pool = content.hints_for(room.kind);
        let roll_hint = source.chance(HINT_PROBABILITY);
        let hint = (roll_hint && !pool.is_empty())
            .then(|| pool[source.index(pool.len())].to_string());
        room.threat = Threat { level, hint, hint_chance: hint_chance(level) };
    }
}

/// Recomputes a room's threat after its type was rewritten; the stale hint is dropped.
pub(super) fn refresh_threat(room: &mut Room, difficulty: Difficulty) {
    let level = threat_level(room.kind, room.distance_from_start, difficulty);
    room.threat = Threat { level, hint: None, hint_chance: hint_chance(level) };
}
