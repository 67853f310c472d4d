//! Map-mutating affix effects.

use tracing::debug;

use crate::rng::SeededRandomSource;
use crate::types::{Difficulty, RoomId, RoomType};

use super::model::{AffixKind, DungeonAffix, Room};
use super::threat::refresh_threat;

/// Applies every map-mutating affix in order; kinds without a map effect are skipped.
pub(super) fn apply_affixes(
    rooms: &mut [Room],
    affixes: &[DungeonAffix],
    difficulty: Difficulty,
    source: &mut SeededRandomSource,
) {
    for affix in affixes {
        let converted = match affix.kind {
            AffixKind::TreasureTrove { rooms: count } => {
                convert_rooms(rooms, RoomType::Combat, RoomType::Chest, count, difficulty, source)
            }
            AffixKind::Minefield { rooms: count } => {
                convert_rooms(rooms, RoomType::Event, RoomType::Trap, count, difficulty, source)
            }
            AffixKind::Fortified { .. }
            | AffixKind::Frenzied { .. }
            | AffixKind::Bountiful { .. }
            | AffixKind::Blessed { .. }
            | AffixKind::Darkness { .. } => continue,
        };
        debug!(affix = affix.id(), ?converted, "affix rewrote rooms");
    }
}

/// Rewrites up to `count` random rooms of type `from`; goal and locked rooms are left alone.
fn convert_rooms(
    rooms: &mut [Room],
    from: RoomType,
    to: RoomType,
    count: u32,
    difficulty: Difficulty,
    source: &mut SeededRandomSource,
) -> Vec<RoomId> {
    let mut eligible: Vec<RoomId> = rooms
        .iter()
        .filter(|room| room.kind == from && room.goal_item.is_none() && !room.locked)
        .map(|room| room.id)
        .collect();

    let mut converted = Vec::new();
    for _ in 0..count {
        if eligible.is_empty() {
            break;
        }
        let id = eligible.remove(source.index(eligible.len()));
        let room = &mut rooms[id.index()];
        room.kind = to;
        refresh_threat(room, difficulty);
        converted.push(id);
    }
    converted
}

#[cfg(test)]
mod tests {
    use crate::types::Pos;

    use super::*;

    fn rooms(kinds: &[RoomType]) -> Vec<Room> {
        kinds
            .iter()
            .enumerate()
            .map(|(index, &kind)| {
                let mut room = Room::placeholder(RoomId(index as u32), Pos::default());
                room.kind = kind;
                room
            })
            .collect()
    }

    #[test]
    fn treasure_trove_converts_combat_room_without_goal_item() {
        let mut rooms =
            rooms(&[RoomType::Start, RoomType::Combat, RoomType::Combat, RoomType::Boss]);
        rooms[1].goal_item = Some("dungeon_key".to_string());
        let affixes = [DungeonAffix::new(AffixKind::TreasureTrove { rooms: 1 }, "trove")];

        apply_affixes(&mut rooms, &affixes, Difficulty::Normal, &mut SeededRandomSource::new(1));

        assert_eq!(rooms[1].kind, RoomType::Combat);
        assert_eq!(rooms[2].kind, RoomType::Chest);
        assert_eq!(rooms[2].threat.level, 1);
    }

    #[test]
    fn minefield_skips_locked_gate() {
        let mut rooms =
            rooms(&[RoomType::Start, RoomType::Event, RoomType::Event, RoomType::Boss]);
        rooms[2].locked = true;
        let affixes = [DungeonAffix::new(AffixKind::Minefield { rooms: 5 }, "mines")];

        apply_affixes(&mut rooms, &affixes, Difficulty::Normal, &mut SeededRandomSource::new(1));

        assert_eq!(rooms[1].kind, RoomType::Trap);
        assert_eq!(rooms[2].kind, RoomType::Event);
    }

    #[test]
    fn stat_affixes_leave_the_map_untouched() {
        let mut rooms =
            rooms(&[RoomType::Start, RoomType::Combat, RoomType::Event, RoomType::Boss]);
        let before = rooms.clone();
        let affixes = [
            DungeonAffix::new(AffixKind::Fortified { enemy_health_pct: 25 }, "tough"),
            DungeonAffix::new(AffixKind::Darkness { torch_penalty: 2 }, "dark"),
        ];
        let mut source = SeededRandomSource::new(1);
        apply_affixes(&mut rooms, &affixes, Difficulty::Normal, &mut source);

        assert_eq!(rooms, before);
        let mut untouched = SeededRandomSource::new(1);
        assert_eq!(source.next_f64(), untouched.next_f64(), "no draws should be consumed");
    }
}
