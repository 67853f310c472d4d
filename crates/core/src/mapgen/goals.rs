//! Goal item placement on far-away rooms of the allowed types.

use tracing::warn;

use crate::content::GoalRequirement;
use crate::types::RoomId;

use super::model::Room;

pub const MIN_GOAL_DISTANCE: u32 = 4;

/// Tags up to `requirement.count` rooms with the goal item, farthest first.
///
/// Fewer rooms are tagged when not enough candidates exist; callers compare the returned
/// length against the requested count.
pub(super) fn place_goal_items(
    rooms: &mut [Room],
    start_id: RoomId,
    requirement: &GoalRequirement,
) -> Vec<RoomId> {
    let mut candidates: Vec<(u32, RoomId)> = rooms
        .iter()
        .filter(|room| {
            room.id != start_id
                && room.distance_from_start >= MIN_GOAL_DISTANCE
                && requirement.allows(room.kind)
        })
        .map(|room| (room.distance_from_start, room.id))
        .collect();
    // Stable sort keeps ascending ids among equally distant rooms.
    candidates.sort_by(|left, right| right.0.cmp(&left.0));

    let key_rooms: Vec<RoomId> =
        candidates.into_iter().take(requirement.count as usize).map(|(_, id)| id).collect();
    for id in &key_rooms {
        rooms[id.index()].goal_item = Some(requirement.item_tag.to_string());
    }

    if key_rooms.len() < requirement.count as usize {
        warn!(
            requested = requirement.count,
            placed = key_rooms.len(),
            "not enough eligible rooms for goal items"
        );
    }
    key_rooms
}

#[cfg(test)]
mod tests {
    use crate::types::{Pos, RoomType};

    use super::*;

    fn rooms(layout: &[(RoomType, u32)]) -> Vec<Room> {
        layout
            .iter()
            .enumerate()
            .map(|(index, &(kind, distance))| {
                let mut room = Room::placeholder(RoomId(index as u32), Pos::default());
                room.kind = kind;
                room.distance_from_start = distance;
                room
            })
            .collect()
    }

    fn requirement(count: u32) -> GoalRequirement {
        GoalRequirement {
            allowed: vec![RoomType::Chest, RoomType::Event],
            count,
            item_tag: "dungeon_key",
            description: "keys",
        }
    }

    #[test]
    fn farthest_eligible_rooms_are_preferred() {
        let mut rooms = rooms(&[
            (RoomType::Start, 0),
            (RoomType::Chest, 4),
            (RoomType::Event, 6),
            (RoomType::Combat, 7),
            (RoomType::Chest, 5),
            (RoomType::Chest, 3),
            (RoomType::Event, 6),
        ]);
        let key_rooms = place_goal_items(&mut rooms, RoomId::START, &requirement(3));

        assert_eq!(key_rooms, vec![RoomId(2), RoomId(6), RoomId(4)]);
        for id in &key_rooms {
            assert_eq!(rooms[id.index()].goal_item.as_deref(), Some("dungeon_key"));
        }
        assert!(rooms[1].goal_item.is_none());
        assert!(rooms[3].goal_item.is_none());
    }

    #[test]
    fn shortfall_places_fewer_rooms_without_error() {
        let mut rooms =
            rooms(&[(RoomType::Start, 0), (RoomType::Chest, 2), (RoomType::Event, 4)]);
        let key_rooms = place_goal_items(&mut rooms, RoomId::START, &requirement(3));
        assert_eq!(key_rooms, vec![RoomId(2)]);
    }

    #[test]
    fn rooms_closer_than_minimum_distance_are_never_chosen() {
        let mut rooms = rooms(&[(RoomType::Start, 0), (RoomType::Chest, 3), (RoomType::Event, 1)]);
        assert!(place_goal_items(&mut rooms, RoomId::START, &requirement(2)).is_empty());
    }
}
