//! Locked gate room next to the boss.

use std::collections::VecDeque;

use crate::rng::SeededRandomSource;
use crate::types::{Difficulty, RoomId, RoomType};

use super::model::Room;
use super::threat::refresh_threat;

/// Locks one boss neighbour and turns it into an event room.
///
/// The gate stays locked until the goal is complete, so a neighbour is only eligible when
/// it holds no goal item and every goal room stays reachable from the start without
/// passing through it or the boss.
pub(super) fn select_gate(
    rooms: &mut [Room],
    boss_id: RoomId,
    difficulty: Difficulty,
    source: &mut SeededRandomSource,
) -> Option<RoomId> {
    let boss = rooms.get(boss_id.index())?;
    let eligible: Vec<RoomId> = boss
        .neighbors
        .iter()
        .copied()
        .filter(|&id| id != RoomId::START && rooms[id.index()].goal_item.is_none())
        .filter(|&id| goals_reachable_without(rooms, &[id, boss_id]))
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let gate_id = eligible[source.index(eligible.len())];
    let gate = &mut rooms[gate_id.index()];
    gate.kind = RoomType::Event;
    gate.locked = true;
    refresh_threat(gate, difficulty);
    Some(gate_id)
}

fn goals_reachable_without(rooms: &[Room], blocked: &[RoomId]) -> bool {
    let mut seen = vec![false; rooms.len()];
    let mut queue = VecDeque::from([RoomId::START]);
    seen[RoomId::START.index()] = true;
    while let Some(id) = queue.pop_front() {
        for &next in &rooms[id.index()].neighbors {
            if !blocked.contains(&next) && !seen[next.index()] {
                seen[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    rooms.iter().filter(|room| room.goal_item.is_some()).all(|room| seen[room.id.index()])
}

#[cfg(test)]
mod tests {
    use crate::types::Pos;

    use super::*;

    fn star(goal_rooms: &[u32]) -> Vec<Room> {
        let mut rooms: Vec<Room> =
            (0..5).map(|index| Room::placeholder(RoomId(index), Pos::default())).collect();
        // 0 - 1 - 4(boss), 0 - 2 - 4, 0 - 3 - 4
        for middle in 1..=3_u32 {
            rooms[0].neighbors.insert(RoomId(middle));
            rooms[middle as usize].neighbors.insert(RoomId(0));
            rooms[4].neighbors.insert(RoomId(middle));
            rooms[middle as usize].neighbors.insert(RoomId(4));
        }
        for &id in goal_rooms {
            rooms[id as usize].goal_item = Some("dungeon_key".to_string());
        }
        rooms
    }

    #[test]
    fn gate_is_a_locked_event_neighbour_of_the_boss() {
        let mut rooms = star(&[]);
        let mut source = SeededRandomSource::new(6);
        let gate = select_gate(&mut rooms, RoomId(4), Difficulty::Normal, &mut source)
            .expect("boss has neighbours");
        assert!(rooms[4].neighbors.contains(&gate));
        assert!(rooms[gate.index()].locked);
        assert_eq!(rooms[gate.index()].kind, RoomType::Event);
    }

    #[test]
    fn goal_rooms_are_never_gated() {
        let mut rooms = star(&[1, 3]);
        let mut source = SeededRandomSource::new(6);
        let gate = select_gate(&mut rooms, RoomId(4), Difficulty::Normal, &mut source);
        assert_eq!(gate, Some(RoomId(2)));
    }

    #[test]
    fn no_gate_when_every_neighbour_holds_a_goal_item() {
        let mut rooms = star(&[1, 2, 3]);
        let mut source = SeededRandomSource::new(6);
        let gate = select_gate(&mut rooms, RoomId(4), Difficulty::Normal, &mut source);
        assert_eq!(gate, None);
        assert!(rooms.iter().all(|room| !room.locked));
    }

    #[test]
    fn gate_never_cuts_off_a_goal_room() {
        let mut rooms = star(&[]);
        // Room 5 hangs off room 1 only, so locking room 1 would strand its item.
        rooms.push(Room::placeholder(RoomId(5), Pos::default()));
        rooms[1].neighbors.insert(RoomId(5));
        rooms[5].neighbors.insert(RoomId(1));
        rooms[5].goal_item = Some("dungeon_key".to_string());

        for seed in 0..16 {
            let mut candidate = rooms.clone();
            let mut source = SeededRandomSource::new(seed);
            let gate = select_gate(&mut candidate, RoomId(4), Difficulty::Normal, &mut source)
                .expect("rooms 2 and 3 stay eligible");
            assert_ne!(gate, RoomId(1));
        }
    }
}
