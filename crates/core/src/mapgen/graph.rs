//! Room node layout, spanning tree, extra cyclic edges and BFS distances.

use std::collections::VecDeque;

use crate::error::GenerationError;
use crate::rng::SeededRandomSource;
use crate::types::{Pos, RoomId};

use super::model::Room;

const CELL_SPACING: i32 = 4;
const LAYOUT_JITTER: u32 = 2;
/// Share of spanning-tree edges added again as cycles, in percent.
const EXTRA_EDGE_PCT: usize = 15;

pub(super) fn build_nodes(room_count: usize, source: &mut SeededRandomSource) -> Vec<Room> {
    let columns = (room_count as f64).sqrt().ceil().max(1.0) as usize;
    (0..room_count)
        .map(|index| {
            let column = (index % columns) as i32;
            let row = (index / columns) as i32;
            let jitter_x = source.range_inclusive(0, LAYOUT_JITTER) as i32;
            let jitter_y = source.range_inclusive(0, LAYOUT_JITTER) as i32;
            let pos =
                Pos { y: row * CELL_SPACING + jitter_y, x: column * CELL_SPACING + jitter_x };
            Room::placeholder(RoomId(index as u32), pos)
        })
        .collect()
}

/// Joins every room into one tree of exactly `len - 1` edges.
pub(super) fn connect_spanning_tree(rooms: &mut [Room], source: &mut SeededRandomSource) {
    if rooms.is_empty() {
        return;
    }
    let mut connected = vec![0_usize];
    let mut remaining: Vec<usize> = (1..rooms.len()).collect();

    while !remaining.is_empty() {
        let from = connected[source.index(connected.len())];
        let to = remaining.remove(source.index(remaining.len()));
        link(rooms, from, to);
        connected.push(to);
    }
}

pub(super) fn extra_edge_count(room_count: usize) -> usize {
    room_count.saturating_sub(1) * EXTRA_EDGE_PCT / 100
}

/// Adds `extra_edge_count` cycle edges; duplicate or self pairs are redrawn.
pub(super) fn add_extra_edges(rooms: &mut [Room], source: &mut SeededRandomSource) -> usize {
    let room_count = rooms.len();
    let tree_edges = room_count.saturating_sub(1);
    let free_pairs = (room_count * tree_edges / 2).saturating_sub(tree_edges);
    let target = extra_edge_count(room_count).min(free_pairs);

    let mut added = 0;
    while added < target {
        let a = source.index(room_count);
        let b = source.index(room_count);
        if a == b || rooms[a].is_adjacent(RoomId(b as u32)) {
            continue;
        }
        link(rooms, a, b);
        added += 1;
    }
    added
}

/// Hop distance of every room from room 0.
pub(super) fn compute_distances(rooms: &mut [Room]) -> Result<(), GenerationError> {
    let mut distances: Vec<Option<u32>> = vec![None; rooms.len()];
    let mut open = VecDeque::new();
    if let Some(first) = distances.first_mut() {
        *first = Some(0);
        open.push_back(0_usize);
    }

    while let Some(current) = open.pop_front() {
        let next_distance = distances[current].unwrap_or(0) + 1;
        for neighbor in &rooms[current].neighbors {
            let slot = &mut distances[neighbor.index()];
            if slot.is_none() {
                *slot = Some(next_distance);
                open.push_back(neighbor.index());
            }
        }
    }

    let unreachable: Vec<RoomId> = distances
        .iter()
        .enumerate()
        .filter(|(_, distance)| distance.is_none())
        .map(|(index, _)| RoomId(index as u32))
        .collect();
    if !unreachable.is_empty() {
        return Err(GenerationError::Disconnected { unreachable });
    }

    for (room, distance) in rooms.iter_mut().zip(distances) {
        room.distance_from_start = distance.unwrap_or(0);
    }
    Ok(())
}

fn link(rooms: &mut [Room], a: usize, b: usize) {
    rooms[a].neighbors.insert(RoomId(b as u32));
    rooms[b].neighbors.insert(RoomId(a as u32));
}
