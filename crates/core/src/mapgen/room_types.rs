//! Start/boss placement and shuffled distribution of the remaining room types.

use std::collections::BTreeMap;
use std::iter;

use tracing::warn;

use crate::rng::SeededRandomSource;
use crate::types::{RoomId, RoomType};

use super::model::{GenerationWarning, Room};

/// Rooms the shuffled distribution does not cover keep this type.
pub(super) const FALLBACK_ROOM_TYPE: RoomType = RoomType::Combat;

/// Farthest room from the start; ties go to the lowest id.
pub(super) fn select_boss(rooms: &[Room]) -> RoomId {
    let mut boss = RoomId::START;
    let mut best = 0;
    for room in rooms {
        if room.distance_from_start > best {
            best = room.distance_from_start;
            boss = room.id;
        }
    }
    boss
}

/// Assigns start, boss and the shuffled distribution; returns the boss id.
pub(super) fn assign_room_types(
    rooms: &mut [Room],
    distribution: &BTreeMap<RoomType, u32>,
    source: &mut SeededRandomSource,
    warnings: &mut Vec<GenerationWarning>,
) -> RoomId {
    let boss_id = select_boss(rooms);
    let mut pool = build_type_pool(distribution, warnings);
    source.shuffle(&mut pool);

    let mut drawn = pool.into_iter();
    for room in rooms.iter_mut() {
        room.kind = if room.id == RoomId::START {
            RoomType::Start
        } else if room.id == boss_id {
            RoomType::Boss
        } else {
            drawn.next().unwrap_or(FALLBACK_ROOM_TYPE)
        };
    }
    boss_id
}

fn build_type_pool(
    distribution: &BTreeMap<RoomType, u32>,
    warnings: &mut Vec<GenerationWarning>,
) -> Vec<RoomType> {
    let mut pool = Vec::new();
    for (&kind, &count) in distribution {
        if matches!(kind, RoomType::Start | RoomType::Boss) {
            if count > 0 {
                warn!(?kind, count, "ignoring distribution entry for a fixed room type");
                warnings.push(GenerationWarning::IgnoredDistributionEntry { kind, count });
            }
            continue;
        }
        pool.extend(iter::repeat_n(kind, count as usize));
    }
    pool
}
