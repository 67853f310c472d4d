//! Generation pipeline that composes graph, typing, annotation and placement phases.
//!
//! Every phase draws from one shared [`SeededRandomSource`] in a fixed order: layout, tree,
//! extra edges, type shuffle, threat hints, goal placement, gate pick, affix mutation.
//! Reordering any phase changes the map produced for a given seed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{DungeonConfig, MIN_ROOM_COUNT};
use crate::content::ContentPack;
use crate::error::GenerationError;
use crate::rng::{NAME_STREAM, SeededRandomSource, mix_seed_stream};
use crate::types::{Difficulty, RoomId};

use super::affixes::apply_affixes;
use super::gate::select_gate;
use super::goals::place_goal_items;
use super::graph::{add_extra_edges, build_nodes, compute_distances, connect_spanning_tree};
use super::model::{DungeonAffix, DungeonGoal, DungeonMap, GenerationWarning, Room};
use super::room_types::assign_room_types;
use super::threat::annotate_threats;

pub struct DungeonGenerator<'a> {
    content: &'a ContentPack,
    config: &'a DungeonConfig,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(content: &'a ContentPack, config: &'a DungeonConfig) -> Self {
        Self { content, config }
    }

    pub fn generate(&self, seed: u32) -> Result<DungeonMap, GenerationError> {
        let config = self.config;
        if config.room_count < MIN_ROOM_COUNT {
            return Err(GenerationError::TooFewRooms {
                room_count: config.room_count,
                minimum: MIN_ROOM_COUNT,
            });
        }
        let requirement = self
            .content
            .goals
            .get(&config.goal_type)
            .ok_or_else(|| GenerationError::UnknownGoalType(config.goal_type.clone()))?;
        let affixes = self.content.affixes.roll(seed, config.affix_count);

        let mut source = SeededRandomSource::new(seed);
        let mut warnings = Vec::new();

        let mut rooms = build_nodes(config.room_count, &mut source);
        connect_spanning_tree(&mut rooms, &mut source);
        let extra_edges = add_extra_edges(&mut rooms, &mut source);
        compute_distances(&mut rooms)?;
        debug!(seed, rooms = rooms.len(), extra_edges, "room graph built");

        let boss_id =
            assign_room_types(&mut rooms, &config.room_distribution, &mut source, &mut warnings);
        annotate_threats(&mut rooms, config.difficulty, self.content, &mut source);

        let key_rooms = place_goal_items(&mut rooms, RoomId::START, requirement);
        let placed = key_rooms.len() as u32;
        if placed < requirement.count {
            warnings.push(GenerationWarning::GoalShortfall {
                requested: requirement.count,
                placed,
            });
        }
        // Clamp so the run stays completable after a shortfall.
        let goal = DungeonGoal::new(&config.goal_type, requirement.description, placed);

        let gate_room_id = select_gate(&mut rooms, boss_id, config.difficulty, &mut source);
        if gate_room_id.is_none() {
            warn!(%boss_id, "no eligible gate room next to the boss");
        }
        apply_affixes(&mut rooms, &affixes, config.difficulty, &mut source);
        debug!(%boss_id, ?gate_room_id, ?key_rooms, "rooms annotated");

        Ok(assemble(AssemblyParts {
            seed,
            rooms,
            boss_id,
            goal,
            affixes,
            gate_room_id,
            key_rooms,
            warnings,
            config,
            content: self.content,
        }))
    }
}

struct AssemblyParts<'a> {
    seed: u32,
    rooms: Vec<Room>,
    boss_id: RoomId,
    goal: DungeonGoal,
    affixes: Vec<DungeonAffix>,
    gate_room_id: Option<RoomId>,
    key_rooms: Vec<RoomId>,
    warnings: Vec<GenerationWarning>,
    config: &'a DungeonConfig,
    content: &'a ContentPack,
}

fn assemble(parts: AssemblyParts<'_>) -> DungeonMap {
    let (name, description) = pick_title(parts.content, parts.config.difficulty, parts.seed);
    let rooms: BTreeMap<RoomId, Room> =
        parts.rooms.into_iter().map(|room| (room.id, room)).collect();

    DungeonMap {
        seed: parts.seed,
        rooms,
        start_id: RoomId::START,
        boss_id: parts.boss_id,
        name,
        description,
        difficulty: parts.config.difficulty,
        level: parts.config.player_level,
        goal: parts.goal,
        affixes: parts.affixes,
        gate_room_id: parts.gate_room_id,
        key_rooms: parts.key_rooms,
        warnings: parts.warnings,
    }
}

fn pick_title(content: &ContentPack, difficulty: Difficulty, seed: u32) -> (String, String) {
    let templates = content.names_for(difficulty);
    if templates.is_empty() {
        return (format!("Unnamed {difficulty} Dungeon"), String::new());
    }
    let slot = (mix_seed_stream(u64::from(seed), NAME_STREAM) % templates.len() as u64) as usize;
    let template = &templates[slot];
    (template.name.to_string(), template.description.to_string())
}
