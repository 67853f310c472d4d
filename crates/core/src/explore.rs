//! Runtime traversal of a generated dungeon.
//!
//! [`Expedition`] owns the immutable [`DungeonMap`] and the mutable [`ActiveRun`]. Every
//! player action is a synchronous call that either commits a whole transition or returns
//! [`InvalidTransition`] with the run untouched.

use std::mem;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::content::{ContentPack, LootEntry};
use crate::mapgen::{AffixKind, DungeonMap, Room};
use crate::rng::{EXPLORATION_STREAM, SeededRandomSource, mix_seed_stream};
use crate::state::{ActiveRun, PlayerVitals, PointCategory, RunStatus};
use crate::types::{RoomId, RoomType};

mod effects;
mod encounters;
mod rewards;


pub use effects::trap_avoid_chance;
pub use encounters::EnemyStatBlock;
use encounters::scale;
pub use rewards::compute_rewards;

pub const BASE_TORCHES: u32 = 6;
pub const REST_TORCH_RESTORE: u32 = 3;
/// Share of max health lost when the last torch burns out.
const EXHAUSTION_DAMAGE_PCT: u32 = 10;

/// Sub-state of the room the player currently stands in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoomPhase {
    Exploring,
    Battle { enemy: EnemyStatBlock },
    Event,
    Trade,
    Completed,
}

impl RoomPhase {
    fn label(&self) -> &'static str {
        match self {
            RoomPhase::Exploring => "exploring",
            RoomPhase::Battle { .. } => "battle",
            RoomPhase::Event => "event",
            RoomPhase::Trade => "trade",
            RoomPhase::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),
    #[error("room {to} is not adjacent to room {from}")]
    NotAdjacent { from: RoomId, to: RoomId },
    #[error("room {0} stays locked until the goal is completed")]
    Locked(RoomId),
    #[error("cannot {action} during the {phase} phase")]
    WrongPhase { action: &'static str, phase: &'static str },
    #[error("run already ended as {0:?}")]
    RunOver(RunStatus),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub damage_taken: i32,
}

/// Fight resolution supplied by the caller; the expedition only consumes the report.
pub trait CombatResolver {
    fn resolve(&mut self, player: &PlayerVitals, enemy: &EnemyStatBlock) -> BattleReport;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorationEvent {
    Moved { from: RoomId, to: RoomId, torches_left: u32 },
    Exhausted { damage: i32 },
    GoalItemCollected { item: String, current: u32, required: u32 },
    GoalCompleted,
    EnemySpawned { room: RoomId, boss: bool },
    BattleWon { room: RoomId },
    BattleLost { room: RoomId },
    Healed { amount: i32 },
    TrapAvoided { room: RoomId },
    TrapTriggered { room: RoomId, damage: i32 },
    LootFound { gold: u32, items: usize },
    TorchesRestored { amount: u32 },
    MerchantOpened { room: RoomId },
    EventStarted { room: RoomId },
    RunEnded { status: RunStatus },
}

pub struct Expedition {
    map: DungeonMap,
    run: ActiveRun,
    phase: RoomPhase,
    source: SeededRandomSource,
    loot_table: Vec<LootEntry>,
    log: Vec<ExplorationEvent>,
}

/// Torch budget for a map: grows with room count, shrinks under darkness affixes.
pub fn torch_budget(map: &DungeonMap) -> u32 {
    let darkness: u32 = map
        .affix_kinds()
        .map(|kind| match kind {
            AffixKind::Darkness { torch_penalty } => torch_penalty,
            _ => 0,
        })
        .sum();
    (BASE_TORCHES + map.rooms.len() as u32 / 2).saturating_sub(darkness).max(1)
}

impl Expedition {
    pub fn start(map: DungeonMap, content: &ContentPack, player: PlayerVitals) -> Self {
        let torches = torch_budget(&map);
        let run = ActiveRun::new(&map, player, torches);
        Self::resume(map, content, run)
    }

    /// Continues a run loaded by the caller, back inside any battle left unresolved.
    pub fn resume(map: DungeonMap, content: &ContentPack, run: ActiveRun) -> Self {
        let stream = EXPLORATION_STREAM.wrapping_add(run.history.len() as u64);
        let source = SeededRandomSource::from_u64(mix_seed_stream(u64::from(map.seed), stream));
        let phase = match &run.pending_enemy {
            Some(enemy) if !run.status.is_terminal() => RoomPhase::Battle { enemy: enemy.clone() },
            _ => RoomPhase::Exploring,
        };
        Self {
            map,
            run,
            phase,
            source,
            loot_table: content.loot.clone(),
            log: Vec::new(),
        }
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    pub fn run(&self) -> &ActiveRun {
        &self.run
    }

    pub fn into_run(self) -> ActiveRun {
        self.run
    }

    pub fn phase(&self) -> &RoomPhase {
        &self.phase
    }

    pub fn log(&self) -> &[ExplorationEvent] {
        &self.log
    }

    pub fn status(&self) -> RunStatus {
        self.run.status
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.map.room(self.run.current_room)
    }

    /// Neighbours of the current room the player may enter right now.
    pub fn available_moves(&self) -> Vec<RoomId> {
        let Some(room) = self.current_room() else {
            return Vec::new();
        };
        room.neighbors.iter().copied().filter(|&id| self.check_move(id).is_ok()).collect()
    }

    pub fn move_to(&mut self, target: RoomId) -> Result<&RoomPhase, InvalidTransition> {
        self.check_move(target)?;
        let from = self.run.current_room;

        self.run.torches.consume();
        self.log.push(ExplorationEvent::Moved {
            from,
            to: target,
            torches_left: self.run.torches.current,
        });
        if self.run.torches.is_depleted() && !self.run.torches.exhaustion_applied {
            self.apply_exhaustion();
        }

        self.run.current_room = target;
        self.run.history.push(target);
        debug!(%from, to = %target, torches = self.run.torches.current, "moved");

        if self.run.player.is_dead() {
            self.phase = RoomPhase::Completed;
            self.finish(RunStatus::Dead);
            return Ok(&self.phase);
        }

        self.phase = if self.run.used_rooms.insert(target) {
            self.enter_room(target)
        } else {
            RoomPhase::Completed
        };
        Ok(&self.phase)
    }

    pub fn resolve_battle(
        &mut self,
        resolver: &mut impl CombatResolver,
    ) -> Result<BattleOutcome, InvalidTransition> {
        self.ensure_in_progress()?;
        let RoomPhase::Battle { enemy } = &self.phase else {
            return Err(self.wrong_phase("resolve a battle"));
        };
        let report = resolver.resolve(&self.run.player, enemy);
        self.apply_battle_report(report)
    }

    pub fn apply_battle_report(
        &mut self,
        report: BattleReport,
    ) -> Result<BattleOutcome, InvalidTransition> {
        self.ensure_in_progress()?;
        let enemy = match mem::replace(&mut self.phase, RoomPhase::Completed) {
            RoomPhase::Battle { enemy } => enemy,
            other => {
                self.phase = other;
                return Err(self.wrong_phase("resolve a battle"));
            }
        };
        self.run.pending_enemy = None;

        self.run.player.take_damage(report.damage_taken);
        if report.outcome == BattleOutcome::Defeat || self.run.player.is_dead() {
            self.log.push(ExplorationEvent::BattleLost { room: enemy.room });
            self.finish(RunStatus::Dead);
            return Ok(BattleOutcome::Defeat);
        }

        self.log.push(ExplorationEvent::BattleWon { room: enemy.room });
        self.run.points.add(PointCategory::Combat, enemy.points());
        if enemy.is_boss {
            self.finish(RunStatus::Cleared);
        }
        Ok(BattleOutcome::Victory)
    }

    /// Closes an event or trade sub-state.
    pub fn finish_room(&mut self) -> Result<(), InvalidTransition> {
        self.ensure_in_progress()?;
        match self.phase {
            RoomPhase::Event | RoomPhase::Trade => {
                self.phase = RoomPhase::Completed;
                Ok(())
            }
            _ => Err(self.wrong_phase("finish the room")),
        }
    }

    pub fn exit(&mut self) -> Result<RunStatus, InvalidTransition> {
        self.ensure_in_progress()?;
        self.phase = RoomPhase::Completed;
        self.finish(RunStatus::Exited);
        Ok(self.run.status)
    }

    fn check_move(&self, target: RoomId) -> Result<(), InvalidTransition> {
        self.ensure_in_progress()?;
        if matches!(self.phase, RoomPhase::Battle { .. }) {
            return Err(self.wrong_phase("move"));
        }
        let from = self.run.current_room;
        let current = self.map.room(from).ok_or(InvalidTransition::UnknownRoom(from))?;
        let room = self.map.room(target).ok_or(InvalidTransition::UnknownRoom(target))?;
        if !current.is_adjacent(target) {
            return Err(InvalidTransition::NotAdjacent { from, to: target });
        }
        if room.locked && !self.run.goal.completed {
            return Err(InvalidTransition::Locked(target));
        }
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), InvalidTransition> {
        match self.run.status {
            RunStatus::InProgress => Ok(()),
            status => Err(InvalidTransition::RunOver(status)),
        }
    }

    fn wrong_phase(&self, action: &'static str) -> InvalidTransition {
        InvalidTransition::WrongPhase { action, phase: self.phase.label() }
    }

    fn apply_exhaustion(&mut self) {
        let damage = scale(self.run.player.max_hp, EXHAUSTION_DAMAGE_PCT).max(1);
        self.run.player.take_damage(damage);
        self.run.exhaustion_buff = true;
        self.run.torches.exhaustion_applied = true;
        self.log.push(ExplorationEvent::Exhausted { damage });
        debug!(damage, hp = self.run.player.hp, "torches exhausted");
    }

    fn enter_room(&mut self, id: RoomId) -> RoomPhase {
        let Some(room) = self.map.room(id).cloned() else {
            return RoomPhase::Completed;
        };
        self.run.points.add(PointCategory::Rooms, u32::from(room.threat.level));
        if let Some(item) = &room.goal_item {
            self.collect_goal_item(item);
        }

        match room.kind {
            RoomType::Combat | RoomType::Elite | RoomType::Boss => {
                let enemy = self.spawn_enemy(&room);
                self.log.push(ExplorationEvent::EnemySpawned { room: id, boss: enemy.is_boss });
                self.run.pending_enemy = Some(enemy.clone());
                RoomPhase::Battle { enemy }
            }
            RoomType::Altar => {
                self.pray_at_altar();
                RoomPhase::Completed
            }
            RoomType::Trap => {
                self.spring_trap(&room);
                RoomPhase::Completed
            }
            RoomType::Chest => {
                self.open_chest(&room);
                RoomPhase::Completed
            }
            RoomType::Rest => {
                let amount = self.run.torches.restore(REST_TORCH_RESTORE);
                self.log.push(ExplorationEvent::TorchesRestored { amount });
                RoomPhase::Completed
            }
            RoomType::Merchant => {
                self.log.push(ExplorationEvent::MerchantOpened { room: id });
                RoomPhase::Trade
            }
            RoomType::Start => RoomPhase::Completed,
            RoomType::Event => {
                self.log.push(ExplorationEvent::EventStarted { room: id });
                RoomPhase::Event
            }
        }
    }

    fn collect_goal_item(&mut self, item: &str) {
        let completed_now = self.run.goal.advance();
        self.run.points.add(PointCategory::Goal, 5);
        self.log.push(ExplorationEvent::GoalItemCollected {
            item: item.to_string(),
            current: self.run.goal.current,
            required: self.run.goal.required,
        });
        if completed_now {
            self.log.push(ExplorationEvent::GoalCompleted);
            info!(goal = %self.run.goal.kind, "goal completed");
        }
    }

    fn finish(&mut self, status: RunStatus) {
        self.run.status = status;
        self.run.pending_enemy = None;
        self.run.rewards = match status {
            RunStatus::Cleared | RunStatus::Exited => {
                Some(compute_rewards(&self.run, &self.map, status))
            }
            RunStatus::Dead | RunStatus::InProgress => None,
        };
        self.log.push(ExplorationEvent::RunEnded { status });
        info!(?status, points = self.run.points.total, "run ended");
    }
}
