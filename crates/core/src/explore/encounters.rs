//! Enemy stat blocks scaled by depth, difficulty, player level and affixes.

use serde::{Deserialize, Serialize};

use super::*;

/// Extra enemy damage owed to the first encounter after the torches ran out.
const EXHAUSTION_ENEMY_DAMAGE_PCT: u32 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStatBlock {
    pub name: String,
    pub room: RoomId,
    pub is_boss: bool,
    pub is_elite: bool,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub level: u32,
}

impl EnemyStatBlock {
    pub(super) fn points(&self) -> u32 {
        if self.is_boss {
            10
        } else if self.is_elite {
            5
        } else {
            3
        }
    }
}

struct BaseEnemy {
    name: &'static str,
    hp: i32,
    attack: i32,
    defense: i32,
}

fn base_enemy(kind: RoomType) -> BaseEnemy {
    match kind {
        RoomType::Boss => BaseEnemy { name: "Dungeon Guardian", hp: 160, attack: 16, defense: 6 },
        RoomType::Elite => BaseEnemy { name: "Elite Champion", hp: 70, attack: 12, defense: 4 },
        _ => BaseEnemy { name: "Dungeon Brute", hp: 40, attack: 8, defense: 2 },
    }
}

/// `value * pct / 100`, saturating at the `i32` bounds.
pub(super) fn scale(value: i32, pct: u32) -> i32 {
    let scaled = i64::from(value).saturating_mul(i64::from(pct)) / 100;
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Expedition {
    pub(super) fn spawn_enemy(&mut self, room: &Room) -> EnemyStatBlock {
        let base = base_enemy(room.kind);
        let depth_pct = room.distance_from_start.saturating_mul(10).saturating_add(100);
        let level_pct = self.map.level.saturating_sub(1).saturating_mul(5).saturating_add(100);
        let difficulty_pct = self.map.difficulty.scaling_pct();

        let health_pct = 100_u32.saturating_add(self.affix_pct(|kind| match kind {
            AffixKind::Fortified { enemy_health_pct } => Some(enemy_health_pct),
            _ => None,
        }));
        let mut damage_pct = 100_u32.saturating_add(self.affix_pct(|kind| match kind {
            AffixKind::Frenzied { enemy_damage_pct } => Some(enemy_damage_pct),
            _ => None,
        }));
        if mem::take(&mut self.run.exhaustion_buff) {
            damage_pct = damage_pct.saturating_add(EXHAUSTION_ENEMY_DAMAGE_PCT);
        }

        let common = |value: i32| scale(scale(scale(value, depth_pct), level_pct), difficulty_pct);
        EnemyStatBlock {
            name: base.name.to_string(),
            room: room.id,
            is_boss: room.kind == RoomType::Boss,
            is_elite: room.kind == RoomType::Elite,
            hp: scale(common(base.hp), health_pct).max(1),
            attack: scale(common(base.attack), damage_pct).max(1),
            defense: common(base.defense),
            level: self.map.level.saturating_add(room.distance_from_start / 2),
        }
    }

    /// Sum of the magnitudes `select` extracts from the run's affixes.
    pub(super) fn affix_pct(&self, select: impl Fn(AffixKind) -> Option<u32>) -> u32 {
        self.run.affixes.iter().filter_map(|affix| select(affix.kind)).fold(0, u32::saturating_add)
    }
}
