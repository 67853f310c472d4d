//! Non-combat room effects: altars, traps and chests.

use super::encounters::scale;
use super::*;
use crate::state::LootItem;

const ALTAR_HEAL_PCT: u32 = 25;
const TRAP_BASE_DAMAGE: i32 = 6;
const TRAP_DAMAGE_PER_DEPTH: i32 = 2;
const CHEST_BASE_GOLD: u32 = 10;
const CHEST_GOLD_PER_DEPTH: u32 = 5;

/// Probability of slipping past a trap for the given dexterity.
pub fn trap_avoid_chance(dexterity: u32) -> f64 {
    (0.15 + f64::from(dexterity) * 0.02).clamp(0.05, 0.75)
}

impl Expedition {
    pub(super) fn pray_at_altar(&mut self) {
        let blessed = self.affix_pct(|kind| match kind {
            AffixKind::Blessed { healing_pct } => Some(healing_pct),
            _ => None,
        });
        let base = scale(self.run.player.max_hp, ALTAR_HEAL_PCT);
        let amount = self.run.player.heal(scale(base, 100_u32.saturating_add(blessed)));
        self.log.push(ExplorationEvent::Healed { amount });
    }

    pub(super) fn spring_trap(&mut self, room: &Room) {
        let chance = trap_avoid_chance(self.run.player.dexterity);
        if self.source.chance(chance) {
            self.run.points.add(PointCategory::Hazards, 2);
            self.log.push(ExplorationEvent::TrapAvoided { room: room.id });
            return;
        }

        let raw = TRAP_BASE_DAMAGE + TRAP_DAMAGE_PER_DEPTH * room.distance_from_start as i32;
        let damage = scale(raw, self.map.difficulty.scaling_pct());
        self.run.player.take_damage(damage);
        self.log.push(ExplorationEvent::TrapTriggered { room: room.id, damage });
        if self.run.player.is_dead() {
            self.finish(RunStatus::Dead);
        }
    }

    pub(super) fn open_chest(&mut self, room: &Room) {
        let bountiful = self.affix_pct(|kind| match kind {
            AffixKind::Bountiful { gold_pct } => Some(gold_pct),
            _ => None,
        });
        let base = (CHEST_BASE_GOLD + CHEST_GOLD_PER_DEPTH * room.distance_from_start) as i32;
        let swing = self.source.range_inclusive(80, 120);
        let gold = scale(scale(base, 100_u32.saturating_add(bountiful)), swing).max(1) as u32;
        self.run.gold = self.run.gold.saturating_add(gold);

        let roll = self.source.next_f64();
        let item_count = if roll < 0.5 {
            0
        } else if roll < 0.85 {
            1
        } else {
            2
        };
        let mut found = 0;
        for _ in 0..item_count {
            if self.loot_table.is_empty() {
                break;
            }
            let entry = self.loot_table[self.source.index(self.loot_table.len())];
            let value = scale(entry.value as i32, 100_u32.saturating_add(bountiful)).max(0) as u32;
            self.run.inventory.insert(LootItem {
                name: entry.name.to_string(),
                value,
                found_in: room.id,
            });
            found += 1;
        }

        self.run.points.add(PointCategory::Treasure, 1 + found as u32);
        self.log.push(ExplorationEvent::LootFound { gold, items: found });
    }
}

#[cfg(test)]
mod tests {
    use super::trap_avoid_chance;

    #[test]
    fn trap_avoid_chance_grows_with_dexterity_and_is_clamped() {
        assert!(trap_avoid_chance(5) < trap_avoid_chance(15));
        assert!((trap_avoid_chance(0) - 0.15).abs() < f64::EPSILON);
        assert!((trap_avoid_chance(1_000) - 0.75).abs() < f64::EPSILON);
    }
}
