//! Final reward computation for terminal run states.

use crate::mapgen::DungeonMap;
use crate::state::{ActiveRun, RunRewards, RunStatus};

const GOLD_PER_POINT: u32 = 5;
const EXPERIENCE_PER_POINT: u32 = 10;
const GOLD_PER_TORCH: u32 = 10;
const CLEAR_EXPERIENCE_PER_LEVEL: u32 = 50;

/// Rewards for a run ending with `status`: full on a clear, half on exit, none on death.
pub fn compute_rewards(run: &ActiveRun, map: &DungeonMap, status: RunStatus) -> RunRewards {
    let difficulty_pct = map.difficulty.scaling_pct();
    let points = run.points.total;
    let items = run.inventory.values().cloned().collect();

    match status {
        RunStatus::Cleared => {
            let bonus = points
                .saturating_mul(GOLD_PER_POINT)
                .saturating_add(run.torches.current.saturating_mul(GOLD_PER_TORCH));
            let experience = points
                .saturating_mul(EXPERIENCE_PER_POINT)
                .saturating_add(map.level.max(1).saturating_mul(CLEAR_EXPERIENCE_PER_LEVEL));
            RunRewards {
                gold: run.gold.saturating_add(percent(bonus, difficulty_pct)),
                experience: percent(experience, difficulty_pct),
                items,
            }
        }
        RunStatus::Exited => {
            let bonus = percent(points.saturating_mul(GOLD_PER_POINT), difficulty_pct);
            RunRewards {
                gold: run.gold.saturating_add(bonus) / 2,
                experience: percent(points.saturating_mul(EXPERIENCE_PER_POINT), difficulty_pct)
                    / 2,
                items,
            }
        }
        RunStatus::Dead | RunStatus::InProgress => RunRewards::default(),
    }
}

fn percent(value: u32, pct: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(pct) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
