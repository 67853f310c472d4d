//! Shared plumbing for the `generate` and `walk` binaries.

use std::fs;
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::ValueEnum;
use dungeon_core::{
    BattleOutcome, BattleReport, CombatResolver, Difficulty, DungeonConfig, EnemyStatBlock,
    PlayerVitals, mix_seed_stream,
};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Round cap for a simulated fight; a stalemate counts as a defeat.
const MAX_BATTLE_ROUNDS: u32 = 200;

pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    // A second init in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Normal,
    Heroic,
    Mythic,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Heroic => Difficulty::Heroic,
            DifficultyArg::Mythic => Difficulty::Mythic,
        }
    }
}

/// Reads a TOML config from `path`, or the built-in defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<DungeonConfig> {
    let Some(path) = path else {
        return Ok(DungeonConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    DungeonConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid dungeon config in {}", path.display()))
}

/// Stream tag separating launch seeds from the core's own sub-streams.
const LAUNCH_SEED_STREAM: u64 = 0x5EED;

static LAUNCHES: AtomicU64 = AtomicU64::new(0);

/// Fresh map seed for runs launched without `--seed`, from the clock, pid and a launch count.
pub fn generate_runtime_seed() -> u32 {
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let launch = LAUNCHES.fetch_add(1, Ordering::Relaxed);
    let entropy = clock ^ (u64::from(process::id()) << 32) ^ launch;
    let mixed = mix_seed_stream(entropy, LAUNCH_SEED_STREAM);
    (mixed >> 32) as u32 ^ mixed as u32
}

/// Trades blows round by round with a ±20% swing on every hit.
pub struct SimulatedCombat {
    rng: ChaCha8Rng,
}

impl SimulatedCombat {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    fn hit(&mut self, attack: i32, defense: i32) -> i64 {
        let swing = 80 + (self.rng.next_u64() % 41) as i64;
        ((i64::from(attack) - i64::from(defense)).max(1) * swing / 100).max(1)
    }
}

impl CombatResolver for SimulatedCombat {
    fn resolve(&mut self, player: &PlayerVitals, enemy: &EnemyStatBlock) -> BattleReport {
        let mut player_hp = i64::from(player.hp);
        let mut enemy_hp = i64::from(enemy.hp);
        let mut outcome = BattleOutcome::Defeat;
        for _ in 0..MAX_BATTLE_ROUNDS {
            enemy_hp -= self.hit(player.attack, enemy.defense);
            if enemy_hp <= 0 {
                outcome = BattleOutcome::Victory;
                break;
            }
            player_hp -= self.hit(enemy.attack, player.defense);
            if player_hp <= 0 {
                break;
            }
        }
        let damage = i64::from(player.hp) - player_hp;
        BattleReport { outcome, damage_taken: i32::try_from(damage).unwrap_or(i32::MAX) }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Write;

    use dungeon_core::RoomId;
    use tempfile::NamedTempFile;

    use super::*;

    fn brute(hp: i32, attack: i32) -> EnemyStatBlock {
        EnemyStatBlock {
            name: "Test Brute".to_string(),
            room: RoomId(1),
            is_boss: false,
            is_elite: false,
            hp,
            attack,
            defense: 0,
            level: 1,
        }
    }

    #[test]
    fn load_config_reads_toml_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "room_count = 15\ngoal_type = \"elite_hunt\"\ndifficulty = \"mythic\"")
            .expect("write config");

        let config = load_config(Some(file.path())).expect("valid config");
        assert_eq!(config.room_count, 15);
        assert_eq!(config.goal_type, "elite_hunt");
        assert_eq!(config.difficulty, Difficulty::Mythic);
        assert_eq!(config.affix_count, DungeonConfig::default().affix_count);
    }

    #[test]
    fn load_config_without_path_uses_defaults() {
        assert_eq!(load_config(None).expect("defaults"), DungeonConfig::default());
    }

    #[test]
    fn load_config_reports_bad_toml() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "room_count = \"many\"").expect("write config");
        let error = load_config(Some(file.path())).expect_err("room_count must be a number");
        assert!(format!("{error:#}").contains("Invalid dungeon config"));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn runtime_seeds_differ_between_launches() {
        let seeds: Vec<u32> = (0..8).map(|_| generate_runtime_seed()).collect();
        let distinct: BTreeSet<u32> = seeds.iter().copied().collect();
        assert!(distinct.len() > 1, "launch counter should vary the seed: {seeds:?}");
    }

    #[test]
    fn simulated_combat_survives_extreme_stats() {
        let player = PlayerVitals::for_level(u32::MAX);
        let report = SimulatedCombat::new(3).resolve(&player, &brute(i32::MAX, i32::MAX));
        assert!(report.damage_taken >= 0);
    }

    #[test]
    fn simulated_combat_is_reproducible() {
        let player = PlayerVitals::for_level(3);
        let enemy = brute(60, 12);
        let first = SimulatedCombat::new(9).resolve(&player, &enemy);
        let second = SimulatedCombat::new(9).resolve(&player, &enemy);
        assert_eq!(first, second);
    }

    #[test]
    fn simulated_combat_crushes_weak_enemies_and_loses_to_giants() {
        let player = PlayerVitals::for_level(1);
        let weak = SimulatedCombat::new(1).resolve(&player, &brute(1, 1));
        assert_eq!(weak.outcome, BattleOutcome::Victory);
        assert_eq!(weak.damage_taken, 0);

        let giant = SimulatedCombat::new(1).resolve(&player, &brute(10_000, 500));
        assert_eq!(giant.outcome, BattleOutcome::Defeat);
        assert!(giant.damage_taken >= player.hp);
    }
}
