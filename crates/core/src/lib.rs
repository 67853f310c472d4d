pub mod config;
pub mod content;
pub mod error;
pub mod explore;
pub mod mapgen;
pub mod rng;
pub mod state;
pub mod types;

pub use config::DungeonConfig;
pub use content::ContentPack;
pub use error::{ConfigError, GenerationError};
pub use explore::{
    BattleOutcome, BattleReport, CombatResolver, EnemyStatBlock, Expedition, ExplorationEvent,
    InvalidTransition, RoomPhase,
};
pub use mapgen::{DungeonGenerator, DungeonMap, generate_dungeon};
pub use rng::{SeededRandomSource, mix_seed_stream};
pub use state::{ActiveRun, PlayerVitals, RunRewards, RunStatus};
pub use types::*;
