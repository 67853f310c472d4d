//! Procedural dungeon generation split into one submodule per pipeline phase.

pub mod goals;
pub mod model;
pub mod threat;

mod affixes;
mod gate;
mod generator;
mod graph;
mod room_types;

pub use generator::DungeonGenerator;
pub use model::{
    AffixKind, DungeonAffix, DungeonGoal, DungeonMap, GenerationWarning, Room, Threat,
};

use crate::config::DungeonConfig;
use crate::content::ContentPack;
use crate::error::GenerationError;

pub fn generate_dungeon(
    content: &ContentPack,
    config: &DungeonConfig,
    seed: u32,
) -> Result<DungeonMap, GenerationError> {
    DungeonGenerator::new(content, config).generate(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_dungeon_matches_generator_output() {
        let content = ContentPack::default();
        let config = DungeonConfig::default();

        let from_helper = generate_dungeon(&content, &config, 123).expect("valid config");
        let from_generator =
            DungeonGenerator::new(&content, &config).generate(123).expect("valid config");

        assert_eq!(from_helper, from_generator);
    }
}
