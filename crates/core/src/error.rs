use thiserror::Error;

use crate::types::RoomId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse dungeon config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("room count {room_count} is below the minimum of {minimum}")]
    TooFewRooms { room_count: usize, minimum: usize },
    #[error("unknown goal type '{0}'")]
    UnknownGoalType(String),
    /// Breadth-first search from the start room missed some rooms; always a generator bug.
    #[error("room graph is disconnected: {unreachable:?} unreachable from the start room")]
    Disconnected { unreachable: Vec<RoomId> },
}
