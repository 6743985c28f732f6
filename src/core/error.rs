//! Error taxonomy.
//!
//! Everything here is a configuration or programming error that should
//! abort a session start, plus the failures surfaced by the injected
//! key-value store. A rejected flip is not an error; see
//! [`FlipResult`](crate::rules::FlipResult).

use thiserror::Error;

use super::state::Phase;

/// Failure reported by a [`KeyValueStore`](crate::session::KeyValueStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("failed to write key {key}: {message}")]
    Write { key: String, message: String },
}

/// Errors raised by the game core.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("level {level} is not defined (levels 1..={max})")]
    InvalidLevel { level: u32, max: u32 },

    #[error("symbol pool has {available} symbols but {required} pairs are required")]
    InsufficientSymbols { required: usize, available: usize },

    #[error("invalid game configuration: {reason}")]
    InvalidCatalog { reason: String },

    #[error("no current player is set")]
    NoCurrentPlayer,

    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("command `{command}` is not valid in phase {phase:?}")]
    InvalidCommand { command: &'static str, phase: Phase },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("leaderboard record is corrupt: {0}")]
    CorruptLeaderboard(#[source] serde_json::Error),

    #[error("failed to encode leaderboard: {0}")]
    EncodeLeaderboard(#[source] serde_json::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl GameError {
    pub(crate) fn invalid_catalog(reason: impl Into<String>) -> Self {
        GameError::InvalidCatalog {
            reason: reason.into(),
        }
    }
}
