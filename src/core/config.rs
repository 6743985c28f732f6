//! Session configuration.
//!
//! - `SessionConfig`: timing and scoring constants
//! - `GameSettings`: `SessionConfig` plus the `LevelCatalog`, loadable from one
//!   TOML document
//!
//! Every field has a default, so a TOML file only needs the values it overrides:
//!
//! ```
//! use memory_match::core::GameSettings;
//!
//! let settings = GameSettings::from_toml_str(r#"
//!     [session]
//!     preview_ms = 1500
//! "#).unwrap();
//!
//! assert_eq!(settings.session.preview_ms, 1500);
//! assert_eq!(settings.session.match_reveal_ms, 500);
//! assert_eq!(settings.levels.max_level(), 3);
//! ```

use serde::{Deserialize, Serialize};

use super::catalog::{LevelCatalog, LevelConfig};
use super::error::GameError;

/// Timing and scoring constants for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long every card is shown before play begins.
    pub preview_ms: u64,

    /// Delay before a matched pair is marked matched.
    pub match_reveal_ms: u64,

    /// Delay before a mismatched pair is turned back face-down.
    pub mismatch_reveal_ms: u64,

    /// Round timer period. One tick removes one second from the clock.
    pub tick_ms: u64,

    /// Rounds played per level.
    pub rounds_per_level: u32,

    /// Points per match, multiplied by the level number.
    pub points_per_level: u64,

    /// Entries kept on the leaderboard.
    pub leaderboard_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_ms: 3000,
            match_reveal_ms: 500,
            mismatch_reveal_ms: 1000,
            tick_ms: 1000,
            rounds_per_level: 3,
            points_per_level: 100,
            leaderboard_capacity: 5,
        }
    }
}

impl SessionConfig {
    /// Set the preview duration.
    #[must_use]
    pub fn with_preview_ms(mut self, ms: u64) -> Self {
        self.preview_ms = ms;
        self
    }

    /// Set the match and mismatch reveal delays.
    #[must_use]
    pub fn with_reveal_ms(mut self, match_ms: u64, mismatch_ms: u64) -> Self {
        self.match_reveal_ms = match_ms;
        self.mismatch_reveal_ms = mismatch_ms;
        self
    }

    /// Set the number of rounds per level.
    #[must_use]
    pub fn with_rounds_per_level(mut self, rounds: u32) -> Self {
        self.rounds_per_level = rounds;
        self
    }

    /// Set the leaderboard size.
    #[must_use]
    pub fn with_leaderboard_capacity(mut self, capacity: usize) -> Self {
        self.leaderboard_capacity = capacity;
        self
    }

    /// Points awarded for one match on `level`.
    #[must_use]
    pub fn points_for_match(&self, level: u32) -> u64 {
        u64::from(level) * self.points_per_level
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_ms == 0 {
            return Err(GameError::invalid_catalog("tick_ms must be positive"));
        }
        if self.rounds_per_level == 0 {
            return Err(GameError::invalid_catalog("rounds_per_level must be positive"));
        }
        if self.leaderboard_capacity == 0 {
            return Err(GameError::invalid_catalog("leaderboard_capacity must be positive"));
        }
        Ok(())
    }
}

/// Complete game settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Timing and scoring.
    pub session: SessionConfig,

    /// Level definitions. Omitted -> built-in levels.
    pub levels: LevelCatalog,
}

/// Raw TOML layout; levels are validated after parsing.
#[derive(Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    session: SessionConfig,
    levels: Option<Vec<LevelConfig>>,
}

impl GameSettings {
    /// Parse and validate settings from TOML.
    ///
    /// Syntax errors are `Config`; a catalog or session that parses but breaks
    /// a rule is `InvalidCatalog`.
    pub fn from_toml_str(raw: &str) -> Result<Self, GameError> {
        let file: SettingsFile = toml::from_str(raw)?;
        file.session.validate()?;

        let levels = match file.levels {
            Some(levels) => LevelCatalog::new(levels)?,
            None => LevelCatalog::default(),
        };
        Ok(Self {
            session: file.session,
            levels,
        })
    }
}
