//! Level catalog: level number -> grid size, pair count and round duration.
//!
//! The catalog is validated once on construction and is immutable after that.
//! Levels are numbered contiguously from 1, and every grid holds exactly
//! `2 * pair_count` cards.

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Configuration for a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level number (starts at 1).
    pub level: u32,

    /// Grid rows.
    pub rows: u32,

    /// Grid columns.
    pub cols: u32,

    /// Number of pairs dealt per round.
    pub pair_count: u32,

    /// Round duration in seconds.
    pub round_seconds: u32,
}

impl LevelConfig {
    /// Create a level configuration.
    #[must_use]
    pub const fn new(level: u32, rows: u32, cols: u32, pair_count: u32, round_seconds: u32) -> Self {
        Self {
            level,
            rows,
            cols,
            pair_count,
            round_seconds,
        }
    }

    /// Total number of cards on the grid.
    #[must_use]
    pub const fn card_count(&self) -> usize {
        (self.pair_count as usize) * 2
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 || self.pair_count == 0 || self.round_seconds == 0 {
            return Err(GameError::invalid_catalog(format!(
                "level {} has a zero dimension, pair count or duration",
                self.level
            )));
        }
        if u64::from(self.rows) * u64::from(self.cols) != u64::from(self.pair_count) * 2 {
            return Err(GameError::invalid_catalog(format!(
                "level {}: {}x{} grid cannot hold {} pairs",
                self.level, self.rows, self.cols, self.pair_count
            )));
        }
        Ok(())
    }
}

/// Built-in levels.
pub const DEFAULT_LEVELS: [LevelConfig; 3] = [
    LevelConfig::new(1, 2, 3, 3, 30),
    LevelConfig::new(2, 3, 4, 6, 45),
    LevelConfig::new(3, 4, 5, 10, 60),
];

/// Validated, ordered set of levels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

#[derive(Deserialize)]
struct CatalogFile {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Build a catalog, rejecting gaps, zero sizes and grids that don't fit the pairs.
    pub fn new(mut levels: Vec<LevelConfig>) -> Result<Self, GameError> {
        if levels.is_empty() {
            return Err(GameError::invalid_catalog("catalog defines no levels"));
        }

        levels.sort_by_key(|l| l.level);
        for (idx, config) in levels.iter().enumerate() {
            let expected = idx as u32 + 1;
            if config.level != expected {
                return Err(GameError::invalid_catalog(format!(
                    "levels must be numbered 1..=n without gaps; expected level {}, found {}",
                    expected, config.level
                )));
            }
            config.validate()?;
        }

        Ok(Self { levels })
    }

    /// Parse a catalog from a TOML document with a `[[levels]]` array.
    pub fn from_toml_str(raw: &str) -> Result<Self, GameError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.levels)
    }

    /// Look up a level.
    pub fn config_for(&self, level: u32) -> Result<&LevelConfig, GameError> {
        level
            .checked_sub(1)
            .and_then(|idx| self.levels.get(idx as usize))
            .ok_or(GameError::InvalidLevel {
                level,
                max: self.max_level(),
            })
    }

    /// Highest defined level.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// All levels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for LevelCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let levels = Vec::<LevelConfig>::deserialize(deserializer)?;
        LevelCatalog::new(levels).map_err(serde::de::Error::custom)
    }
}
