//! Core types: RNG, configuration, level catalog, errors, session state.
//!
//! Nothing here knows about cards or timers; the rest of the crate builds on
//! these.

pub mod catalog;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use catalog::{LevelCatalog, LevelConfig, DEFAULT_LEVELS};
pub use config::{GameSettings, SessionConfig};
pub use error::{GameError, StoreError};
pub use rng::GameRng;
pub use state::{Phase, SessionState};
