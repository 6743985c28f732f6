//! # memory-match
//!
//! Core of a timed memory-matching card game: pairs of face-down cards, a
//! per-round countdown, three rounds per level and a persistent leaderboard.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven Time**: Nothing sleeps. The host calls
//!    `GameSession::advance_by` and every due callback runs in order on a
//!    virtual clock, so tests are deterministic.
//!
//! 2. **Generation-Tagged Callbacks**: Each round start cancels every pending
//!    callback and bumps a generation counter. A callback from an older round
//!    is dropped even if it slipped through.
//!
//! 3. **Injected Persistence**: The player name and leaderboard go through a
//!    `KeyValueStore` the host supplies.
//!
//! ## Modules
//!
//! - `core`: Level catalog, settings, phases, errors, RNG
//! - `cards`: Card identifiers, symbols and deck generation
//! - `rules`: Flip acceptance, pair resolution and scoring
//! - `timing`: Virtual-clock scheduler and round countdown
//! - `session`: Progression controller, session bridge and view snapshot

pub mod cards;
pub mod core;
pub mod rules;
pub mod session;
pub mod timing;

// Re-export commonly used types
pub use crate::core::{
    GameError, GameRng, GameSettings, LevelCatalog, LevelConfig, Phase, SessionConfig,
    SessionState, StoreError, DEFAULT_LEVELS,
};

pub use crate::cards::{Card, CardId, DeckGenerator, Symbol, SymbolPool, DEFAULT_SYMBOLS};

pub use crate::rules::{FlipResult, MatchEngine, PendingPair, RejectReason, Resolution};

pub use crate::timing::{RoundTimer, Scheduler, TimerEvent};

pub use crate::session::{
    CardView, GameSession, GameSessionBuilder, KeyValueStore, LeaderboardEntry, MemoryStore,
    ResumePoint, SessionBridge, SessionEvent, SessionView,
};
