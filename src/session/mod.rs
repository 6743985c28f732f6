//! Sessions: progression, persistence and the renderer snapshot.
//!
//! ## Key Types
//!
//! - `GameSession`: Drives one player's game from level 1 round 1 to the end
//! - `GameSessionBuilder`: Settings, symbol pool, seed and resume point
//! - `SessionEvent`: What happened while the clock advanced
//! - `SessionBridge`: Current player and leaderboard over a `KeyValueStore`
//! - `SessionView`: Read-only snapshot for a renderer

pub mod bridge;
pub mod controller;
pub mod events;
pub mod store;
pub mod view;

pub use bridge::{insert_ranked, LeaderboardEntry, SessionBridge, CURRENT_PLAYER_KEY, LEADERBOARD_KEY};
pub use controller::{GameSession, GameSessionBuilder, ResumePoint};
pub use events::SessionEvent;
pub use store::{KeyValueStore, MemoryStore};
pub use view::{format_clock, CardView, SessionView};
