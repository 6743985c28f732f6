//! Shared helpers for integration tests.
//!
//! Logging follows `TEST_LOG`, then `RUST_LOG`, then `"warn"`:
//!
//! ```bash
//! TEST_LOG=debug cargo test --test match_tests
//! ```

#![allow(dead_code)]

use std::time::Duration;

use memory_match::session::CURRENT_PLAYER_KEY;
use memory_match::{
    CardId, FlipResult, GameSession, GameSessionBuilder, KeyValueStore, MemoryStore, Phase,
};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize test logging once per test binary.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub const PLAYER: &str = "Aiko";

/// A store with the current player set.
pub fn player_store() -> MemoryStore {
    MemoryStore::new().with_entry(CURRENT_PLAYER_KEY, PLAYER)
}

/// Start a default session with a fixed seed.
pub fn start_session(seed: u64) -> GameSession<MemoryStore> {
    init_logging();
    GameSessionBuilder::new()
        .seed(seed)
        .start(player_store())
        .expect("session should start")
}

/// Run the preview to its end.
pub fn skip_preview<S: KeyValueStore>(session: &mut GameSession<S>) {
    let wait = Duration::from_millis(session.settings().session.preview_ms);
    session.advance_by(wait);
    assert_eq!(session.phase(), Phase::Playing);
}

/// Two unmatched cards with the same symbol.
pub fn find_pair<S: KeyValueStore>(session: &GameSession<S>) -> (CardId, CardId) {
    let open: Vec<_> = session.cards().iter().filter(|c| !c.is_matched()).collect();
    for (i, a) in open.iter().enumerate() {
        if let Some(b) = open[i + 1..].iter().find(|b| b.symbol == a.symbol) {
            return (a.id, b.id);
        }
    }
    panic!("no unmatched pair left");
}

/// Two unmatched cards with different symbols.
pub fn find_mismatch<S: KeyValueStore>(session: &GameSession<S>) -> (CardId, CardId) {
    let open: Vec<_> = session.cards().iter().filter(|c| !c.is_matched()).collect();
    let first = open[0];
    let second = open
        .iter()
        .find(|c| c.symbol != first.symbol)
        .expect("at least two symbols left");
    (first.id, second.id)
}

/// Card ids showing `symbol`.
pub fn cards_with_symbol<S: KeyValueStore>(session: &GameSession<S>, symbol: &str) -> Vec<CardId> {
    session
        .cards()
        .iter()
        .filter(|c| c.symbol.as_str() == symbol)
        .map(|c| c.id)
        .collect()
}

/// Match every pair of a round that is already in play.
pub fn match_all<S: KeyValueStore>(session: &mut GameSession<S>) {
    let reveal = Duration::from_millis(session.settings().session.match_reveal_ms);
    while session.phase() == Phase::Playing {
        let (a, b) = find_pair(session);
        assert_eq!(session.flip(a), FlipResult::Revealed);
        assert!(matches!(session.flip(b), FlipResult::Matched(_)));
        session.advance_by(reveal);
    }
}

/// Preview then match everything: the round ends in RoundComplete.
pub fn clear_round<S: KeyValueStore>(session: &mut GameSession<S>) {
    skip_preview(session);
    match_all(session);
    assert_eq!(session.phase(), Phase::RoundComplete);
}

/// Let the round clock run out.
pub fn run_out_clock<S: KeyValueStore>(session: &mut GameSession<S>) {
    let seconds = u64::from(session.time_remaining());
    session.advance_by(Duration::from_secs(seconds));
    assert_eq!(session.phase(), Phase::TimeUp);
}
