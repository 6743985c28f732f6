//! Session bridge: current player and leaderboard over a [`KeyValueStore`].
//!
//! The leaderboard is stored as a JSON array of `{name, score}` records under
//! one key, sorted by score descending and capped at `capacity` entries.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::store::KeyValueStore;
use crate::core::error::GameError;

/// Store key for the current player's name.
pub const CURRENT_PLAYER_KEY: &str = "currentPlayer";

/// Store key for the leaderboard record.
pub const LEADERBOARD_KEY: &str = "leaderboard";

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Insert `entry` into a descending list and cut it to `capacity`.
///
/// The sort is stable, so an entry that ties an existing score lands after it.
pub fn insert_ranked(entries: &mut Vec<LeaderboardEntry>, entry: LeaderboardEntry, capacity: usize) {
    entries.push(entry);
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(capacity);
}

/// Reads and writes the player marker and the leaderboard.
#[derive(Clone, Debug)]
pub struct SessionBridge<S> {
    store: S,
    capacity: usize,
}

impl<S: KeyValueStore> SessionBridge<S> {
    /// Wrap `store`, keeping at most `capacity` leaderboard entries.
    pub fn new(store: S, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Name of the player about to play. Blank names count as absent.
    pub fn current_player_name(&self) -> Result<Option<String>, GameError> {
        let name = self.store.get(CURRENT_PLAYER_KEY)?;
        Ok(name.filter(|n| !n.trim().is_empty()))
    }

    /// Record the player name (trimmed). Returns the stored name.
    pub fn set_current_player(&mut self, name: &str) -> Result<String, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        self.store.set(CURRENT_PLAYER_KEY, name)?;
        debug!(player = name, "Current player set");
        Ok(name.to_string())
    }

    /// Forget the current player.
    pub fn clear_current_player(&mut self) -> Result<(), GameError> {
        self.store.remove(CURRENT_PLAYER_KEY)?;
        Ok(())
    }

    /// Current leaderboard, best first. Missing record -> empty.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, GameError> {
        match self.store.get(LEADERBOARD_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(GameError::CorruptLeaderboard),
            None => Ok(Vec::new()),
        }
    }

    /// Add a final score. Returns the updated leaderboard.
    pub fn append_score(&mut self, name: &str, score: u64) -> Result<Vec<LeaderboardEntry>, GameError> {
        let mut entries = self.leaderboard()?;
        insert_ranked(&mut entries, LeaderboardEntry::new(name, score), self.capacity);

        let raw = serde_json::to_string(&entries).map_err(GameError::EncodeLeaderboard)?;
        self.store.set(LEADERBOARD_KEY, &raw)?;

        info!(player = name, score, entries = entries.len(), "Score recorded");
        Ok(entries)
    }

    /// Maximum number of leaderboard entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn scores(entries: &[LeaderboardEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_insert_ranked_drops_lowest() {
        let mut entries: Vec<_> = [500, 400, 300, 200, 100]
            .iter()
            .map(|&s| LeaderboardEntry::new(format!("p{}", s), s))
            .collect();

        insert_ranked(&mut entries, LeaderboardEntry::new("X", 350), 5);

        assert_eq!(scores(&entries), vec![500, 400, 350, 300, 200]);
        assert_eq!(entries[2].name, "X");
    }

    #[test]
    fn test_insert_ranked_tie_goes_after_existing() {
        let mut entries = vec![LeaderboardEntry::new("first", 300)];
        insert_ranked(&mut entries, LeaderboardEntry::new("second", 300), 5);
        assert_eq!(entries[0].name, "first");
        assert_eq!(entries[1].name, "second");
    }

    #[test]
    fn test_insert_ranked_below_full_board_is_dropped() {
        let mut entries: Vec<_> = (1..=5).map(|s| LeaderboardEntry::new("p", s * 100)).collect();
        insert_ranked(&mut entries, LeaderboardEntry::new("low", 50), 5);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.name != "low"));
    }

    #[test]
    fn test_current_player_round_trip() {
        let mut bridge = SessionBridge::new(MemoryStore::new(), 5);
        assert_eq!(bridge.current_player_name().unwrap(), None);

        assert_eq!(bridge.set_current_player("  Aiko ").unwrap(), "Aiko");
        assert_eq!(bridge.current_player_name().unwrap().as_deref(), Some("Aiko"));

        bridge.clear_current_player().unwrap();
        assert_eq!(bridge.current_player_name().unwrap(), None);
    }

    #[test]
    fn test_blank_player_name() {
        let mut bridge = SessionBridge::new(MemoryStore::new(), 5);
        assert!(matches!(
            bridge.set_current_player("   "),
            Err(GameError::EmptyPlayerName)
        ));

        let bridge = SessionBridge::new(MemoryStore::new().with_entry(CURRENT_PLAYER_KEY, " "), 5);
        assert_eq!(bridge.current_player_name().unwrap(), None);
    }

    #[test]
    fn test_append_score_persists_json() {
        let mut bridge = SessionBridge::new(MemoryStore::new(), 5);
        bridge.append_score("A", 100).unwrap();
        bridge.append_score("B", 300).unwrap();

        let raw = bridge.store().get(LEADERBOARD_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"name":"B","score":300},{"name":"A","score":100}]"#);
        assert_eq!(scores(&bridge.leaderboard().unwrap()), vec![300, 100]);
    }

    #[test]
    fn test_corrupt_leaderboard() {
        let store = MemoryStore::new().with_entry(LEADERBOARD_KEY, "not json");
        let mut bridge = SessionBridge::new(store, 5);
        assert!(matches!(bridge.leaderboard(), Err(GameError::CorruptLeaderboard(_))));
        assert!(matches!(
            bridge.append_score("A", 1),
            Err(GameError::CorruptLeaderboard(_))
        ));
    }

    #[test]
    fn test_encode_failure_is_not_corruption() {
        let err = serde_json::from_str::<u64>("x").unwrap_err();
        let err = GameError::EncodeLeaderboard(err);
        assert!(err.to_string().starts_with("failed to encode leaderboard"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
