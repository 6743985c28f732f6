//! Events reported while the session clock advances.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Something that happened during [`GameSession::advance_by`](super::GameSession::advance_by).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Preview ended: cards are face-down and the round timer is running.
    PlayStarted { level: u32, round: u32 },

    /// The round timer counted down one second.
    Ticked { remaining: u32 },

    /// A pending pair was marked matched.
    PairMatched {
        first: CardId,
        second: CardId,
        points: u64,
        score: u64,
    },

    /// A pending mismatched pair was turned face-down.
    PairHidden { first: CardId, second: CardId },

    /// Every pair of the round is matched.
    RoundComplete { level: u32, round: u32 },

    /// The round timer ran out.
    TimeUp { level: u32, round: u32 },
}
