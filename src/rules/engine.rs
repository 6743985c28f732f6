//! Match engine: flips, the pending pair, match/mismatch resolution, scoring.
//!
//! ## Flip lifecycle
//!
//! 1. `flip` turns a face-down card up and records it in `pending`.
//! 2. The second accepted flip completes the pair. `flip` reports `Matched` or
//!    `Mismatched` immediately, but the board doesn't change yet: the caller
//!    schedules `resolve` after the reveal delay.
//! 3. While two cards are pending every flip is rejected.
//! 4. `resolve` re-checks that the pair is still the pending one, then marks it
//!    matched (scoring `points_per_match`) or turns it back face-down.
//!
//! Score is carried across deals; everything else is replaced by `deal`.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::{Card, CardId};
use crate::core::state::Phase;

/// Why a flip was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The round is not in the Playing phase.
    NotPlaying,
    /// The round clock has run out.
    TimeExpired,
    /// No card with that id in this round.
    UnknownCard,
    /// The card is already matched.
    AlreadyMatched,
    /// The card is already face-up.
    AlreadyFaceUp,
    /// Two cards are face-up and waiting to be resolved.
    PairPending,
}

/// Two face-up cards awaiting resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingPair {
    pub first: CardId,
    pub second: CardId,
    pub is_match: bool,
}

/// Outcome of a flip request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipResult {
    /// Nothing changed.
    Rejected(RejectReason),
    /// First card of a pair is now face-up.
    Revealed,
    /// Second card completed a matching pair; resolution is pending.
    Matched(PendingPair),
    /// Second card completed a non-matching pair; resolution is pending.
    Mismatched(PendingPair),
}

impl FlipResult {
    /// Was the flip refused?
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, FlipResult::Rejected(_))
    }

    /// The pair to resolve, if this flip completed one.
    #[must_use]
    pub fn pending_pair(&self) -> Option<PendingPair> {
        match self {
            FlipResult::Matched(pair) | FlipResult::Mismatched(pair) => Some(*pair),
            _ => None,
        }
    }
}

/// Result of resolving a pending pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Both cards are now matched.
    Matched { points: u64 },
    /// Both cards are face-down again.
    Hidden,
    /// The pair is no longer pending; nothing changed.
    Stale,
}

/// Owns the card set, the pending pair and the score.
#[derive(Clone, Debug, Default)]
pub struct MatchEngine {
    /// Cards in grid order (row-major).
    cards: Vector<Card>,

    /// Card id -> position in `cards`.
    index: FxHashMap<CardId, usize>,

    /// Face-up, unmatched cards in flip order. At most two.
    pending: SmallVec<[CardId; 2]>,

    matched_pairs: u32,
    pair_count: u32,
    score: u64,
    points_per_match: u64,
}

impl MatchEngine {
    /// Create an empty engine with a starting score.
    #[must_use]
    pub fn new(score: u64) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    /// Replace the board with a freshly dealt round.
    ///
    /// Discards the previous cards and pending pair and resets `matched_pairs`.
    /// The score is kept.
    pub fn deal(&mut self, cards: Vec<Card>, pair_count: u32, points_per_match: u64) {
        self.index = cards
            .iter()
            .enumerate()
            .map(|(pos, card)| (card.id, pos))
            .collect();
        self.cards = cards.into_iter().collect();
        self.pending.clear();
        self.matched_pairs = 0;
        self.pair_count = pair_count;
        self.points_per_match = points_per_match;
    }

    /// Reset the score for a new game.
    pub fn reset_score(&mut self, score: u64) {
        self.score = score;
    }

    /// Show every unmatched card face-up.
    pub fn begin_preview(&mut self) {
        self.pending.clear();
        for card in self.cards.iter_mut() {
            card.turn_up();
        }
    }

    /// Turn every unmatched card face-down (preview over).
    pub fn end_preview(&mut self) {
        self.pending.clear();
        for card in self.cards.iter_mut() {
            card.turn_down();
        }
    }

    /// Flip a card face-up.
    ///
    /// `phase` and `time_remaining` come from the session; flips are only
    /// accepted while Playing with time on the clock.
    pub fn flip(&mut self, id: CardId, phase: Phase, time_remaining: u32) -> FlipResult {
        let result = self.try_flip(id, phase, time_remaining);
        match result {
            FlipResult::Rejected(reason) => debug!(card = id.raw(), ?reason, "Flip rejected"),
            _ => debug!(card = id.raw(), ?result, "Flip accepted"),
        }
        result
    }

    fn try_flip(&mut self, id: CardId, phase: Phase, time_remaining: u32) -> FlipResult {
        if phase != Phase::Playing {
            return FlipResult::Rejected(RejectReason::NotPlaying);
        }
        if time_remaining == 0 {
            return FlipResult::Rejected(RejectReason::TimeExpired);
        }
        let Some(&pos) = self.index.get(&id) else {
            return FlipResult::Rejected(RejectReason::UnknownCard);
        };

        let card = &self.cards[pos];
        if card.is_matched() {
            return FlipResult::Rejected(RejectReason::AlreadyMatched);
        }
        if card.is_face_up() {
            return FlipResult::Rejected(RejectReason::AlreadyFaceUp);
        }
        if self.pending.len() >= 2 {
            return FlipResult::Rejected(RejectReason::PairPending);
        }

        if let Some(card) = self.cards.get_mut(pos) {
            card.turn_up();
        }
        self.pending.push(id);

        match self.pending.as_slice() {
            &[first, second] => {
                let pair = PendingPair {
                    first,
                    second,
                    is_match: self.symbol_of(first) == self.symbol_of(second),
                };
                if pair.is_match {
                    FlipResult::Matched(pair)
                } else {
                    FlipResult::Mismatched(pair)
                }
            }
            _ => FlipResult::Revealed,
        }
    }

    /// Apply the delayed effect of a completed pair.
    pub fn resolve(&mut self, pair: PendingPair) -> Resolution {
        if self.pending.as_slice() != [pair.first, pair.second] {
            debug!(first = pair.first.raw(), second = pair.second.raw(), "Pair no longer pending");
            return Resolution::Stale;
        }
        self.pending.clear();

        if pair.is_match {
            for id in [pair.first, pair.second] {
                if let Some(card) = self.card_mut(id) {
                    card.mark_matched();
                }
            }
            self.matched_pairs += 1;
            self.score += self.points_per_match;
            debug!(
                matched_pairs = self.matched_pairs,
                score = self.score,
                "Pair matched"
            );
            Resolution::Matched {
                points: self.points_per_match,
            }
        } else {
            for id in [pair.first, pair.second] {
                if let Some(card) = self.card_mut(id) {
                    card.turn_down();
                }
            }
            debug!(first = pair.first.raw(), second = pair.second.raw(), "Pair hidden");
            Resolution::Hidden
        }
    }

    /// Have all pairs of the round been matched?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pair_count > 0 && self.matched_pairs == self.pair_count
    }

    /// Cards in grid order.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).and_then(|&pos| self.cards.get(pos))
    }

    /// Cards face-up awaiting resolution, in flip order.
    #[must_use]
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    /// Number of face-up, unmatched cards.
    #[must_use]
    pub fn face_up_unmatched(&self) -> usize {
        self.cards.iter().filter(|c| c.is_pending()).count()
    }

    /// Pairs matched this round.
    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    /// Pairs dealt this round.
    #[must_use]
    pub fn pair_count(&self) -> u32 {
        self.pair_count
    }

    /// Cumulative score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    fn symbol_of(&self, id: CardId) -> Option<&crate::cards::Symbol> {
        self.card(id).map(|c| &c.symbol)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let pos = *self.index.get(&id)?;
        self.cards.get_mut(pos)
    }
}
