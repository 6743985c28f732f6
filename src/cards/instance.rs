//! Card instances - one face of one pair on the board.
//!
//! Cards are created in bulk when a round is dealt and are discarded with it.
//! Only the [`MatchEngine`](crate::rules::MatchEngine) mutates them, so the
//! mutators are crate-private.

use serde::{Deserialize, Serialize};

/// Card identifier, unique and stable within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Opaque face token. Two cards with equal symbols form a pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identifier within the round.
    pub id: CardId,

    /// Face symbol.
    pub symbol: Symbol,

    is_face_up: bool,
    is_matched: bool,
}

impl Card {
    /// Create a face-up, unmatched card (cards are dealt visible for the preview).
    #[must_use]
    pub fn new(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            is_face_up: true,
            is_matched: false,
        }
    }

    /// Is the face currently showing?
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.is_face_up
    }

    /// Has this card been matched? Matched cards never change again this round.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.is_matched
    }

    /// Face-up but not yet matched: part of a pair still being resolved.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.is_face_up && !self.is_matched
    }

    /// The symbol as a renderer may show it: hidden while face-down and unmatched.
    #[must_use]
    pub fn visible_symbol(&self) -> Option<&Symbol> {
        (self.is_face_up || self.is_matched).then_some(&self.symbol)
    }

    pub(crate) fn turn_up(&mut self) {
        if !self.is_matched {
            self.is_face_up = true;
        }
    }

    pub(crate) fn turn_down(&mut self) {
        if !self.is_matched {
            self.is_face_up = false;
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.is_face_up = true;
        self.is_matched = true;
    }
}
