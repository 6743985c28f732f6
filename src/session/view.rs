//! Read-only snapshots for renderers.
//!
//! A renderer never sees the symbol of a face-down card: `CardView::symbol`
//! is `None` unless the card is face-up or matched.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Symbol};
use crate::core::state::Phase;

/// What a renderer may show of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub symbol: Option<Symbol>,
    pub is_face_up: bool,
    pub is_matched: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            symbol: card.visible_symbol().cloned(),
            is_face_up: card.is_face_up(),
            is_matched: card.is_matched(),
        }
    }
}

/// Snapshot of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub player: String,
    pub level: u32,
    pub round: u32,
    pub score: u64,
    pub matched_pairs: u32,
    pub pair_count: u32,
    pub rows: u32,
    pub cols: u32,
    pub phase: Phase,
    pub time_remaining_seconds: u32,
    pub round_seconds: u32,
    /// Cards in row-major grid order.
    pub cards: Vector<CardView>,
}

impl SessionView {
    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn clock_label(&self) -> String {
        format_clock(self.time_remaining_seconds)
    }

    /// Remaining share of the round, 0.0..=1.0 (timer bar width).
    #[must_use]
    pub fn time_fraction(&self) -> f32 {
        if self.round_seconds == 0 {
            return 0.0;
        }
        (self.time_remaining_seconds as f32 / self.round_seconds as f32).clamp(0.0, 1.0)
    }

    /// Cards of one grid row.
    pub fn row(&self, row: u32) -> impl Iterator<Item = &CardView> {
        let cols = self.cols as usize;
        self.cards.iter().skip(row as usize * cols).take(cols)
    }
}

/// Format seconds as zero-padded `MM:SS`.
#[must_use]
pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
