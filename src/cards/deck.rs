//! Deck generation.
//!
//! A deal picks `pair_count` distinct symbols uniformly from the pool, lays
//! each down twice, shuffles the result and numbers the cards in dealt order.
//! Cards come out face-up for the preview.

use tracing::debug;

use super::instance::{Card, CardId};
use super::symbols::SymbolPool;
use crate::core::catalog::LevelConfig;
use crate::core::error::GameError;
use crate::core::rng::GameRng;

/// Produces shuffled card sets from a symbol pool.
#[derive(Clone, Debug, Default)]
pub struct DeckGenerator {
    pool: SymbolPool,
}

impl DeckGenerator {
    /// Create a generator over `pool`.
    #[must_use]
    pub fn new(pool: SymbolPool) -> Self {
        Self { pool }
    }

    /// The symbol pool.
    #[must_use]
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// Deal a fresh card set for `config`.
    pub fn generate(&self, config: &LevelConfig, rng: &mut GameRng) -> Result<Vec<Card>, GameError> {
        let pairs = config.pair_count as usize;
        if self.pool.len() < pairs {
            return Err(GameError::InsufficientSymbols {
                required: pairs,
                available: self.pool.len(),
            });
        }

        // Shuffle-and-take gives every subset of the pool equal probability.
        let mut chosen = self.pool.symbols().to_vec();
        rng.shuffle(&mut chosen);
        chosen.truncate(pairs);

        let mut faces = Vec::with_capacity(pairs * 2);
        for symbol in chosen {
            faces.push(symbol.clone());
            faces.push(symbol);
        }
        rng.shuffle(&mut faces);

        let cards: Vec<Card> = faces
            .into_iter()
            .enumerate()
            .map(|(idx, symbol)| Card::new(CardId::new(idx as u32), symbol))
            .collect();

        debug!(level = config.level, cards = cards.len(), "Dealt deck");
        Ok(cards)
    }
}
