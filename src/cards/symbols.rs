//! Symbol pool: the fixed set of faces a deck is drawn from.

use rustc_hash::FxHashSet;

use super::instance::Symbol;
use crate::core::error::GameError;

/// Built-in faces.
pub const DEFAULT_SYMBOLS: [&str; 24] = [
    "🌸", "🍵", "🏺", "👘", "🐠", "🍱", "🍜", "🍙", "⛰️", "🏯", "🎌", "🦊", "🐰", "🦢", "🐦", "🦋",
    "🌺", "🌷", "🌈", "☁️", "🌙", "⭐", "🌊", "💮",
];

/// Ordered set of distinct symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolPool {
    symbols: Vec<Symbol>,
}

impl SymbolPool {
    /// Build a pool. Repeated symbols are a configuration error because they
    /// would deal two pairs with the same face.
    pub fn new<I, S>(symbols: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let symbols: Vec<Symbol> = symbols.into_iter().map(Into::into).collect();

        let mut seen = FxHashSet::default();
        for symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(GameError::invalid_catalog(format!(
                    "symbol {} appears more than once in the pool",
                    symbol
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Is the pool empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in pool order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| Symbol::from(*s)).collect(),
        }
    }
}
