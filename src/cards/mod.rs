//! Cards: identifiers, symbols, the symbol pool and deck generation.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier unique within a round
//! - `Symbol`: Opaque face token; equal symbols form a pair
//! - `Card`: Board state of one card (face-up, matched)
//! - `SymbolPool`: Distinct faces a deck is drawn from
//! - `DeckGenerator`: Deals a shuffled, face-up card set for a level

pub mod deck;
pub mod instance;
pub mod symbols;

pub use deck::DeckGenerator;
pub use instance::{Card, CardId, Symbol};
pub use symbols::{SymbolPool, DEFAULT_SYMBOLS};
