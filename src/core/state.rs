//! Round phase and progression state.
//!
//! ## Phase
//!
//! ```text
//! Previewing --preview ends--> Playing --all pairs--> RoundComplete
//!                                 |                        |
//!                                 +--timer hits 0--> TimeUp |
//!                                                    |      +--advance--> Previewing | GameComplete
//!                                                    +--retry--> Previewing
//! ```
//!
//! ## SessionState
//!
//! Level/round position plus the generation id. Every transition that deals a
//! new round bumps the generation; delayed callbacks capture it when they are
//! scheduled and are discarded if it no longer matches.

use serde::{Deserialize, Serialize};

/// The discrete state of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every card is shown face-up before play begins.
    Previewing,
    /// Flips are accepted and the round timer is running.
    Playing,
    /// All pairs were matched before the timer ran out.
    RoundComplete,
    /// The timer reached zero with pairs left on the board.
    TimeUp,
    /// The final round of the final level is complete.
    GameComplete,
}

impl Phase {
    /// Whether the round timer runs in this phase.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Phase::Playing)
    }

    /// Whether the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::GameComplete)
    }
}

/// Level/round position of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current level (starts at 1).
    pub level: u32,

    /// Round within the level (1..=rounds_per_level).
    pub round: u32,

    /// Current phase.
    pub phase: Phase,

    generation: u64,
}

impl SessionState {
    /// Create a state positioned at `level`/`round`, before any round is dealt.
    #[must_use]
    pub fn new(level: u32, round: u32) -> Self {
        Self {
            level,
            round,
            phase: Phase::Previewing,
            generation: 0,
        }
    }

    /// Enter a freshly dealt round: bump the generation and re-enter Previewing.
    ///
    /// Returns the new generation id.
    pub fn begin_round(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Previewing;
        self.generation
    }

    /// Current generation id.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check whether a callback scheduled under `generation` still applies.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
