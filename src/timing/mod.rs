//! Time: the virtual-clock scheduler and the round countdown.
//!
//! Two timing sources drive a session: a periodic tick (the round timer) and
//! one-shot delays (preview end, pair resolution). Both are entries in the
//! same [`Scheduler`], so they interleave deterministically.

mod scheduler;
mod timer;

pub use scheduler::{Fired, Scheduler, TimerEvent, TimerId};
pub use timer::{RoundTimer, TickOutcome};
