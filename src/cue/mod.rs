//! Cue queue and sequenced playback.

mod output;
mod player;
mod queue;

pub use output::*;
pub use player::*;
pub use queue::*;
