//! errwarn - audible feedback for command-line programs.
//!
//! Wraps a command (or reads standard input), passes its output through
//! unchanged and plays a short sound for every line matching the error or
//! warning pattern, plus start and end-of-run sounds.

pub mod config;
pub mod cue;
pub mod display;
pub mod error;
pub mod monitor;
pub mod sound;
pub mod supervisor;
