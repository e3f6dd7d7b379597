//! Process supervision: spawn the command, monitor its output, pick the
//! terminal cue and report the exit status.

mod outcome;
mod process;
mod runner;

pub use outcome::*;
pub use process::*;
pub use runner::*;
