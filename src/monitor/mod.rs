//! Output monitoring: line classification and the tee-and-scan loop.

mod line;
mod pattern;

pub use line::*;
pub use pattern::*;
