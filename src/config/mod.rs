//! Configuration module.
//!
//! Settings come from presets in `config.toml` under the user config
//! directory, overlaid with command-line flags.

mod loader;
mod types;

pub use loader::*;
pub use types::*;
