//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::cue::PlayerError;
use crate::monitor::PatternError;
use crate::sound::SoundError;
use crate::supervisor::SupervisorError;

/// Any error that ends errwarn before the command's status is known.
#[derive(Error, Debug)]
pub enum ErrwarnError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Failed to load sounds: {0}")]
    Sound(#[from] SoundError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Result type alias using `ErrwarnError`.
pub type Result<T> = std::result::Result<T, ErrwarnError>;
