//! Sound loading error types.

use std::path::PathBuf;

/// Errors that can occur while loading a soundset.
#[derive(thiserror::Error, Debug)]
pub enum SoundError {
    /// The sound file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The sound file could not be decoded.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },

    /// The file extension names no supported format.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A loader task panicked or was cancelled.
    #[error("Sound loader task failed: {0}")]
    Task(String),
}
