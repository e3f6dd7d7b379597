//! Cue sounds: named slots, decoding and soundset loading.

mod decode;
mod error;
mod library;
mod set;

pub use decode::{decode_file, AudioFormat};
pub use error::SoundError;
pub use library::SoundLibrary;
pub use set::{Sound, SoundSet, SoundSlot, SoundSource, CHANNELS, SAMPLE_RATE};
