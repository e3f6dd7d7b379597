//! Audio file decoding.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::Decoder;

use super::{Sound, SoundError};

/// Container formats that can hold a cue sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
    Ogg,
}

impl AudioFormat {
    /// Formats in lookup priority order.
    pub const PRIORITY: [AudioFormat; 4] = [
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Mp3,
        AudioFormat::Ogg,
    ];

    /// File extension of the format, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::PRIORITY
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }
}

/// Decode an audio file into the canonical output format.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, has an unknown extension
/// or does not decode as the format its extension names.
pub fn decode_file(path: &Path) -> Result<Sound, SoundError> {
    let format =
        AudioFormat::from_path(path).ok_or_else(|| SoundError::UnsupportedFormat(path.into()))?;

    let file = File::open(path).map_err(|e| SoundError::Open {
        path: path.into(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let decoded = match format {
        AudioFormat::Wav => Decoder::new_wav(reader),
        AudioFormat::Flac => Decoder::new_flac(reader),
        AudioFormat::Mp3 => Decoder::new_mp3(reader),
        AudioFormat::Ogg => Decoder::new_vorbis(reader),
    };
    let decoder = decoded.map_err(|e| SoundError::Decode {
        path: path.into(),
        source: e,
    })?;

    let sound = Sound::from_source(decoder);
    tracing::debug!(
        path = %path.display(),
        duration_ms = sound.duration().as_millis(),
        "Decoded sound"
    );
    Ok(sound)
}
