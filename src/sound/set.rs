//! Named cue slots and their decoded sounds.

use std::sync::Arc;
use std::time::Duration;

use rodio::cpal::FromSample;
use rodio::source::UniformSourceIterator;
use rodio::Source;

/// Channel count of every decoded sound.
pub const CHANNELS: u16 = 2;

/// Sample rate of every decoded sound.
pub const SAMPLE_RATE: u32 = 44_100;

/// An event that can have a sound attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundSlot {
    /// A line matched the error pattern.
    Error,
    /// A line matched the warning pattern.
    Warning,
    /// The command was started.
    Start,
    /// Input ended, or the command succeeded after errors or warnings.
    Finish,
    /// The command succeeded without errors or warnings.
    Success,
    /// The command failed.
    Failure,
}

impl SoundSlot {
    /// Every slot, in load order.
    pub const ALL: [SoundSlot; 6] = [
        SoundSlot::Error,
        SoundSlot::Warning,
        SoundSlot::Start,
        SoundSlot::Finish,
        SoundSlot::Success,
        SoundSlot::Failure,
    ];

    /// File name of the slot's sound, without extension.
    #[must_use]
    pub fn basename(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warn",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Success => "success",
            Self::Failure => "fail",
        }
    }
}

impl std::fmt::Display for SoundSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Success => "success",
            Self::Failure => "failure",
        };
        f.write_str(name)
    }
}

/// A decoded sound in the canonical output format.
///
/// Samples are interleaved stereo at [`SAMPLE_RATE`]. The buffer is never
/// mutated, so the same sound can be replayed any number of times.
#[derive(Clone, PartialEq)]
pub struct Sound {
    samples: Arc<[i16]>,
}

impl Sound {
    /// Wrap interleaved stereo samples that are already in canonical format.
    #[must_use]
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Convert any source to the canonical channel count and sample rate.
    #[must_use]
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source,
        S::Item: rodio::Sample,
        i16: FromSample<S::Item>,
    {
        let uniform: UniformSourceIterator<S, i16> =
            UniformSourceIterator::new(source, CHANNELS, SAMPLE_RATE);
        Self::from_samples(uniform.collect())
    }

    /// Get the interleaved samples.
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Whether the sound has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        duration_of(self.samples.len())
    }

    /// A fresh playable source over the samples. The samples are shared,
    /// not copied.
    #[must_use]
    pub fn to_source(&self) -> SoundSource {
        SoundSource {
            samples: Arc::clone(&self.samples),
            pos: 0,
        }
    }
}

fn duration_of(samples: usize) -> Duration {
    let frames = samples as u64 / u64::from(CHANNELS);
    Duration::from_micros(frames * 1_000_000 / u64::from(SAMPLE_RATE))
}

/// Playback cursor over a [`Sound`].
#[derive(Debug, Clone)]
pub struct SoundSource {
    samples: Arc<[i16]>,
    pos: usize,
}

impl Iterator for SoundSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SoundSource {}

impl Source for SoundSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.pos)
    }

    fn channels(&self) -> u16 {
        CHANNELS
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(duration_of(self.samples.len()))
    }
}

impl std::fmt::Debug for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sound")
            .field("samples", &self.samples.len())
            .field("duration", &self.duration())
            .finish()
    }
}

/// The sounds of one soundset. Any slot may be empty.
#[derive(Debug, Clone, Default)]
pub struct SoundSet {
    /// Played for every error line.
    pub error: Option<Arc<Sound>>,
    /// Played for every warning line.
    pub warning: Option<Arc<Sound>>,
    /// Played when the command starts.
    pub start: Option<Arc<Sound>>,
    /// Played at end of input, or on success after matches.
    pub finish: Option<Arc<Sound>>,
    /// Played on success without matches.
    pub success: Option<Arc<Sound>>,
    /// Played when the command fails.
    pub failure: Option<Arc<Sound>>,
}

impl SoundSet {
    /// Create an empty soundset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sound of a slot, if loaded.
    #[must_use]
    pub fn get(&self, slot: SoundSlot) -> Option<&Arc<Sound>> {
        match slot {
            SoundSlot::Error => self.error.as_ref(),
            SoundSlot::Warning => self.warning.as_ref(),
            SoundSlot::Start => self.start.as_ref(),
            SoundSlot::Finish => self.finish.as_ref(),
            SoundSlot::Success => self.success.as_ref(),
            SoundSlot::Failure => self.failure.as_ref(),
        }
    }

    /// Attach a sound to a slot, replacing any previous one.
    pub fn set(&mut self, slot: SoundSlot, sound: Sound) {
        let sound = Some(Arc::new(sound));
        match slot {
            SoundSlot::Error => self.error = sound,
            SoundSlot::Warning => self.warning = sound,
            SoundSlot::Start => self.start = sound,
            SoundSlot::Finish => self.finish = sound,
            SoundSlot::Success => self.success = sound,
            SoundSlot::Failure => self.failure = sound,
        }
    }

    /// Builder form of [`SoundSet::set`].
    #[must_use]
    pub fn with(mut self, slot: SoundSlot, sound: Sound) -> Self {
        self.set(slot, sound);
        self
    }

    /// Number of slots that have a sound.
    #[must_use]
    pub fn loaded(&self) -> usize {
        SoundSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }
}
