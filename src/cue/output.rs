//! Audio output device used by the player.

use rodio::{OutputStream, OutputStreamHandle, Sink};

use super::PlayerError;
use crate::sound::{Sound, SoundSlot};

/// A device that plays one sound at a time.
///
/// Only the player thread touches the output, so implementations need not
/// be `Send`.
pub trait CueOutput {
    /// Start playing a sound. Any previous sound must already be stopped.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Playback` if the device refuses the sound.
    fn play(&mut self, slot: SoundSlot, sound: &Sound) -> Result<(), PlayerError>;

    /// Stop and discard whatever is playing. No-op when idle.
    fn stop(&mut self);

    /// Whether the last sound has finished playing.
    fn is_idle(&self) -> bool;

    /// Block until the last sound has finished playing.
    fn wait_until_idle(&mut self);
}

/// The default system audio output.
pub struct RodioOutput {
    // Dropping the stream closes the device.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    current: Option<Sink>,
}

impl RodioOutput {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Device` if no output device is available.
    pub fn open() -> Result<Self, PlayerError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlayerError::Device(e.to_string()))?;
        tracing::debug!("Opened default audio output");
        Ok(Self {
            _stream: stream,
            handle,
            current: None,
        })
    }
}

impl CueOutput for RodioOutput {
    fn play(&mut self, slot: SoundSlot, sound: &Sound) -> Result<(), PlayerError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| PlayerError::Playback {
            slot,
            reason: e.to_string(),
        })?;
        sink.append(sound.to_source());
        self.current = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.stop();
        }
    }

    fn is_idle(&self) -> bool {
        self.current.as_ref().map_or(true, Sink::empty)
    }

    fn wait_until_idle(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.sleep_until_end();
        }
    }
}
