//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use errwarn::cue::{CueOutput, CueReceiver, PlayerError, PlayerHandle, PlayerOptions};
use errwarn::sound::{Sound, SoundSet, SoundSlot};

/// Output that records every started sound. Sounds end immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    played: Arc<Mutex<Vec<SoundSlot>>>,
}

impl RecordingOutput {
    pub fn played(&self) -> Vec<SoundSlot> {
        self.played.lock().unwrap().clone()
    }
}

impl CueOutput for RecordingOutput {
    fn play(&mut self, slot: SoundSlot, _sound: &Sound) -> Result<(), PlayerError> {
        self.played.lock().unwrap().push(slot);
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_idle(&self) -> bool {
        true
    }

    fn wait_until_idle(&mut self) {}
}

/// A short silent sound.
pub fn blip() -> Sound {
    Sound::from_samples(vec![0; 32])
}

/// A soundset with every slot filled.
pub fn full_set() -> SoundSet {
    SoundSlot::ALL
        .into_iter()
        .fold(SoundSet::new(), |set, slot| set.with(slot, blip()))
}

/// Start a player on `cues` without spacing, returning its handle and the
/// recorder it plays into.
pub async fn recording_player(cues: CueReceiver) -> (PlayerHandle, RecordingOutput) {
    let output = RecordingOutput::default();
    let device = output.clone();
    let handle = PlayerHandle::spawn(
        move || Ok(device),
        cues,
        PlayerOptions {
            spacing: Duration::ZERO,
        },
    )
    .await
    .unwrap();
    (handle, output)
}
