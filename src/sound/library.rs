//! Concurrent soundset loading.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;

use super::{decode_file, AudioFormat, Sound, SoundError, SoundSet, SoundSlot};
use crate::config::SOUNDSETS_DIR_NAME;

/// Locates and loads the sounds of one soundset.
#[derive(Debug, Clone)]
pub struct SoundLibrary {
    dir: PathBuf,
}

impl SoundLibrary {
    /// Sounds of `soundset` under `base`. An empty soundset name means the
    /// files directly in `base`.
    #[must_use]
    pub fn new(base: &Path, soundset: &str) -> Self {
        let dir = if soundset.is_empty() {
            base.to_path_buf()
        } else {
            base.join(SOUNDSETS_DIR_NAME).join(soundset)
        };
        Self { dir }
    }

    /// Directory the sound files are looked up in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the file for a slot, trying each supported extension in
    /// priority order.
    #[must_use]
    pub fn resolve(&self, slot: SoundSlot) -> Option<PathBuf> {
        resolve_in(&self.dir, slot)
    }

    /// Load every slot concurrently.
    ///
    /// Slots without a file stay empty. The first decode failure is
    /// returned and the remaining work is abandoned.
    ///
    /// # Errors
    ///
    /// Returns the first `SoundError` from any slot that has a file.
    pub async fn load(&self) -> Result<SoundSet, SoundError> {
        let mut tasks = JoinSet::new();
        for slot in SoundSlot::ALL {
            let dir = self.dir.clone();
            tasks.spawn_blocking(move || (slot, load_slot(&dir, slot)));
        }

        let mut sounds = SoundSet::new();
        while let Some(joined) = tasks.join_next().await {
            let (slot, loaded) = joined.map_err(|e| SoundError::Task(e.to_string()))?;
            if let Some(sound) = loaded? {
                sounds.set(slot, sound);
            }
        }

        tracing::info!(
            dir = %self.dir.display(),
            loaded = sounds.loaded(),
            "Loaded soundset"
        );
        Ok(sounds)
    }
}

fn resolve_in(dir: &Path, slot: SoundSlot) -> Option<PathBuf> {
    AudioFormat::PRIORITY
        .iter()
        .map(|format| dir.join(format!("{}.{}", slot.basename(), format.extension())))
        .find(|path| path.is_file())
}

fn load_slot(dir: &Path, slot: SoundSlot) -> Result<Option<Sound>, SoundError> {
    let Some(path) = resolve_in(dir, slot) else {
        tracing::debug!(%slot, "No sound file for slot");
        return Ok(None);
    };
    decode_file(&path).map(Some)
}
